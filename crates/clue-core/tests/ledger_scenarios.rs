use clue_core::ledger::{Ledger, Rule};
use clue_core::model::catalog::{Catalog, Token};
use clue_core::model::roster::{Participant, Roster};

const SELF: Participant = Participant::from_index(0);
const BOB: Participant = Participant::from_index(1);
const CAROL: Participant = Participant::from_index(2);

fn tok(catalog: &Catalog, name: &str) -> Token {
    catalog.find(name).unwrap_or_else(|| panic!("no token named {name}"))
}

fn toks(catalog: &Catalog, names: &[&str]) -> Vec<Token> {
    names.iter().map(|name| tok(catalog, name)).collect()
}

fn ledger_with(hands: [usize; 3], own: &[&str]) -> Ledger {
    let catalog = Catalog::classic();
    let roster = Roster::new([("Self", hands[0]), ("Bob", hands[1]), ("Carol", hands[2])])
        .expect("valid roster");
    let own = toks(&catalog, own);
    Ledger::new(catalog, roster, SELF, &own).expect("valid ledger")
}

fn standard_ledger() -> Ledger {
    ledger_with(
        [6, 6, 6],
        &["Green", "Candlestick", "Ballroom", "Dining", "Hall", "Study"],
    )
}

#[test]
fn direct_reveal_excludes_everyone_else() {
    let mut ledger = standard_ledger();
    let catalog = ledger.catalog().clone();
    let suggestion = toks(&catalog, &["Mustard", "Dagger", "Billiard"]);
    let dagger = tok(&catalog, "Dagger");

    ledger
        .update(&suggestion, &[CAROL], Some(BOB), Some(dagger))
        .unwrap();

    assert!(ledger.cell(dagger, BOB).unwrap().is_yes());
    assert!(ledger.cell(dagger, SELF).unwrap().is_no());
    assert!(ledger.cell(dagger, CAROL).unwrap().is_no());
    assert_eq!(ledger.holder(dagger).unwrap(), Some(BOB));
    for token in toks(&catalog, &["Mustard", "Billiard"]) {
        assert!(ledger.cell(token, CAROL).unwrap().is_no());
    }
}

#[test]
fn hidden_disproof_with_one_candidate_collapses() {
    let mut ledger = standard_ledger();
    let catalog = ledger.catalog().clone();

    // Bob passes on Mustard and Billiard first.
    ledger
        .update(
            &toks(&catalog, &["Mustard", "Pipe", "Billiard"]),
            &[BOB],
            Some(CAROL),
            None,
        )
        .unwrap();
    assert!(ledger.cell(tok(&catalog, "Mustard"), BOB).unwrap().is_no());
    assert!(ledger.cell(tok(&catalog, "Billiard"), BOB).unwrap().is_no());

    let report = ledger
        .update(
            &toks(&catalog, &["Mustard", "Dagger", "Billiard"]),
            &[],
            Some(BOB),
            None,
        )
        .unwrap();

    assert!(ledger.cell(tok(&catalog, "Dagger"), BOB).unwrap().is_yes());
    assert!(ledger.groups_for(BOB).unwrap().is_empty());
    assert!(report.fired(Rule::SingleClaim) > 0);
}

#[test]
fn full_hand_excludes_remaining_tokens() {
    let mut ledger = standard_ledger();
    let catalog = ledger.catalog().clone();
    let revolver = tok(&catalog, "Revolver");
    let first = toks(&catalog, &["Mustard", "Dagger", "Billiard"]);
    let second = toks(&catalog, &["Orchid", "Pipe", "Conservatory"]);
    let reveals = [
        (&first, "Mustard"),
        (&second, "Orchid"),
        (&first, "Dagger"),
        (&second, "Pipe"),
        (&first, "Billiard"),
    ];
    for (suggestion, shown) in reveals {
        ledger
            .update(suggestion, &[], Some(BOB), Some(tok(&catalog, shown)))
            .unwrap();
    }
    assert!(ledger.cell(revolver, BOB).unwrap().is_blank());
    assert_eq!(ledger.matrix().yes_count(BOB), 5);

    ledger
        .update(
            &second,
            &[],
            Some(BOB),
            Some(tok(&catalog, "Conservatory")),
        )
        .unwrap();
    assert_eq!(ledger.matrix().yes_count(BOB), 6);
    assert!(ledger.cell(revolver, BOB).unwrap().is_no());
    for token in catalog.tokens() {
        assert!(ledger.cell(token, BOB).unwrap().is_known());
    }
}

#[test]
fn solved_category_assigns_sole_remaining_holder() {
    let mut ledger = standard_ledger();
    let catalog = ledger.catalog().clone();
    let revolver = tok(&catalog, "Revolver");
    let rope = tok(&catalog, "Rope");

    // Nobody can disprove: all three are the solution.
    ledger
        .update(
            &toks(&catalog, &["Mustard", "Revolver", "Billiard"]),
            &[BOB, CAROL],
            None,
            None,
        )
        .unwrap();
    assert!(ledger.is_solution(revolver).unwrap());

    ledger
        .update(
            &toks(&catalog, &["Plum", "Rope", "Kitchen"]),
            &[BOB],
            Some(CAROL),
            None,
        )
        .unwrap();

    assert!(ledger.cell(rope, CAROL).unwrap().is_yes());
    assert!(ledger.cell(tok(&catalog, "Plum"), CAROL).unwrap().is_yes());
    assert!(ledger.groups_for(CAROL).unwrap().is_empty());

    let solution = ledger.solve().expect("every category solved");
    assert_eq!(
        solution.tokens(),
        toks(&catalog, &["Mustard", "Revolver", "Billiard"]).as_slice()
    );
}

#[test]
fn disjoint_claims_that_fill_the_hand_exclude_everything_else() {
    let mut ledger = ledger_with(
        [7, 3, 8],
        &["Green", "Candlestick", "Ballroom", "Dining", "Hall", "Study", "Wrench"],
    );
    let catalog = ledger.catalog().clone();
    ledger
        .update(
            &toks(&catalog, &["Mustard", "Dagger", "Billiard"]),
            &[],
            Some(BOB),
            Some(tok(&catalog, "Mustard")),
        )
        .unwrap();
    ledger
        .update(
            &toks(&catalog, &["Orchid", "Pipe", "Ballroom"]),
            &[],
            Some(BOB),
            None,
        )
        .unwrap();
    // One claim cannot fill two free slots yet.
    assert!(ledger.cell(tok(&catalog, "Plum"), BOB).unwrap().is_blank());

    let report = ledger
        .update(
            &toks(&catalog, &["Peacock", "Revolver", "Dining"]),
            &[],
            Some(BOB),
            None,
        )
        .unwrap();
    assert!(report.fired(Rule::ClaimCoverage) > 0);

    let claimed = toks(&catalog, &["Orchid", "Pipe", "Peacock", "Revolver"]);
    for token in catalog.tokens() {
        let cell = ledger.cell(token, BOB).unwrap();
        if token == tok(&catalog, "Mustard") {
            assert!(cell.is_yes());
        } else if claimed.contains(&token) {
            assert!(!cell.is_known(), "{} should stay open", catalog.name(token));
        } else {
            assert!(cell.is_no(), "{} should be excluded", catalog.name(token));
        }
    }
    assert_eq!(ledger.groups_for(BOB).unwrap().len(), 2);
}

#[test]
fn overlapping_claims_leave_room_for_other_tokens() {
    let mut ledger = ledger_with(
        [7, 3, 8],
        &["Green", "Candlestick", "Ballroom", "Dining", "Hall", "Study", "Wrench"],
    );
    let catalog = ledger.catalog().clone();
    ledger
        .update(
            &toks(&catalog, &["Mustard", "Dagger", "Billiard"]),
            &[],
            Some(BOB),
            Some(tok(&catalog, "Mustard")),
        )
        .unwrap();
    ledger
        .update(
            &toks(&catalog, &["Orchid", "Pipe", "Ballroom"]),
            &[],
            Some(BOB),
            None,
        )
        .unwrap();
    ledger
        .update(
            &toks(&catalog, &["Orchid", "Wrench", "Kitchen"]),
            &[],
            Some(BOB),
            None,
        )
        .unwrap();

    // Orchid alone satisfies both claims, leaving a free slot.
    assert!(ledger.cell(tok(&catalog, "Plum"), BOB).unwrap().is_blank());
    let groups = ledger.groups_for(BOB).unwrap();
    assert_eq!(groups.len(), 2);
    assert!(
        groups
            .values()
            .all(|candidates| candidates.contains(&tok(&catalog, "Orchid")))
    );
}

#[test]
fn revealing_a_shared_candidate_consumes_every_claim_it_belongs_to() {
    let mut ledger = ledger_with(
        [7, 3, 8],
        &["Green", "Candlestick", "Ballroom", "Dining", "Hall", "Study", "Wrench"],
    );
    let catalog = ledger.catalog().clone();
    ledger
        .update(
            &toks(&catalog, &["Orchid", "Pipe", "Ballroom"]),
            &[],
            Some(BOB),
            None,
        )
        .unwrap();
    ledger
        .update(
            &toks(&catalog, &["Orchid", "Wrench", "Kitchen"]),
            &[],
            Some(BOB),
            None,
        )
        .unwrap();
    assert_eq!(ledger.groups_for(BOB).unwrap().len(), 2);

    ledger
        .update(
            &toks(&catalog, &["Orchid", "Rope", "Lounge"]),
            &[],
            Some(BOB),
            Some(tok(&catalog, "Orchid")),
        )
        .unwrap();
    assert!(ledger.groups_for(BOB).unwrap().is_empty());
    assert!(ledger.cell(tok(&catalog, "Pipe"), BOB).unwrap().is_blank());
    assert!(ledger.cell(tok(&catalog, "Kitchen"), BOB).unwrap().is_blank());
}

#[test]
fn everyone_passing_makes_unowned_tokens_the_solution() {
    let mut ledger = standard_ledger();
    let catalog = ledger.catalog().clone();
    // Green is the observer's own card, so only Rope and Lounge are solved.
    ledger
        .update(
            &toks(&catalog, &["Green", "Rope", "Lounge"]),
            &[BOB, CAROL],
            None,
            None,
        )
        .unwrap();
    assert!(ledger.is_solution(tok(&catalog, "Rope")).unwrap());
    assert!(ledger.is_solution(tok(&catalog, "Lounge")).unwrap());
    assert!(!ledger.is_solution(tok(&catalog, "Green")).unwrap());
    assert_eq!(
        ledger.candidates(1).unwrap(),
        vec![tok(&catalog, "Rope")]
    );
    assert!(ledger.solve().is_none());
}
