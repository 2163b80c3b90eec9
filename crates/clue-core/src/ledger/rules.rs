//! Monotone simplification rules run to a fixed point after every observation.
//!
//! Every rule only moves cells from unknown to `YES`/`NO` or drops claim ids,
//! and both are finite, so the loop in [`run_to_fixed_point`] terminates.

use super::cell::Holding;
use super::matrix::BeliefMatrix;
use crate::error::Inconsistency;
use crate::model::catalog::{Catalog, Token};
use crate::model::roster::{Participant, Roster};
use tracing::{Level, event};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Rule {
    /// A token with a known holder is held by nobody else.
    KnownHolder = 0,
    /// A column with as many `NO`s as allowed holds every remaining token.
    MaxLacks = 1,
    /// A column with a full hand of `YES`s holds nothing else.
    MaxHolds = 2,
    /// Once a category's solution is known, its other tokens with a single
    /// possible holder belong to that holder.
    SolvedCategory = 3,
    /// The only token of a category nobody holds is the solution.
    LastCandidate = 4,
    /// A claim group down to one candidate reveals that candidate.
    SingleClaim = 5,
    /// Open claims that must fill the rest of a hand rule out every token
    /// outside them.
    ClaimCoverage = 6,
}

impl Rule {
    pub const ALL: [Rule; 7] = [
        Rule::KnownHolder,
        Rule::MaxLacks,
        Rule::MaxHolds,
        Rule::SolvedCategory,
        Rule::LastCandidate,
        Rule::SingleClaim,
        Rule::ClaimCoverage,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn label(self) -> &'static str {
        match self {
            Rule::KnownHolder => "known_holder",
            Rule::MaxLacks => "max_lacks",
            Rule::MaxHolds => "max_holds",
            Rule::SolvedCategory => "solved_category",
            Rule::LastCandidate => "last_candidate",
            Rule::SingleClaim => "single_claim",
            Rule::ClaimCoverage => "claim_coverage",
        }
    }

    /// Applies the rule once across the whole matrix. Returns whether any
    /// cell changed.
    pub fn apply(
        self,
        catalog: &Catalog,
        roster: &Roster,
        matrix: &mut BeliefMatrix,
    ) -> Result<bool, Inconsistency> {
        match self {
            Rule::KnownHolder => known_holder(catalog, matrix),
            Rule::MaxLacks => max_lacks(catalog, roster, matrix),
            Rule::MaxHolds => max_holds(roster, matrix),
            Rule::SolvedCategory => solved_category(catalog, matrix),
            Rule::LastCandidate => last_candidate(catalog, matrix),
            Rule::SingleClaim => single_claim(roster, matrix),
            Rule::ClaimCoverage => claim_coverage(roster, matrix),
        }
    }
}

/// Outcome of one fixed-point run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedPointReport {
    /// Full passes over the rule list, including the final quiet one.
    pub passes: usize,
    /// Number of passes in which each rule changed something.
    pub firings: [usize; 7],
}

impl FixedPointReport {
    pub fn fired(&self, rule: Rule) -> usize {
        self.firings[rule.index()]
    }

    pub fn total_firings(&self) -> usize {
        self.firings.iter().sum()
    }

    pub fn changed(&self) -> bool {
        self.total_firings() > 0
    }
}

/// Applies every rule in order until a full pass leaves the matrix untouched.
pub fn run_to_fixed_point(
    catalog: &Catalog,
    roster: &Roster,
    matrix: &mut BeliefMatrix,
) -> Result<FixedPointReport, Inconsistency> {
    let mut report = FixedPointReport::default();
    loop {
        report.passes += 1;
        let mut changed = false;
        for rule in Rule::ALL {
            if rule.apply(catalog, roster, matrix)? {
                report.firings[rule.index()] += 1;
                changed = true;
                event!(
                    target: "clue_core::rules",
                    Level::TRACE,
                    rule = rule.label(),
                    pass = report.passes,
                    "rule fired"
                );
            }
        }
        if !changed {
            break;
        }
    }

    if tracing::enabled!(Level::DEBUG) && report.changed() {
        let fired = Rule::ALL
            .iter()
            .filter(|rule| report.fired(**rule) > 0)
            .map(|rule| format!("{}x{}", rule.label(), report.fired(*rule)))
            .collect::<Vec<_>>()
            .join(",");
        event!(
            target: "clue_core::rules",
            Level::DEBUG,
            passes = report.passes,
            fired = %fired,
            "fixed point reached"
        );
    }
    Ok(report)
}

fn known_holder(catalog: &Catalog, matrix: &mut BeliefMatrix) -> Result<bool, Inconsistency> {
    let mut changed = false;
    for token in catalog.tokens() {
        if matrix.holder(token).is_some() {
            changed |= matrix.fill_row(token, Holding::Lacks)?;
        }
    }
    Ok(changed)
}

fn max_lacks(
    catalog: &Catalog,
    roster: &Roster,
    matrix: &mut BeliefMatrix,
) -> Result<bool, Inconsistency> {
    let mut changed = false;
    for participant in roster.participants() {
        let limit = catalog.len().saturating_sub(roster.hand_size(participant));
        let lacking = matrix.no_count(participant);
        if lacking > limit {
            return Err(Inconsistency::LackOverflow {
                participant,
                lacking,
                limit,
            });
        }
        if lacking == limit {
            changed |= matrix.fill_column(participant, Holding::Holds)?;
        }
    }
    Ok(changed)
}

fn max_holds(roster: &Roster, matrix: &mut BeliefMatrix) -> Result<bool, Inconsistency> {
    let mut changed = false;
    for participant in roster.participants() {
        let hand_size = roster.hand_size(participant);
        let held = matrix.yes_count(participant);
        if held > hand_size {
            return Err(Inconsistency::HandOverflow {
                participant,
                held,
                hand_size,
            });
        }
        if held == hand_size {
            changed |= matrix.fill_column(participant, Holding::Lacks)?;
        }
    }
    Ok(changed)
}

fn solved_category(catalog: &Catalog, matrix: &mut BeliefMatrix) -> Result<bool, Inconsistency> {
    let mut changed = false;
    for (index, category) in catalog.categories().iter().enumerate() {
        let solved: Vec<Token> = category
            .tokens()
            .iter()
            .copied()
            .filter(|token| matrix.is_solution(*token))
            .collect();
        if solved.len() > 1 {
            return Err(Inconsistency::SecondSolution { category: index });
        }
        let Some(solution) = solved.first().copied() else {
            continue;
        };

        for &token in category.tokens() {
            if token == solution || matrix.holder(token).is_some() {
                continue;
            }
            let open: Vec<Participant> = matrix.open_holders(token).take(2).collect();
            if let [only] = open[..] {
                changed |= matrix.mark_yes(token, only)?;
            }
        }
    }
    Ok(changed)
}

fn last_candidate(catalog: &Catalog, matrix: &mut BeliefMatrix) -> Result<bool, Inconsistency> {
    let mut changed = false;
    for (index, category) in catalog.categories().iter().enumerate() {
        let mut possible = category
            .tokens()
            .iter()
            .copied()
            .filter(|token| matrix.is_possible(*token));
        match (possible.next(), possible.next()) {
            (None, _) => return Err(Inconsistency::NoCandidate { category: index }),
            (Some(only), None) => {
                if !matrix.is_solution(only) {
                    changed |= matrix.fill_row(only, Holding::Lacks)?;
                }
            }
            _ => {}
        }
    }
    Ok(changed)
}

fn single_claim(roster: &Roster, matrix: &mut BeliefMatrix) -> Result<bool, Inconsistency> {
    let mut changed = false;
    for participant in roster.participants() {
        let singles: Vec<Token> = matrix
            .groups_for(participant)
            .into_values()
            .filter(|candidates| candidates.len() == 1)
            .filter_map(|candidates| candidates.into_iter().next())
            .collect();
        for token in singles {
            changed |= matrix.mark_yes(token, participant)?;
        }
    }
    Ok(changed)
}

fn claim_coverage(roster: &Roster, matrix: &mut BeliefMatrix) -> Result<bool, Inconsistency> {
    let mut changed = false;
    for participant in roster.participants() {
        let room = roster
            .hand_size(participant)
            .saturating_sub(matrix.yes_count(participant));
        if room == 0 {
            continue;
        }
        let groups: Vec<Vec<Token>> = matrix
            .groups_for(participant)
            .into_values()
            .map(|candidates| candidates.into_iter().collect())
            .collect();
        if groups.is_empty() {
            continue;
        }

        match smallest_cover(&groups, room) {
            None => return Err(Inconsistency::ClaimsExceedHand { participant, room }),
            Some(size) if size == room => {
                changed |= exclude_unclaimed(matrix, participant)?;
            }
            Some(_) => {}
        }
    }
    Ok(changed)
}

fn exclude_unclaimed(
    matrix: &mut BeliefMatrix,
    participant: Participant,
) -> Result<bool, Inconsistency> {
    let blanks: Vec<Token> = matrix
        .column(participant)
        .filter(|(_, cell)| cell.is_blank())
        .map(|(token, _)| token)
        .collect();
    let mut changed = false;
    for token in blanks {
        changed |= matrix.mark_no(token, participant)?;
    }
    Ok(changed)
}

/// Size of the smallest token set hitting every group, if it is at most
/// `limit`.
///
/// Picking one candidate per group and counting distinct picks can never
/// beat this, and a minimum hitting set is itself such a pick, so this equals
/// the minimum distinct count over all combinations.
fn smallest_cover(groups: &[Vec<Token>], limit: usize) -> Option<usize> {
    let mut chosen = Vec::with_capacity(limit);
    (0..=limit).find(|&budget| cover_within(groups, &mut chosen, budget))
}

fn cover_within(groups: &[Vec<Token>], chosen: &mut Vec<Token>, budget: usize) -> bool {
    let Some(unhit) = groups
        .iter()
        .find(|group| !group.iter().any(|token| chosen.contains(token)))
    else {
        return true;
    };
    if budget == 0 {
        return false;
    }
    for &token in unhit {
        chosen.push(token);
        let found = cover_within(groups, chosen, budget - 1);
        chosen.pop();
        if found {
            return true;
        }
    }
    false
}
