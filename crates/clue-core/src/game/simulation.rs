//! Self-play against a hidden deal: suggestions are answered truthfully and
//! fed to the observer's ledger the way a real table would reveal them.

use crate::error::LedgerError;
use crate::ledger::{Ledger, Solution};
use crate::model::catalog::{Catalog, Token};
use crate::model::deal::Deal;
use crate::model::roster::{Participant, Roster};
use crate::tracker::ShownTracker;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

/// One suggestion as the observer saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRecord {
    pub suggester: Participant,
    pub tokens: Vec<Token>,
    pub passing: Vec<Participant>,
    pub shower: Option<Participant>,
    /// Present only when the observer made the suggestion or did the showing.
    pub shown: Option<Token>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationOutcome {
    pub turns: usize,
    pub solution: Option<Solution>,
}

#[derive(Debug, Clone)]
pub struct Simulation {
    deal: Deal,
    ledger: Ledger,
    shown: ShownTracker,
    rng: SmallRng,
    turn: usize,
}

impl Simulation {
    pub fn new(
        catalog: Catalog,
        roster: Roster,
        observer: Participant,
        seed: u64,
    ) -> Result<Self, LedgerError> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let deal = Deal::shuffled(&catalog, &roster, &mut rng)?;
        let own = deal.hand(observer).to_vec();
        let ledger = Ledger::new(catalog, roster, observer, &own)?;
        Ok(Self {
            deal,
            ledger,
            shown: ShownTracker::new(observer, &own),
            rng,
            turn: 0,
        })
    }

    pub fn deal(&self) -> &Deal {
        &self.deal
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn shown(&self) -> &ShownTracker {
        &self.shown
    }

    pub fn turns_played(&self) -> usize {
        self.turn
    }

    /// Plays one suggestion for the next seat in rotation.
    pub fn step(&mut self) -> Result<TurnRecord, LedgerError> {
        let roster = self.ledger.roster();
        let suggester = Participant::from_index(self.turn % roster.len());
        self.turn += 1;

        let tokens: Vec<Token> = self
            .ledger
            .catalog()
            .categories()
            .iter()
            .filter_map(|category| category.tokens().choose(&mut self.rng).copied())
            .collect();

        let mut passing = Vec::new();
        let mut shower = None;
        let mut revealed = None;
        for seat in roster.after(suggester) {
            let held: Vec<Token> = tokens
                .iter()
                .copied()
                .filter(|token| self.deal.holder(*token) == Some(seat))
                .collect();
            if held.is_empty() {
                passing.push(seat);
                continue;
            }
            shower = Some(seat);
            revealed = self.pick_shown(seat, suggester, &held);
            break;
        }

        let observer = self.ledger.observer();
        let shown = match shower {
            Some(seat) if seat == observer || suggester == observer => revealed,
            _ => None,
        };
        if let (Some(seat), Some(token)) = (shower, revealed) {
            if seat == observer {
                self.shown.record(suggester, token)?;
            }
        }

        self.ledger.update(&tokens, &passing, shower, shown)?;
        Ok(TurnRecord {
            suggester,
            tokens,
            passing,
            shower,
            shown,
        })
    }

    /// Plays until the ledger names the solution or `max_turns` is reached.
    pub fn run(&mut self, max_turns: usize) -> Result<SimulationOutcome, LedgerError> {
        while self.turn < max_turns {
            if self.ledger.solve().is_some() {
                break;
            }
            self.step()?;
        }
        Ok(SimulationOutcome {
            turns: self.turn,
            solution: self.ledger.solve(),
        })
    }

    /// First cell where the ledger disagrees with the hidden deal.
    pub fn contradiction(&self) -> Option<(Token, Participant)> {
        let matrix = self.ledger.matrix();
        for token in self.ledger.catalog().tokens() {
            for participant in self.ledger.roster().participants() {
                let holds = self.deal.holder(token) == Some(participant);
                let cell = matrix.get(token, participant)?;
                if (cell.is_yes() && !holds) || (cell.is_no() && holds) {
                    return Some((token, participant));
                }
            }
        }
        None
    }

    /// The observer re-shows a token the suggester has already seen when it
    /// can; everyone else shows at random.
    fn pick_shown(&mut self, seat: Participant, suggester: Participant, held: &[Token]) -> Option<Token> {
        if seat == self.ledger.observer() {
            if let Some(token) = self.shown.already_seen(suggester, held).first() {
                return Some(*token);
            }
        }
        held.choose(&mut self.rng).copied()
    }
}
