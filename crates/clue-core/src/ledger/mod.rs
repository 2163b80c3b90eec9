//! Deterministic ownership ledger.
//!
//! This module is composed of:
//! - `cell`: tri-state belief cells and claim ids.
//! - `matrix`: the token × participant grid and its bounded mutations.
//! - `registry`: claim-group bookkeeping for unrevealed disproofs.
//! - `rules`: the simplification rules and their fixed-point driver.
//! - `solver`: possibility/solution queries and `solve`.

mod cell;
mod matrix;
mod registry;
pub mod rules;
mod solver;

pub use cell::{Cell, ClaimId, Holding};
pub use matrix::BeliefMatrix;
pub use registry::ClaimGroups;
pub use rules::{FixedPointReport, Rule};
pub use solver::Solution;

use crate::error::{ConfigError, LedgerError};
use crate::model::catalog::{Catalog, Token};
use crate::model::deal::check_hand_sizes;
use crate::model::roster::{Participant, Roster};
use std::collections::HashSet;
use tracing::{Level, event};

/// Everything the observer can deduce about who holds which token.
#[derive(Debug, Clone)]
pub struct Ledger {
    catalog: Catalog,
    roster: Roster,
    observer: Participant,
    matrix: BeliefMatrix,
}

impl Ledger {
    /// Creates a ledger from the observer's point of view.
    ///
    /// The observer's own tokens are settled immediately: `YES` for the
    /// observer and `NO` for everybody else, and the observer is marked as not
    /// holding anything else.
    pub fn new(
        catalog: Catalog,
        roster: Roster,
        observer: Participant,
        own_tokens: &[Token],
    ) -> Result<Self, LedgerError> {
        check_hand_sizes(&catalog, &roster)?;
        if !roster.contains(observer) {
            return Err(LedgerError::UnknownParticipant(observer.index()));
        }

        let mut seen = HashSet::new();
        for &token in own_tokens {
            if !catalog.contains(token) {
                return Err(LedgerError::UnknownToken(token.index()));
            }
            if !seen.insert(token) {
                return Err(ConfigError::DuplicateOwnToken(catalog.name(token).to_string()).into());
            }
        }
        let declared = roster.hand_size(observer);
        if declared != own_tokens.len() {
            return Err(ConfigError::ObserverHandMismatch {
                observer: roster.name(observer).to_string(),
                declared,
                held: own_tokens.len(),
            }
            .into());
        }

        let mut matrix = BeliefMatrix::new(catalog.len(), roster.len());
        for token in catalog.tokens() {
            if seen.contains(&token) {
                matrix.mark_yes(token, observer)?;
                matrix.fill_row(token, Holding::Lacks)?;
            } else {
                matrix.mark_no(token, observer)?;
            }
        }

        let mut ledger = Self {
            catalog,
            roster,
            observer,
            matrix,
        };
        ledger.simplify()?;
        event!(
            target: "clue_core::ledger",
            Level::DEBUG,
            observer = ledger.roster.name(observer),
            participants = ledger.roster.len(),
            tokens = ledger.catalog.len(),
            "ledger created"
        );
        Ok(ledger)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn observer(&self) -> Participant {
        self.observer
    }

    /// Read-only view of the full belief matrix, for rendering.
    pub fn matrix(&self) -> &BeliefMatrix {
        &self.matrix
    }

    pub fn cell(&self, token: Token, participant: Participant) -> Result<&Cell, LedgerError> {
        self.check_token(token)?;
        self.check_participant(participant)?;
        Ok(self.matrix.cell(token, participant))
    }

    pub fn holder(&self, token: Token) -> Result<Option<Participant>, LedgerError> {
        self.check_token(token)?;
        Ok(self.matrix.holder(token))
    }

    pub fn groups_for(&self, participant: Participant) -> Result<ClaimGroups, LedgerError> {
        self.check_participant(participant)?;
        Ok(self.matrix.groups_for(participant))
    }

    /// Ingests one suggestion.
    ///
    /// `tokens` must name exactly one token per category. Each participant in
    /// `passing` could not disprove it. `showing` disproved it, and `shown` is
    /// the token they revealed when the observer saw it, so `shown` without
    /// `showing` is rejected.
    pub fn update(
        &mut self,
        tokens: &[Token],
        passing: &[Participant],
        showing: Option<Participant>,
        shown: Option<Token>,
    ) -> Result<FixedPointReport, LedgerError> {
        self.check_suggestion(tokens)?;
        for &participant in passing {
            self.check_participant(participant)?;
        }
        if let Some(shower) = showing {
            self.check_participant(shower)?;
            if passing.contains(&shower) {
                return Err(LedgerError::ShowerAlsoPassed(shower));
            }
        }
        if let Some(token) = shown {
            self.check_token(token)?;
            if !tokens.contains(&token) {
                return Err(LedgerError::ShownNotSuggested(token));
            }
            if showing.is_none() {
                return Err(LedgerError::ShownWithoutShower(token));
            }
        }

        for &participant in passing {
            for &token in tokens {
                self.matrix.mark_no(token, participant)?;
            }
        }

        match (showing, shown) {
            (None, _) => {}
            (Some(shower), Some(token)) => {
                self.matrix.direct_reveal(token, shower)?;
            }
            (Some(shower), None) => self.record_hidden_disproof(tokens, shower)?,
        }

        let report = self.simplify()?;
        event!(
            target: "clue_core::ledger",
            Level::DEBUG,
            passing = passing.len(),
            showing = showing.map(|p| self.roster.name(p)),
            revealed = shown.is_some(),
            passes = report.passes,
            firings = report.total_firings(),
            solved = self.solve().is_some(),
            "observation applied"
        );
        Ok(report)
    }

    /// Runs the rule engine to a fixed point without a new observation.
    pub fn simplify(&mut self) -> Result<FixedPointReport, LedgerError> {
        Ok(rules::run_to_fixed_point(
            &self.catalog,
            &self.roster,
            &mut self.matrix,
        )?)
    }

    fn record_hidden_disproof(
        &mut self,
        tokens: &[Token],
        shower: Participant,
    ) -> Result<(), LedgerError> {
        if tokens
            .iter()
            .any(|token| self.matrix.cell(*token, shower).is_yes())
        {
            return Ok(());
        }
        let candidates: Vec<Token> = tokens
            .iter()
            .copied()
            .filter(|token| !self.matrix.cell(*token, shower).is_no())
            .collect();
        if let Some(claim) = self.matrix.open_group(shower, &candidates)? {
            event!(
                target: "clue_core::ledger",
                Level::TRACE,
                participant = self.roster.name(shower),
                claim = claim.get(),
                candidates = candidates.len(),
                "claim group opened"
            );
        }
        Ok(())
    }

    fn check_suggestion(&self, tokens: &[Token]) -> Result<(), LedgerError> {
        let expected = self.catalog.categories().len();
        if tokens.len() != expected {
            return Err(LedgerError::WrongTokenCount {
                expected,
                actual: tokens.len(),
            });
        }
        let mut covered = vec![false; expected];
        for &token in tokens {
            self.check_token(token)?;
            let category = self
                .catalog
                .category_of(token)
                .ok_or(LedgerError::UnknownToken(token.index()))?;
            if std::mem::replace(&mut covered[category], true) {
                let name = self
                    .catalog
                    .category(category)
                    .map(|c| c.name().to_string())
                    .unwrap_or_default();
                return Err(LedgerError::RepeatedCategory(name));
            }
        }
        Ok(())
    }

    fn check_token(&self, token: Token) -> Result<(), LedgerError> {
        if self.catalog.contains(token) {
            Ok(())
        } else {
            Err(LedgerError::UnknownToken(token.index()))
        }
    }

    fn check_participant(&self, participant: Participant) -> Result<(), LedgerError> {
        if self.roster.contains(participant) {
            Ok(())
        } else {
            Err(LedgerError::UnknownParticipant(participant.index()))
        }
    }
}
