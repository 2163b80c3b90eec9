//! Which opponents have already seen each of the observer's own tokens.

use crate::model::catalog::Token;
use crate::model::roster::Participant;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("{0} is not one of the observer's tokens")]
    NotOwned(Token),
    #[error("the observer cannot show a token to themselves")]
    SelfViewer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownTracker {
    observer: Participant,
    viewers: BTreeMap<Token, BTreeSet<Participant>>,
}

impl ShownTracker {
    pub fn new(observer: Participant, own_tokens: &[Token]) -> Self {
        Self {
            observer,
            viewers: own_tokens
                .iter()
                .map(|token| (*token, BTreeSet::new()))
                .collect(),
        }
    }

    /// Notes that `opponent` has been shown `token`. Returns `false` if they
    /// had already seen it.
    pub fn record(&mut self, opponent: Participant, token: Token) -> Result<bool, TrackerError> {
        if opponent == self.observer {
            return Err(TrackerError::SelfViewer);
        }
        let seen = self
            .viewers
            .get_mut(&token)
            .ok_or(TrackerError::NotOwned(token))?;
        Ok(seen.insert(opponent))
    }

    pub fn viewers(&self, token: Token) -> impl Iterator<Item = Participant> + '_ {
        self.viewers.get(&token).into_iter().flatten().copied()
    }

    /// Own tokens among `suggested` that `opponent` has already seen, so
    /// showing one of them again gives nothing away.
    pub fn already_seen(&self, opponent: Participant, suggested: &[Token]) -> Vec<Token> {
        suggested
            .iter()
            .copied()
            .filter(|token| {
                self.viewers
                    .get(token)
                    .is_some_and(|seen| seen.contains(&opponent))
            })
            .collect()
    }

    /// Own tokens with at least one viewer, in token order.
    pub fn shown(&self) -> impl Iterator<Item = (Token, &BTreeSet<Participant>)> {
        self.viewers
            .iter()
            .filter(|(_, seen)| !seen.is_empty())
            .map(|(token, seen)| (*token, seen))
    }
}
