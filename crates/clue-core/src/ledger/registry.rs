//! Bookkeeping for disproofs whose revealed token is unknown.
//!
//! Claim groups live inside the matrix cells themselves: a group is open
//! exactly while at least one cell in the participant's column carries its
//! id. Everything here is derived from a column scan.

use super::cell::{Cell, ClaimId, Holding};
use super::matrix::BeliefMatrix;
use crate::error::Inconsistency;
use crate::model::catalog::Token;
use crate::model::roster::Participant;
use std::collections::{BTreeMap, BTreeSet};

/// Open claim groups of one participant, keyed by id.
pub type ClaimGroups = BTreeMap<ClaimId, BTreeSet<Token>>;

impl BeliefMatrix {
    /// Aggregates the participant's pending cells by claim id.
    pub fn groups_for(&self, participant: Participant) -> ClaimGroups {
        let mut groups = ClaimGroups::new();
        for (token, cell) in self.column(participant) {
            for claim in cell.claims() {
                groups.entry(claim).or_default().insert(token);
            }
        }
        groups
    }

    /// Ids of the claim groups currently open against `participant`.
    pub fn open_claims(&self, participant: Participant) -> BTreeSet<ClaimId> {
        self.column(participant)
            .flat_map(|(_, cell)| cell.claims())
            .collect()
    }

    /// Records that `participant` showed one of `candidates` without the
    /// observer learning which.
    ///
    /// Returns `None` when the participant is already known to hold one of
    /// the candidates, since the disproof then carries no new information.
    pub(crate) fn open_group(
        &mut self,
        participant: Participant,
        candidates: &[Token],
    ) -> Result<Option<ClaimId>, Inconsistency> {
        if candidates.is_empty() {
            return Err(Inconsistency::EmptyClaim { participant });
        }
        for &token in candidates {
            match self.cell(token, participant) {
                Cell::Known(Holding::Lacks) => {
                    return Err(Inconsistency::ClaimOnExcluded { token, participant });
                }
                Cell::Known(Holding::Holds) => return Ok(None),
                Cell::Pending(_) => {}
            }
        }

        let claim = self.next_claim_id(participant);
        for &token in candidates {
            self.cell_mut(token, participant).add_claim(claim);
        }
        Ok(Some(claim))
    }

    /// Records that `participant` showed `token` to the observer.
    pub(crate) fn direct_reveal(
        &mut self,
        token: Token,
        participant: Participant,
    ) -> Result<bool, Inconsistency> {
        self.mark_yes(token, participant)
    }

    /// Smallest positive id not currently open for `participant`.
    fn next_claim_id(&self, participant: Participant) -> ClaimId {
        let open = self.open_claims(participant);
        let mut candidate = ClaimId::FIRST;
        while open.contains(&candidate) {
            candidate = candidate.next();
        }
        candidate
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Inconsistency;
    use crate::ledger::cell::ClaimId;
    use crate::ledger::matrix::BeliefMatrix;
    use crate::model::catalog::Token;
    use crate::model::roster::Participant;
    use std::collections::BTreeSet;

    fn t(index: usize) -> Token {
        Token::from_index(index)
    }

    fn p(index: usize) -> Participant {
        Participant::from_index(index)
    }

    fn id(value: u32) -> ClaimId {
        ClaimId::new(value).unwrap()
    }

    #[test]
    fn ids_reuse_the_smallest_free_slot() {
        let mut matrix = BeliefMatrix::new(6, 2);
        assert_eq!(matrix.open_group(p(0), &[t(0), t(1)]), Ok(Some(id(1))));
        assert_eq!(matrix.open_group(p(0), &[t(2), t(3)]), Ok(Some(id(2))));
        assert_eq!(matrix.open_group(p(1), &[t(2), t(3)]), Ok(Some(id(1))));

        matrix.mark_yes(t(0), p(0)).unwrap();
        assert_eq!(matrix.open_claims(p(0)), BTreeSet::from([id(2)]));
        assert_eq!(matrix.open_group(p(0), &[t(4), t(5)]), Ok(Some(id(1))));
        assert_eq!(matrix.open_group(p(0), &[t(3), t(5)]), Ok(Some(id(3))));
    }

    #[test]
    fn groups_aggregate_candidates_by_id() {
        let mut matrix = BeliefMatrix::new(5, 1);
        matrix.open_group(p(0), &[t(0), t(1), t(2)]).unwrap();
        matrix.open_group(p(0), &[t(2), t(4)]).unwrap();

        let groups = matrix.groups_for(p(0));
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&id(1)], BTreeSet::from([t(0), t(1), t(2)]));
        assert_eq!(groups[&id(2)], BTreeSet::from([t(2), t(4)]));
    }

    #[test]
    fn claims_on_excluded_tokens_are_rejected() {
        let mut matrix = BeliefMatrix::new(3, 1);
        matrix.mark_no(t(1), p(0)).unwrap();
        assert_eq!(
            matrix.open_group(p(0), &[t(0), t(1)]),
            Err(Inconsistency::ClaimOnExcluded {
                token: t(1),
                participant: p(0)
            })
        );
        assert_eq!(
            matrix.open_group(p(0), &[]),
            Err(Inconsistency::EmptyClaim { participant: p(0) })
        );
        assert!(matrix.groups_for(p(0)).is_empty());
    }

    #[test]
    fn claims_against_a_known_holding_are_redundant() {
        let mut matrix = BeliefMatrix::new(3, 1);
        matrix.direct_reveal(t(2), p(0)).unwrap();
        assert_eq!(matrix.open_group(p(0), &[t(0), t(2)]), Ok(None));
        assert!(matrix.open_claims(p(0)).is_empty());
    }
}
