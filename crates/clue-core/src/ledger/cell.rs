use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Identifier of an open claim group, scoped to one participant's column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimId(u32);

impl ClaimId {
    pub const FIRST: ClaimId = ClaimId(1);

    /// Ids are positive; zero is rejected.
    pub const fn new(value: u32) -> Option<Self> {
        if value == 0 { None } else { Some(Self(value)) }
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub(crate) const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Settled state of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Holding {
    Holds,
    Lacks,
}

/// One `(token, participant)` entry of the belief matrix.
///
/// `Pending` carries the ids of the open claim groups this token is a
/// candidate for; an empty set means nothing is known yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Known(Holding),
    Pending(BTreeSet<ClaimId>),
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Pending(BTreeSet::new())
    }
}

impl Cell {
    pub const fn yes() -> Self {
        Cell::Known(Holding::Holds)
    }

    pub const fn no() -> Self {
        Cell::Known(Holding::Lacks)
    }

    pub const fn is_yes(&self) -> bool {
        matches!(self, Cell::Known(Holding::Holds))
    }

    pub const fn is_no(&self) -> bool {
        matches!(self, Cell::Known(Holding::Lacks))
    }

    pub const fn is_known(&self) -> bool {
        matches!(self, Cell::Known(_))
    }

    pub const fn holding(&self) -> Option<Holding> {
        match self {
            Cell::Known(holding) => Some(*holding),
            _ => None,
        }
    }

    /// Claim ids attached to a still-unknown cell; empty for known cells.
    pub fn claims(&self) -> impl Iterator<Item = ClaimId> + '_ {
        let claims = match self {
            Cell::Pending(claims) => Some(claims.iter().copied()),
            _ => None,
        };
        claims.into_iter().flatten()
    }

    pub fn has_claim(&self, claim: ClaimId) -> bool {
        matches!(self, Cell::Pending(claims) if claims.contains(&claim))
    }

    /// True for an unknown cell that no open claim group refers to.
    pub fn is_blank(&self) -> bool {
        matches!(self, Cell::Pending(claims) if claims.is_empty())
    }

    pub(crate) fn add_claim(&mut self, claim: ClaimId) {
        match self {
            Cell::Pending(claims) => {
                claims.insert(claim);
            }
            Cell::Known(_) => {}
        }
    }

    /// Drops every claim in `satisfied` from a pending cell.
    pub(crate) fn discard_claims(&mut self, satisfied: &BTreeSet<ClaimId>) -> bool {
        let Cell::Pending(claims) = self else {
            return false;
        };
        let before = claims.len();
        claims.retain(|claim| !satisfied.contains(claim));
        claims.len() != before
    }

    /// Replaces the cell with a settled value, returning the claims it carried.
    pub(crate) fn settle(&mut self, holding: Holding) -> BTreeSet<ClaimId> {
        match std::mem::replace(self, Cell::Known(holding)) {
            Cell::Pending(claims) => claims,
            _ => BTreeSet::new(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Known(Holding::Holds) => f.write_str("YES"),
            Cell::Known(Holding::Lacks) => f.write_str("NO"),
            Cell::Pending(claims) => {
                let mut first = true;
                for claim in claims {
                    if !first {
                        f.write_str(" ")?;
                    }
                    write!(f, "{claim}")?;
                    first = false;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cell, ClaimId, Holding};
    use std::collections::BTreeSet;

    fn id(value: u32) -> ClaimId {
        ClaimId::new(value).unwrap()
    }

    #[test]
    fn claim_ids_are_positive() {
        assert_eq!(ClaimId::new(0), None);
        assert_eq!(ClaimId::new(1), Some(ClaimId::FIRST));
        assert_eq!(ClaimId::FIRST.next().get(), 2);
    }

    #[test]
    fn display_matches_ledger_labels() {
        assert_eq!(Cell::yes().to_string(), "YES");
        assert_eq!(Cell::no().to_string(), "NO");
        assert_eq!(Cell::default().to_string(), "");
        let mut cell = Cell::default();
        cell.add_claim(id(3));
        cell.add_claim(id(1));
        assert_eq!(cell.to_string(), "1 3");
    }

    #[test]
    fn discarding_last_claim_returns_to_unknown() {
        let mut cell = Cell::default();
        cell.add_claim(id(2));
        assert!(!cell.is_blank());
        assert!(cell.discard_claims(&BTreeSet::from([id(2)])));
        assert_eq!(cell, Cell::default());
        assert!(cell.is_blank());
    }

    #[test]
    fn settling_hands_back_claims_and_ignores_new_ones() {
        let mut cell = Cell::default();
        cell.add_claim(id(1));
        cell.add_claim(id(4));
        let carried = cell.settle(Holding::Holds);
        assert_eq!(carried, BTreeSet::from([id(1), id(4)]));
        assert!(cell.is_yes());
        cell.add_claim(id(5));
        assert!(cell.is_yes());
        assert_eq!(cell.claims().count(), 0);
    }
}
