//! Token × participant grid of belief cells.

use super::cell::{Cell, ClaimId, Holding};
use crate::error::Inconsistency;
use crate::model::catalog::Token;
use crate::model::roster::Participant;

/// Row-major grid: one row per token, one column per participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeliefMatrix {
    tokens: usize,
    participants: usize,
    cells: Vec<Cell>,
}

impl BeliefMatrix {
    /// Creates a matrix with every cell unknown.
    pub fn new(tokens: usize, participants: usize) -> Self {
        Self {
            tokens,
            participants,
            cells: vec![Cell::default(); tokens * participants],
        }
    }

    pub fn token_count(&self) -> usize {
        self.tokens
    }

    pub fn participant_count(&self) -> usize {
        self.participants
    }

    /// Returns the cell for `(token, participant)`, or `None` when either
    /// index falls outside the grid.
    pub fn get(&self, token: Token, participant: Participant) -> Option<&Cell> {
        if token.index() >= self.tokens || participant.index() >= self.participants {
            return None;
        }
        self.cells.get(self.slot(token, participant))
    }

    /// Cells of `token` in seat order.
    pub fn row(&self, token: Token) -> &[Cell] {
        let start = (token.index() * self.participants).min(self.cells.len());
        let end = (start + self.participants).min(self.cells.len());
        &self.cells[start..end]
    }

    /// Cells of `participant` in token order. Empty for a seat outside the grid.
    pub fn column(&self, participant: Participant) -> impl Iterator<Item = (Token, &Cell)> {
        (0..self.tokens).filter_map(move |index| {
            let token = Token::from_index(index);
            self.get(token, participant).map(|cell| (token, cell))
        })
    }

    /// The participant known to hold `token`, if any.
    pub fn holder(&self, token: Token) -> Option<Participant> {
        self.row(token)
            .iter()
            .position(Cell::is_yes)
            .map(Participant::from_index)
    }

    /// Participants not yet ruled out as holders of `token`.
    pub fn open_holders(&self, token: Token) -> impl Iterator<Item = Participant> + '_ {
        self.row(token)
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_no())
            .map(|(index, _)| Participant::from_index(index))
    }

    pub fn yes_count(&self, participant: Participant) -> usize {
        self.column(participant).filter(|(_, cell)| cell.is_yes()).count()
    }

    pub fn no_count(&self, participant: Participant) -> usize {
        self.column(participant).filter(|(_, cell)| cell.is_no()).count()
    }

    /// True when nobody is known to hold `token`.
    pub fn is_possible(&self, token: Token) -> bool {
        !self.row(token).iter().any(Cell::is_yes)
    }

    /// True when every participant is known not to hold `token`.
    pub fn is_solution(&self, token: Token) -> bool {
        let row = self.row(token);
        !row.is_empty() && row.iter().all(Cell::is_no)
    }

    /// Marks `participant` as holding `token`.
    ///
    /// Claim groups the cell belonged to are satisfied by this token, so
    /// their ids are dropped from the participant's other cells. Excluding
    /// the other participants from the row is left to the rule engine.
    pub(crate) fn mark_yes(
        &mut self,
        token: Token,
        participant: Participant,
    ) -> Result<bool, Inconsistency> {
        match self.cell(token, participant) {
            Cell::Known(Holding::Holds) => return Ok(false),
            Cell::Known(Holding::Lacks) => {
                return Err(Inconsistency::AlreadyLacks { token, participant });
            }
            Cell::Pending(_) => {}
        }
        if let Some(holder) = self.holder(token) {
            return Err(Inconsistency::HeldElsewhere { token, holder });
        }

        let satisfied = self.cell_mut(token, participant).settle(Holding::Holds);
        if !satisfied.is_empty() {
            for index in 0..self.tokens {
                let other = Token::from_index(index);
                if other != token {
                    self.cell_mut(other, participant).discard_claims(&satisfied);
                }
            }
        }
        Ok(true)
    }

    /// Marks `participant` as not holding `token`.
    ///
    /// Fails if the cell is already `YES`, or if this removes the last
    /// candidate of an open claim group.
    pub(crate) fn mark_no(
        &mut self,
        token: Token,
        participant: Participant,
    ) -> Result<bool, Inconsistency> {
        match self.cell(token, participant) {
            Cell::Known(Holding::Lacks) => return Ok(false),
            Cell::Known(Holding::Holds) => {
                return Err(Inconsistency::AlreadyHolds { token, participant });
            }
            Cell::Pending(_) => {}
        }

        let dropped = self.cell_mut(token, participant).settle(Holding::Lacks);
        for claim in dropped {
            if !self.claim_is_open(participant, claim) {
                return Err(Inconsistency::ClaimExhausted { participant, claim });
            }
        }
        Ok(true)
    }

    /// Sets every unknown cell in `token`'s row to `holding`.
    pub(crate) fn fill_row(&mut self, token: Token, holding: Holding) -> Result<bool, Inconsistency> {
        let mut changed = false;
        for index in 0..self.participants {
            let participant = Participant::from_index(index);
            if !self.cell(token, participant).is_known() {
                changed |= self.settle(token, participant, holding)?;
            }
        }
        Ok(changed)
    }

    /// Sets every unknown cell in `participant`'s column to `holding`.
    pub(crate) fn fill_column(
        &mut self,
        participant: Participant,
        holding: Holding,
    ) -> Result<bool, Inconsistency> {
        let mut changed = false;
        for index in 0..self.tokens {
            let token = Token::from_index(index);
            if !self.cell(token, participant).is_known() {
                changed |= self.settle(token, participant, holding)?;
            }
        }
        Ok(changed)
    }

    pub(crate) fn settle(
        &mut self,
        token: Token,
        participant: Participant,
        holding: Holding,
    ) -> Result<bool, Inconsistency> {
        match holding {
            Holding::Holds => self.mark_yes(token, participant),
            Holding::Lacks => self.mark_no(token, participant),
        }
    }

    pub(crate) fn claim_is_open(&self, participant: Participant, claim: ClaimId) -> bool {
        self.column(participant)
            .any(|(_, cell)| cell.has_claim(claim))
    }

    pub(crate) fn cell(&self, token: Token, participant: Participant) -> &Cell {
        &self.cells[self.slot(token, participant)]
    }

    pub(crate) fn cell_mut(&mut self, token: Token, participant: Participant) -> &mut Cell {
        let slot = self.slot(token, participant);
        &mut self.cells[slot]
    }

    fn slot(&self, token: Token, participant: Participant) -> usize {
        token.index() * self.participants + participant.index()
    }
}
