use super::Ledger;
use crate::error::LedgerError;
use crate::model::catalog::{Catalog, Token};
use serde::{Deserialize, Serialize};

/// The one unheld token of every category, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Solution {
    tokens: Vec<Token>,
}

impl Solution {
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn names<'a>(&'a self, catalog: &'a Catalog) -> impl Iterator<Item = &'a str> {
        self.tokens.iter().map(|token| catalog.name(*token))
    }
}

impl Ledger {
    /// True when no participant is known to hold `token`.
    pub fn is_possible(&self, token: Token) -> Result<bool, LedgerError> {
        self.check_token(token)?;
        Ok(self.matrix.is_possible(token))
    }

    /// True when every participant is known not to hold `token`.
    pub fn is_solution(&self, token: Token) -> Result<bool, LedgerError> {
        self.check_token(token)?;
        Ok(self.matrix.is_solution(token))
    }

    /// Tokens of `category` that may still be its solution. A confirmed
    /// solution is returned on its own.
    pub fn candidates(&self, category: usize) -> Result<Vec<Token>, LedgerError> {
        let category = self
            .catalog
            .category(category)
            .ok_or(LedgerError::UnknownCategory(category))?;
        if let Some(solved) = category
            .tokens()
            .iter()
            .copied()
            .find(|token| self.matrix.is_solution(*token))
        {
            return Ok(vec![solved]);
        }
        Ok(category
            .tokens()
            .iter()
            .copied()
            .filter(|token| self.matrix.is_possible(*token))
            .collect())
    }

    /// Returns the solution once every category is down to one candidate.
    pub fn solve(&self) -> Option<Solution> {
        let mut tokens = Vec::with_capacity(self.catalog.categories().len());
        for index in 0..self.catalog.categories().len() {
            let candidates = self.candidates(index).ok()?;
            match candidates.as_slice() {
                [only] => tokens.push(*only),
                _ => return None,
            }
        }
        Some(Solution { tokens })
    }
}
