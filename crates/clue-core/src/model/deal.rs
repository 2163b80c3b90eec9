use crate::error::ConfigError;
use crate::model::catalog::{Catalog, Token};
use crate::model::roster::{Participant, Roster};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Hidden ground truth for one game: the solution and every hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    solution: Vec<Token>,
    hands: Vec<Vec<Token>>,
    holders: Vec<Option<Participant>>,
}

impl Deal {
    /// Picks one solution token per category, then deals the rest in seat
    /// order according to each participant's hand size.
    pub fn shuffled<R: rand::Rng + ?Sized>(
        catalog: &Catalog,
        roster: &Roster,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        check_hand_sizes(catalog, roster)?;

        let mut solution = Vec::with_capacity(catalog.categories().len());
        for category in catalog.categories() {
            if let Some(token) = category.tokens().choose(rng) {
                solution.push(*token);
            }
        }

        let mut pool: Vec<Token> = catalog
            .tokens()
            .filter(|token| !solution.contains(token))
            .collect();
        pool.shuffle(rng);

        let mut holders = vec![None; catalog.len()];
        let mut hands = Vec::with_capacity(roster.len());
        let mut remaining = pool.into_iter();
        for participant in roster.participants() {
            let mut hand: Vec<Token> = remaining
                .by_ref()
                .take(roster.hand_size(participant))
                .collect();
            hand.sort();
            for token in &hand {
                holders[token.index()] = Some(participant);
            }
            hands.push(hand);
        }

        Ok(Self {
            solution,
            hands,
            holders,
        })
    }

    pub fn shuffled_with_seed(
        catalog: &Catalog,
        roster: &Roster,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(catalog, roster, &mut rng)
    }

    /// Solution tokens, one per category in catalog order.
    pub fn solution(&self) -> &[Token] {
        &self.solution
    }

    pub fn hand(&self, participant: Participant) -> &[Token] {
        self.hands
            .get(participant.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn holder(&self, token: Token) -> Option<Participant> {
        self.holders.get(token.index()).copied().flatten()
    }

    pub fn is_solution(&self, token: Token) -> bool {
        self.solution.contains(&token)
    }
}

/// Verifies the hand sizes add up to the tokens left after one solution per
/// category. An oversized hand saturates the sum and is reported as a mismatch.
pub fn check_hand_sizes(catalog: &Catalog, roster: &Roster) -> Result<(), ConfigError> {
    let categories = catalog.categories().len();
    let hands = roster.total_hand_size();
    let expected = catalog.len().saturating_sub(categories);
    if hands != expected {
        return Err(ConfigError::HandSizeMismatch {
            hands,
            tokens: catalog.len(),
            categories,
            expected,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Deal, check_hand_sizes};
    use crate::error::ConfigError;
    use crate::model::catalog::Catalog;
    use crate::model::roster::Roster;

    fn classic_roster() -> Roster {
        Roster::new([("Alice", 6), ("Bob", 6), ("Carol", 6)]).unwrap()
    }

    #[test]
    fn deal_covers_every_token_exactly_once() {
        let catalog = Catalog::classic();
        let roster = classic_roster();
        let deal = Deal::shuffled_with_seed(&catalog, &roster, 7).unwrap();

        assert_eq!(deal.solution().len(), 3);
        for (index, token) in deal.solution().iter().enumerate() {
            assert_eq!(catalog.category_of(*token), Some(index));
            assert_eq!(deal.holder(*token), None);
        }
        for token in catalog.tokens() {
            let held = deal.holder(token).is_some();
            assert_ne!(held, deal.is_solution(token));
        }
        for participant in roster.participants() {
            assert_eq!(deal.hand(participant).len(), 6);
        }
    }

    #[test]
    fn seeded_deals_are_deterministic() {
        let catalog = Catalog::classic();
        let roster = classic_roster();
        let a = Deal::shuffled_with_seed(&catalog, &roster, 42).unwrap();
        let b = Deal::shuffled_with_seed(&catalog, &roster, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn deal_rejects_mismatched_hand_sizes() {
        let catalog = Catalog::classic();
        let roster = Roster::new([("Alice", 6), ("Bob", 6)]).unwrap();
        let err = Deal::shuffled_with_seed(&catalog, &roster, 1).unwrap_err();
        assert_eq!(
            err,
            ConfigError::HandSizeMismatch {
                hands: 12,
                tokens: 21,
                categories: 3,
                expected: 18,
            }
        );
    }

    #[test]
    fn oversized_hands_do_not_wrap_around() {
        let catalog = Catalog::classic();
        let roster = Roster::new([("Alice", usize::MAX), ("Bob", 18), ("Carol", 1)]).unwrap();
        assert_eq!(
            check_hand_sizes(&catalog, &roster),
            Err(ConfigError::HandSizeMismatch {
                hands: usize::MAX,
                tokens: 21,
                categories: 3,
                expected: 18,
            })
        );
    }
}
