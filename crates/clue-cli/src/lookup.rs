//! Case-insensitive prefix resolution for the names typed into game scripts.

use clue_core::model::catalog::{Catalog, Token};
use clue_core::model::roster::{Participant, Roster};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("empty name")]
    EmptyPrefix,
    #[error("no {kind} starts with '{prefix}'")]
    NoMatch { kind: &'static str, prefix: String },
}

/// Index of the first name starting with `prefix`, ignoring case.
///
/// Ambiguous prefixes resolve to the earliest entry.
pub fn by_prefix<'a, I>(names: I, prefix: &str, kind: &'static str) -> Result<usize, LookupError>
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = prefix.trim().to_lowercase();
    if needle.is_empty() {
        return Err(LookupError::EmptyPrefix);
    }
    names
        .into_iter()
        .position(|name| name.to_lowercase().starts_with(&needle))
        .ok_or_else(|| LookupError::NoMatch {
            kind,
            prefix: prefix.trim().to_string(),
        })
}

pub fn token(catalog: &Catalog, prefix: &str) -> Result<Token, LookupError> {
    by_prefix(catalog.names(), prefix, "token").map(Token::from_index)
}

pub fn participant(roster: &Roster, prefix: &str) -> Result<Participant, LookupError> {
    by_prefix(roster.names(), prefix, "participant").map(Participant::from_index)
}

#[cfg(test)]
mod tests {
    use super::{LookupError, by_prefix, participant, token};
    use clue_core::model::catalog::Catalog;
    use clue_core::model::roster::Roster;

    #[test]
    fn prefixes_match_case_insensitively() {
        let catalog = Catalog::classic();
        assert_eq!(catalog.name(token(&catalog, "cand").unwrap()), "Candlestick");
        assert_eq!(catalog.name(token(&catalog, "LIB").unwrap()), "Library");
        assert_eq!(catalog.name(token(&catalog, " Rope ").unwrap()), "Rope");
    }

    #[test]
    fn ambiguous_prefix_takes_the_first_entry() {
        let names = ["Peacock", "Plum", "Pipe"];
        assert_eq!(by_prefix(names, "p", "token"), Ok(0));
        assert_eq!(by_prefix(names, "pi", "token"), Ok(2));
    }

    #[test]
    fn missing_and_empty_prefixes_are_rejected() {
        let roster = Roster::new([("Alice", 9), ("Bob", 9)]).unwrap();
        assert_eq!(
            participant(&roster, "zed"),
            Err(LookupError::NoMatch {
                kind: "participant",
                prefix: "zed".to_string()
            })
        );
        assert_eq!(participant(&roster, "  "), Err(LookupError::EmptyPrefix));
        assert_eq!(participant(&roster, "b").unwrap().index(), 1);
    }
}
