use crate::error::ConfigError;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Dense index of a token inside its [`Catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(usize);

impl Token {
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token #{}", self.0)
    }
}

/// Named, ordered group of tokens. Exactly one member of each category is
/// part of the solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    tokens: Vec<Token>,
}

impl Category {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: Token) -> bool {
        self.tokens.contains(&token)
    }
}

const CLASSIC_SUSPECTS: [&str; 6] = ["Green", "Mustard", "Orchid", "Peacock", "Plum", "Scarlett"];
const CLASSIC_WEAPONS: [&str; 6] = ["Candlestick", "Dagger", "Pipe", "Revolver", "Rope", "Wrench"];
const CLASSIC_ROOMS: [&str; 9] = [
    "Ballroom",
    "Billiard",
    "Conservatory",
    "Dining",
    "Hall",
    "Kitchen",
    "Library",
    "Lounge",
    "Study",
];

/// Fixed enumeration of every token in play, partitioned into categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    categories: Vec<Category>,
    names: Vec<String>,
    category_of: Vec<usize>,
}

impl Catalog {
    /// The standard board-game set: six suspects, six weapons, nine rooms.
    pub fn classic() -> Self {
        let mut catalog = Self {
            categories: Vec::with_capacity(3),
            names: Vec::with_capacity(21),
            category_of: Vec::with_capacity(21),
        };
        catalog.push_category("Suspects", CLASSIC_SUSPECTS.iter().copied());
        catalog.push_category("Weapons", CLASSIC_WEAPONS.iter().copied());
        catalog.push_category("Rooms", CLASSIC_ROOMS.iter().copied());
        catalog
    }

    /// Builds a catalog from `(category, tokens)` pairs, preserving order.
    pub fn new<C, T, S>(categories: C) -> Result<Self, ConfigError>
    where
        C: IntoIterator<Item = (S, T)>,
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = Self {
            categories: Vec::new(),
            names: Vec::new(),
            category_of: Vec::new(),
        };
        let mut seen = HashSet::new();

        for (name, tokens) in categories {
            let name = name.as_ref().trim();
            if name.is_empty() {
                return Err(ConfigError::BlankName);
            }
            let tokens: Vec<String> = tokens
                .into_iter()
                .map(|token| token.as_ref().trim().to_string())
                .collect();
            if tokens.is_empty() {
                return Err(ConfigError::EmptyCategory(name.to_string()));
            }
            for token in &tokens {
                if token.is_empty() {
                    return Err(ConfigError::BlankName);
                }
                if !seen.insert(token.to_ascii_lowercase()) {
                    return Err(ConfigError::DuplicateToken(token.clone()));
                }
            }
            catalog.push_category(name, tokens.iter().map(String::as_str));
        }

        if catalog.categories.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        Ok(catalog)
    }

    fn push_category<'a>(&mut self, name: &str, tokens: impl Iterator<Item = &'a str>) {
        let category_index = self.categories.len();
        let mut members = Vec::new();
        for token in tokens {
            let token_id = Token::from_index(self.names.len());
            self.names.push(token.to_string());
            self.category_of.push(category_index);
            members.push(token_id);
        }
        self.categories.push(Category {
            name: name.to_string(),
            tokens: members,
        });
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    pub fn contains(&self, token: Token) -> bool {
        token.index() < self.names.len()
    }

    pub fn tokens(&self) -> impl Iterator<Item = Token> + use<> {
        (0..self.names.len()).map(Token::from_index)
    }

    /// Display name of `token`. Out-of-range tokens render as `"?"`.
    pub fn name(&self, token: Token) -> &str {
        self.names
            .get(token.index())
            .map(String::as_str)
            .unwrap_or("?")
    }

    /// Index of the category `token` belongs to.
    pub fn category_of(&self, token: Token) -> Option<usize> {
        self.category_of.get(token.index()).copied()
    }

    /// Exact, case-insensitive lookup by token name.
    pub fn find(&self, name: &str) -> Option<Token> {
        let needle = name.trim();
        self.names
            .iter()
            .position(|candidate| candidate.eq_ignore_ascii_case(needle))
            .map(Token::from_index)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
