use crate::lookup::{self, LookupError};
use clue_core::model::catalog::{Catalog, Token};
use clue_core::model::roster::{Participant, Roster};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A recorded game as seen by one participant, loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GameScript {
    pub observer: String,
    pub players: Vec<PlayerEntry>,
    pub own: Vec<String>,
    #[serde(default)]
    pub catalog: Option<Vec<CategoryEntry>>,
    #[serde(default)]
    pub turns: Vec<TurnEntry>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PlayerEntry {
    pub name: String,
    pub hand: usize,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CategoryEntry {
    pub name: String,
    pub tokens: Vec<String>,
}

/// One suggestion with every name still a free-form prefix.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TurnEntry {
    pub suggester: String,
    pub tokens: Vec<String>,
    #[serde(default)]
    pub passing: Vec<String>,
    #[serde(default)]
    pub shower: Option<String>,
    #[serde(default)]
    pub shown: Option<String>,
}

/// A script with every name resolved against its catalog and roster.
#[derive(Debug, Clone)]
pub struct ResolvedGame {
    pub catalog: Catalog,
    pub roster: Roster,
    pub observer: Participant,
    pub own: Vec<Token>,
    pub turns: Vec<Turn>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub suggester: Participant,
    pub tokens: Vec<Token>,
    pub passing: Vec<Participant>,
    pub shower: Option<Participant>,
    pub shown: Option<Token>,
}

impl GameScript {
    /// Load a game script from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ScriptError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let script: GameScript =
            serde_yaml::from_reader(reader).map_err(|source| ScriptError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        script.validate().map_err(|source| ScriptError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(script)
    }

    /// Structural checks that need no name resolution.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.observer.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "observer".to_string(),
                message: "observer must not be empty".to_string(),
            });
        }
        if self.players.is_empty() {
            return Err(ValidationError::InvalidField {
                field: "players".to_string(),
                message: "at least one player must be listed".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for (index, player) in self.players.iter().enumerate() {
            if player.name.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: format!("players[{index}].name"),
                    message: "player name must not be empty".to_string(),
                });
            }
            if !seen.insert(player.name.trim().to_lowercase()) {
                return Err(ValidationError::InvalidField {
                    field: format!("players[{index}].name"),
                    message: format!("player '{}' listed more than once", player.name),
                });
            }
        }

        if let Some(categories) = &self.catalog {
            if categories.is_empty() {
                return Err(ValidationError::InvalidField {
                    field: "catalog".to_string(),
                    message: "catalog must list at least one category".to_string(),
                });
            }
            for (index, category) in categories.iter().enumerate() {
                if category.tokens.is_empty() {
                    return Err(ValidationError::InvalidField {
                        field: format!("catalog[{index}].tokens"),
                        message: format!("category '{}' has no tokens", category.name),
                    });
                }
            }
        }

        for (index, turn) in self.turns.iter().enumerate() {
            if turn.tokens.is_empty() {
                return Err(ValidationError::InvalidField {
                    field: format!("turns[{index}].tokens"),
                    message: "a suggestion must name at least one token".to_string(),
                });
            }
            if turn.shown.is_some() && turn.shower.is_none() {
                return Err(ValidationError::InvalidField {
                    field: format!("turns[{index}].shown"),
                    message: "a shown token needs a shower".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Resolves every name by prefix and builds the ledger inputs.
    pub fn resolve(&self) -> Result<ResolvedGame, ValidationError> {
        let catalog = match &self.catalog {
            Some(categories) => Catalog::new(categories.iter().map(|category| {
                (
                    category.name.as_str(),
                    category.tokens.iter().map(String::as_str),
                )
            }))
            .map_err(|err| ValidationError::InvalidField {
                field: "catalog".to_string(),
                message: err.to_string(),
            })?,
            None => Catalog::classic(),
        };
        let roster = Roster::new(
            self.players
                .iter()
                .map(|player| (player.name.as_str(), player.hand)),
        )
        .map_err(|err| ValidationError::InvalidField {
            field: "players".to_string(),
            message: err.to_string(),
        })?;

        let observer = resolve_participant(&roster, &self.observer, "observer")?;
        let own = self
            .own
            .iter()
            .enumerate()
            .map(|(index, name)| resolve_token(&catalog, name, &format!("own[{index}]")))
            .collect::<Result<Vec<_>, _>>()?;

        let turns = self
            .turns
            .iter()
            .enumerate()
            .map(|(index, turn)| turn.resolve(&catalog, &roster, index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ResolvedGame {
            catalog,
            roster,
            observer,
            own,
            turns,
        })
    }
}

impl TurnEntry {
    fn resolve(
        &self,
        catalog: &Catalog,
        roster: &Roster,
        index: usize,
    ) -> Result<Turn, ValidationError> {
        let field = |name: &str| format!("turns[{index}].{name}");

        let suggester = resolve_participant(roster, &self.suggester, &field("suggester"))?;
        let tokens = self
            .tokens
            .iter()
            .map(|name| resolve_token(catalog, name, &field("tokens")))
            .collect::<Result<Vec<_>, _>>()?;
        let passing = self
            .passing
            .iter()
            .map(|name| resolve_participant(roster, name, &field("passing")))
            .collect::<Result<Vec<_>, _>>()?;
        let shower = self
            .shower
            .as_deref()
            .map(|name| resolve_participant(roster, name, &field("shower")))
            .transpose()?;
        let shown = self
            .shown
            .as_deref()
            .map(|name| resolve_token(catalog, name, &field("shown")))
            .transpose()?;

        if passing.contains(&suggester) || shower == Some(suggester) {
            return Err(ValidationError::InvalidField {
                field: field("suggester"),
                message: "the suggester cannot answer their own suggestion".to_string(),
            });
        }

        Ok(Turn {
            suggester,
            tokens,
            passing,
            shower,
            shown,
        })
    }
}

fn resolve_token(catalog: &Catalog, name: &str, field: &str) -> Result<Token, ValidationError> {
    lookup::token(catalog, name).map_err(|source| ValidationError::Lookup {
        field: field.to_string(),
        source,
    })
}

fn resolve_participant(
    roster: &Roster,
    name: &str,
    field: &str,
) -> Result<Participant, ValidationError> {
    lookup::participant(roster, name).map_err(|source| ValidationError::Lookup {
        field: field.to_string(),
        source,
    })
}

/// Errors surfaced when loading game scripts.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse script {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid script {path:?}: {source}")]
    Invalid {
        #[source]
        source: ValidationError,
        path: PathBuf,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
    #[error("{field}: {source}")]
    Lookup {
        field: String,
        #[source]
        source: LookupError,
    },
}
