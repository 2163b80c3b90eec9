use crate::ledger::{Cell, Holding, Ledger};
use serde::{Deserialize, Serialize};

/// Serializable view of a ledger, for rendering or export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerSnapshot {
    pub observer: String,
    pub participants: Vec<ParticipantEntry>,
    pub rows: Vec<TokenRow>,
    #[serde(default)]
    pub solution: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParticipantEntry {
    pub name: String,
    pub hand_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenRow {
    pub token: String,
    pub category: String,
    pub cells: Vec<CellEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum CellEntry {
    Known(String),
    Claims(Vec<u32>),
}

impl From<&Cell> for CellEntry {
    fn from(cell: &Cell) -> Self {
        match cell {
            Cell::Known(Holding::Holds) => CellEntry::Known("YES".to_string()),
            Cell::Known(Holding::Lacks) => CellEntry::Known("NO".to_string()),
            Cell::Pending(claims) => CellEntry::Claims(claims.iter().map(|c| c.get()).collect()),
        }
    }
}

impl LedgerSnapshot {
    pub fn capture(ledger: &Ledger) -> Self {
        let catalog = ledger.catalog();
        let roster = ledger.roster();
        let participants = roster
            .participants()
            .map(|participant| ParticipantEntry {
                name: roster.name(participant).to_string(),
                hand_size: roster.hand_size(participant),
            })
            .collect();

        let mut rows = Vec::with_capacity(catalog.len());
        for category in catalog.categories() {
            for &token in category.tokens() {
                rows.push(TokenRow {
                    token: catalog.name(token).to_string(),
                    category: category.name().to_string(),
                    cells: ledger
                        .matrix()
                        .row(token)
                        .iter()
                        .map(CellEntry::from)
                        .collect(),
                });
            }
        }

        LedgerSnapshot {
            observer: roster.name(ledger.observer()).to_string(),
            participants,
            rows,
            solution: ledger
                .solve()
                .map(|solution| solution.names(catalog).map(str::to_string).collect()),
        }
    }

    pub fn to_json(ledger: &Ledger) -> serde_json::Result<String> {
        let snapshot = Self::capture(ledger);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
