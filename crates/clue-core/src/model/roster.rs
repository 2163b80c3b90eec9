use crate::error::ConfigError;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Seat index of a participant inside its [`Roster`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Participant(usize);

impl Participant {
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "participant #{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Seat {
    name: String,
    hand_size: usize,
}

/// Ordered list of participants and the number of tokens each holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    seats: Vec<Seat>,
}

impl Roster {
    pub fn new<I, S>(seats: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (S, usize)>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut roster = Vec::new();
        for (name, hand_size) in seats {
            let name = name.as_ref().trim();
            if name.is_empty() {
                return Err(ConfigError::BlankName);
            }
            if !seen.insert(name.to_ascii_lowercase()) {
                return Err(ConfigError::DuplicateParticipant(name.to_string()));
            }
            roster.push(Seat {
                name: name.to_string(),
                hand_size,
            });
        }

        if roster.is_empty() {
            return Err(ConfigError::EmptyRoster);
        }
        Ok(Self { seats: roster })
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn contains(&self, participant: Participant) -> bool {
        participant.index() < self.seats.len()
    }

    pub fn participants(&self) -> impl Iterator<Item = Participant> + use<> {
        (0..self.seats.len()).map(Participant::from_index)
    }

    /// Display name of `participant`. Out-of-range seats render as `"?"`.
    pub fn name(&self, participant: Participant) -> &str {
        self.seats
            .get(participant.index())
            .map(|seat| seat.name.as_str())
            .unwrap_or("?")
    }

    pub fn hand_size(&self, participant: Participant) -> usize {
        self.seats
            .get(participant.index())
            .map(|seat| seat.hand_size)
            .unwrap_or(0)
    }

    /// Sum of all hand sizes, saturating at `usize::MAX`.
    pub fn total_hand_size(&self) -> usize {
        self.seats
            .iter()
            .fold(0usize, |total, seat| total.saturating_add(seat.hand_size))
    }

    /// Exact, case-insensitive lookup by participant name.
    pub fn find(&self, name: &str) -> Option<Participant> {
        let needle = name.trim();
        self.seats
            .iter()
            .position(|seat| seat.name.eq_ignore_ascii_case(needle))
            .map(Participant::from_index)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.seats.iter().map(|seat| seat.name.as_str())
    }

    /// Seats in table order starting after `from`, wrapping around and
    /// excluding `from` itself.
    pub fn after(&self, from: Participant) -> impl Iterator<Item = Participant> + use<> {
        let count = self.seats.len();
        let start = from.index();
        (1..count).map(move |offset| Participant::from_index((start + offset) % count))
    }
}
