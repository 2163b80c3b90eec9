use crate::ledger::ClaimId;
use crate::model::catalog::Token;
use crate::model::roster::Participant;
use crate::tracker::TrackerError;
use thiserror::Error;

/// Construction-time problems with the catalog, roster or observer hand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("catalog must contain at least one category")]
    EmptyCatalog,
    #[error("category '{0}' has no tokens")]
    EmptyCategory(String),
    #[error("token '{0}' is declared more than once")]
    DuplicateToken(String),
    #[error("roster must contain at least one participant")]
    EmptyRoster,
    #[error("names must not be empty")]
    BlankName,
    #[error("participant '{0}' is declared more than once")]
    DuplicateParticipant(String),
    #[error(
        "hand sizes sum to {hands}, but {tokens} tokens across {categories} categories leave {expected} to deal"
    )]
    HandSizeMismatch {
        hands: usize,
        tokens: usize,
        categories: usize,
        expected: usize,
    },
    #[error("observer '{observer}' declares a hand of {declared} but lists {held} own tokens")]
    ObserverHandMismatch {
        observer: String,
        declared: usize,
        held: usize,
    },
    #[error("own token '{0}' is listed more than once")]
    DuplicateOwnToken(String),
}

/// An observation or deduction that cannot be true alongside what the ledger
/// already knows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Inconsistency {
    #[error("{participant} is already known to hold {token}")]
    AlreadyHolds {
        token: Token,
        participant: Participant,
    },
    #[error("{participant} is already known not to hold {token}")]
    AlreadyLacks {
        token: Token,
        participant: Participant,
    },
    #[error("{token} is already held by {holder}")]
    HeldElsewhere { token: Token, holder: Participant },
    #[error("claim against {participant} names {token}, which they are known not to hold")]
    ClaimOnExcluded {
        token: Token,
        participant: Participant,
    },
    #[error("{participant} disproved a suggestion without any candidate token")]
    EmptyClaim { participant: Participant },
    #[error("every candidate of claim {claim} against {participant} has been ruled out")]
    ClaimExhausted {
        participant: Participant,
        claim: ClaimId,
    },
    #[error("{participant} holds {held} tokens but the hand only has {hand_size}")]
    HandOverflow {
        participant: Participant,
        held: usize,
        hand_size: usize,
    },
    #[error("{participant} lacks {lacking} tokens but at most {limit} can be absent")]
    LackOverflow {
        participant: Participant,
        lacking: usize,
        limit: usize,
    },
    #[error("open claims against {participant} need more than the {room} free slots in the hand")]
    ClaimsExceedHand { participant: Participant, room: usize },
    #[error("category {category} has more than one confirmed solution token")]
    SecondSolution { category: usize },
    #[error("every token in category {category} is held by someone")]
    NoCandidate { category: usize },
}

/// Errors surfaced by the ledger facade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("no participant at seat {0}")]
    UnknownParticipant(usize),
    #[error("no token with index {0}")]
    UnknownToken(usize),
    #[error("no category with index {0}")]
    UnknownCategory(usize),
    #[error("suggestion names {actual} tokens but must name one from each of {expected} categories")]
    WrongTokenCount { expected: usize, actual: usize },
    #[error("suggestion names more than one token from category '{0}'")]
    RepeatedCategory(String),
    #[error("shown {0} is not part of the suggestion")]
    ShownNotSuggested(Token),
    #[error("{0} cannot both pass and show")]
    ShowerAlsoPassed(Participant),
    #[error("{0} was shown but nobody showed it")]
    ShownWithoutShower(Token),
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    #[error("inconsistent observation: {0}")]
    Inconsistent(#[from] Inconsistency),
}
