pub mod serialization;
pub mod simulation;
