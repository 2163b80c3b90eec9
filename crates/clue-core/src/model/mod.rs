pub mod catalog;
pub mod deal;
pub mod roster;
