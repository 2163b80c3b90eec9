#![deny(warnings)]
pub mod error;
pub mod game;
pub mod ledger;
pub mod model;
pub mod tracker;

pub use error::{ConfigError, Inconsistency, LedgerError};
pub use ledger::{Ledger, Solution};

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "clue-notes"
    }

    pub const fn codename() -> &'static str {
        "Detective Notebook"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
