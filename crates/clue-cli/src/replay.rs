use crate::render;
use crate::script::{ResolvedGame, Turn};
use clue_core::LedgerError;
use clue_core::game::serialization::LedgerSnapshot;
use clue_core::ledger::Ledger;
use std::io::Write;
use thiserror::Error;
use tracing::{Level, event};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayOptions {
    /// Print the final snapshot as JSON instead of grids.
    pub json: bool,
    /// Skip the per-turn grids.
    pub quiet: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaySummary {
    pub turns: usize,
    /// First turn (1-based) after which the solution was known.
    pub solved_after: Option<usize>,
    pub solution: Option<Vec<String>>,
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("cannot set up the ledger: {0}")]
    Setup(#[source] LedgerError),
    #[error("turn {turn}: {source}")]
    Turn {
        turn: usize,
        #[source]
        source: LedgerError,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Feeds every turn of `game` to a fresh ledger, writing progress to `out`.
pub fn replay<W: Write>(
    game: &ResolvedGame,
    options: ReplayOptions,
    out: &mut W,
) -> Result<ReplaySummary, ReplayError> {
    let mut ledger = Ledger::new(
        game.catalog.clone(),
        game.roster.clone(),
        game.observer,
        &game.own,
    )
    .map_err(ReplayError::Setup)?;
    let text = !options.json;

    let mut solved_after = ledger.solve().map(|_| 0);
    for (index, turn) in game.turns.iter().enumerate() {
        let number = index + 1;
        let report = ledger
            .update(&turn.tokens, &turn.passing, turn.shower, turn.shown)
            .map_err(|source| ReplayError::Turn {
                turn: number,
                source,
            })?;
        event!(
            target: "clue_cli::replay",
            Level::INFO,
            turn = number,
            passes = report.passes,
            firings = report.total_firings(),
            "turn applied"
        );
        if solved_after.is_none() && ledger.solve().is_some() {
            solved_after = Some(number);
        }

        if text && !options.quiet {
            writeln!(out, "Turn {number}: {}", describe(&ledger, turn))?;
            write!(out, "{}", render::grid(&ledger))?;
            writeln!(out)?;
        }
    }

    let solution = ledger
        .solve()
        .map(|solution| solution.names(ledger.catalog()).map(str::to_string).collect());
    if text {
        if let Some(turn) = solved_after {
            writeln!(out, "Solved after turn {turn}")?;
        }
        writeln!(out, "{}", render::solution_line(&ledger))?;
    } else {
        writeln!(out, "{}", LedgerSnapshot::to_json(&ledger)?)?;
    }

    Ok(ReplaySummary {
        turns: game.turns.len(),
        solved_after,
        solution,
    })
}

/// One-line summary of a turn, e.g. `Bob suggests Plum, Rope, Hall; Carol passed; Alice showed Rope`.
pub fn describe(ledger: &Ledger, turn: &Turn) -> String {
    let catalog = ledger.catalog();
    let roster = ledger.roster();
    let tokens: Vec<&str> = turn.tokens.iter().map(|t| catalog.name(*t)).collect();
    let mut line = format!(
        "{} suggests {}",
        roster.name(turn.suggester),
        tokens.join(", ")
    );
    if !turn.passing.is_empty() {
        let names: Vec<&str> = turn.passing.iter().map(|p| roster.name(*p)).collect();
        line.push_str(&format!("; {} passed", names.join(", ")));
    }
    match (turn.shower, turn.shown) {
        (Some(shower), Some(token)) => line.push_str(&format!(
            "; {} showed {}",
            roster.name(shower),
            catalog.name(token)
        )),
        (Some(shower), None) => {
            line.push_str(&format!("; {} showed a card", roster.name(shower)));
        }
        (None, _) => line.push_str("; nobody could disprove"),
    }
    line
}
