use clue_core::{ConfigError, LedgerError};
use clue_core::game::simulation::Simulation;
use clue_core::model::catalog::Catalog;
use clue_core::model::roster::{Participant, Roster};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::io::Write;
use thiserror::Error;
use tracing::{Level, event};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulateOptions {
    pub seed: u64,
    pub games: usize,
    pub players: usize,
    pub max_turns: usize,
}

impl Default for SimulateOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            games: 1,
            players: 3,
            max_turns: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameReport {
    pub game: usize,
    pub seed: u64,
    pub turns: usize,
    pub solution: Option<Vec<String>>,
    /// Whether the deduced solution matches the hidden one.
    pub correct: bool,
}

#[derive(Debug, Error)]
pub enum SimulateError {
    #[error("player count must be between {} and {}, got {0}", MIN_PLAYERS, MAX_PLAYERS)]
    PlayerCount(usize),
    #[error("invalid table: {0}")]
    Table(#[from] ConfigError),
    #[error("game {game}: {source}")]
    Game {
        game: usize,
        #[source]
        source: LedgerError,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Splits the dealt tokens of the classic set as evenly as possible, giving
/// any remainder to the earliest seats.
pub fn classic_roster(players: usize) -> Result<Roster, SimulateError> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
        return Err(SimulateError::PlayerCount(players));
    }
    let catalog = Catalog::classic();
    let dealt = catalog.len() - catalog.categories().len();
    let base = dealt / players;
    let extra = dealt % players;
    let roster = Roster::new((0..players).map(|seat| {
        let hand = base + usize::from(seat < extra);
        (format!("Player {}", seat + 1), hand)
    }))?;
    Ok(roster)
}

/// Plays `options.games` seeded games and writes one line per game.
pub fn simulate<W: Write>(
    options: SimulateOptions,
    out: &mut W,
) -> Result<Vec<GameReport>, SimulateError> {
    let roster = classic_roster(options.players)?;
    let mut seeds = StdRng::seed_from_u64(options.seed);
    let mut reports = Vec::with_capacity(options.games);

    for game in 1..=options.games {
        let seed = seeds.next_u64();
        let mut sim = Simulation::new(
            Catalog::classic(),
            roster.clone(),
            Participant::from_index(0),
            seed,
        )
        .map_err(|source| SimulateError::Game { game, source })?;
        let outcome = sim
            .run(options.max_turns)
            .map_err(|source| SimulateError::Game { game, source })?;

        let catalog = sim.ledger().catalog();
        let correct = outcome
            .solution
            .as_ref()
            .is_some_and(|solution| solution.tokens() == sim.deal().solution());
        let report = GameReport {
            game,
            seed,
            turns: outcome.turns,
            solution: outcome
                .solution
                .as_ref()
                .map(|solution| solution.names(catalog).map(str::to_string).collect()),
            correct,
        };
        event!(
            target: "clue_cli::simulate",
            Level::INFO,
            game,
            seed,
            turns = report.turns,
            solved = report.solution.is_some(),
            "game finished"
        );

        match &report.solution {
            Some(names) => writeln!(
                out,
                "game {game} (seed {seed}): solved in {} turns: {}{}",
                report.turns,
                names.join(", "),
                if correct { "" } else { " (WRONG)" }
            )?,
            None => writeln!(
                out,
                "game {game} (seed {seed}): unsolved after {} turns",
                report.turns
            )?,
        }
        reports.push(report);
    }

    let solved: Vec<usize> = reports
        .iter()
        .filter(|report| report.solution.is_some())
        .map(|report| report.turns)
        .collect();
    if !solved.is_empty() {
        let mean = solved.iter().sum::<usize>() as f64 / solved.len() as f64;
        writeln!(
            out,
            "solved {}/{} games, mean {mean:.1} turns",
            solved.len(),
            reports.len()
        )?;
    } else {
        writeln!(out, "solved 0/{} games", reports.len())?;
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::{SimulateError, SimulateOptions, classic_roster, simulate};

    #[test]
    fn rosters_split_the_dealt_tokens() {
        let roster = classic_roster(4).unwrap();
        let hands: Vec<usize> = roster
            .participants()
            .map(|p| roster.hand_size(p))
            .collect();
        assert_eq!(hands, vec![5, 5, 4, 4]);
        assert_eq!(roster.name(roster.participants().next().unwrap()), "Player 1");
        assert!(matches!(
            classic_roster(7),
            Err(SimulateError::PlayerCount(7))
        ));
    }

    #[test]
    fn simulated_games_are_reproducible() {
        let options = SimulateOptions {
            seed: 5,
            games: 3,
            ..SimulateOptions::default()
        };
        let mut first_out = Vec::new();
        let first = simulate(options, &mut first_out).unwrap();
        let mut second_out = Vec::new();
        let second = simulate(options, &mut second_out).unwrap();

        assert_eq!(first, second);
        assert_eq!(first_out, second_out);
        assert_eq!(first.len(), 3);
        assert!(first.iter().all(|report| report.correct));
        let text = String::from_utf8(first_out).unwrap();
        assert!(text.lines().last().unwrap().starts_with("solved 3/3 games"));
    }
}
