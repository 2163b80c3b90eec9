use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use clue_cli::logging::init_logging;
use clue_cli::replay::{ReplayOptions, replay};
use clue_cli::script::GameScript;
use clue_cli::simulate::{SimulateOptions, simulate};
use clue_core::AppInfo;

/// Deduction notebook for Clue-style games.
#[derive(Debug, Parser)]
#[command(
    name = "clue-notes",
    author,
    version,
    about = "Tracks who can hold which card and names the solution"
)]
struct Cli {
    /// Tracing level (trace, debug, info, warn, error). RUST_LOG overrides it.
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replay a recorded game script and print what the observer can deduce.
    Replay {
        /// Path to the YAML game script.
        #[arg(value_name = "FILE")]
        script: PathBuf,

        /// Print the final ledger snapshot as JSON instead of grids.
        #[arg(long)]
        json: bool,

        /// Only print the final result.
        #[arg(long)]
        quiet: bool,
    },
    /// Play seeded games with random suggestions and report solve times.
    Simulate {
        /// Seed for the sequence of deals.
        #[arg(long, value_name = "SEED", default_value_t = 0)]
        seed: u64,

        /// Number of games to play.
        #[arg(long, value_name = "COUNT", default_value_t = 1)]
        games: usize,

        /// Players at the table, including the observer.
        #[arg(long, value_name = "COUNT", default_value_t = 3)]
        players: usize,

        /// Give up on a game after this many turns.
        #[arg(long, value_name = "TURNS", default_value_t = 500)]
        max_turns: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_json)?;
    tracing::debug!(
        target: "clue_cli",
        app = AppInfo::name(),
        codename = AppInfo::codename(),
        version = AppInfo::version(),
        "starting"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Replay {
            script,
            json,
            quiet,
        } => {
            let game = GameScript::from_path(&script)?.resolve()?;
            replay(&game, ReplayOptions { json, quiet }, &mut out)?;
        }
        Command::Simulate {
            seed,
            games,
            players,
            max_turns,
        } => {
            let options = SimulateOptions {
                seed,
                games,
                players,
                max_turns,
            };
            simulate(options, &mut out)?;
        }
    }
    Ok(())
}
