//! Command-line front end for split-storage sparse matrices.
//!
//! `info` summarizes a matrix file, `convert` rewrites it in another format
//! and `solve` runs one of the Krylov solvers on `A x = A·1`.

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};

mod commands;
mod input;
mod method;
mod report;

use commands::{ConvertArgs, InfoArgs, SolveArgs};

#[derive(Parser, Debug)]
#[command(
    name = "splitsparse",
    version,
    about = "Inspect and solve split-storage complex sparse systems"
)]
struct Cli {
    /// Log solver progress at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print shape, nonzero counts and memory use of a matrix file.
    Info(InfoArgs),
    /// Convert a matrix file to the text (or binary) format.
    Convert(ConvertArgs),
    /// Solve `A x = A·1` and report the error against the all-ones vector.
    Solve(SolveArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logger: {}", e))?;

    match cli.command {
        Command::Info(args) => commands::info(&args),
        Command::Convert(args) => commands::convert(&args),
        Command::Solve(args) => commands::solve(&args),
    }
}
