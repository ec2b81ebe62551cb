//! CLI command definitions and dispatch.

pub mod check;
pub mod coerce;

use clap::{Parser, Subcommand};

/// Rivet — configuration-driven dependency injection.
#[derive(Parser, Debug)]
#[command(name = "rivet", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Print machine-readable JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse binding and value files and list their entries.
    Check(check::CheckArgs),
    /// Preview the coercion of a value directive.
    Coerce(coerce::CoerceArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Check(args) => check::execute(&args, cli.json),
        Command::Coerce(args) => coerce::execute(&args, cli.json),
    }
}
