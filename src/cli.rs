//! Command-line interface for strictly_ludo.

use clap::{Parser, Subcommand};

/// Strictly Ludo - Type-safe ludo rules engine
#[derive(Parser, Debug)]
#[command(name = "strictly_ludo")]
#[command(about = "Type-safe ludo rules engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a match in the terminal
    Simulate {
        /// Path to a match config (TOML). Flags below override it.
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Number of players (2-4)
        #[arg(short, long)]
        players: Option<u8>,

        /// Seed for the random die
        #[arg(short, long)]
        seed: Option<u64>,

        /// Colors played from stdin (e.g. A,C)
        #[arg(long, value_delimiter = ',')]
        humans: Vec<strictly_ludo::Color>,

        /// Give up after this many rolls
        #[arg(long, default_value = "10000")]
        max_rolls: usize,

        /// Print only the final snapshot
        #[arg(short, long)]
        quiet: bool,
    },

    /// Validate a match config and print it back
    Config {
        /// Path to the config file
        path: std::path::PathBuf,
    },
}
