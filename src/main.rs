//! Strictly Ludo - Unified CLI
//!
//! Plays matches in the terminal and checks match configs.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use std::io::BufRead;
use std::path::PathBuf;
use std::rc::Rc;
use strictly_ludo::{
    Color, ConsolePresenter, MatchBuilder, MatchConfig, Phase, PieceId, Transition,
    TurnController,
};
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn,strictly_ludo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Simulate {
            config,
            players,
            seed,
            humans,
            max_rolls,
            quiet,
        } => {
            let config = load_config(config, players, seed, humans)?;
            run_simulation(config, max_rolls, quiet)
        }
        Command::Config { path } => check_config(path),
    }
}

/// Builds the match config from an optional file plus command-line overrides.
#[instrument(skip_all)]
fn load_config(
    path: Option<PathBuf>,
    players: Option<u8>,
    seed: Option<u64>,
    humans: Vec<Color>,
) -> Result<MatchConfig> {
    let mut config = match path {
        Some(path) => MatchConfig::from_file(&path)
            .with_context(|| format!("Loading {}", path.display()))?,
        None => MatchConfig::default(),
    };
    if let Some(players) = players {
        config = config.with_player_count(players);
    }
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    if !humans.is_empty() {
        config = config.with_humans(humans);
    }
    debug!(?config, "Match config resolved");
    Ok(config)
}

/// Plays one match, reading human input from stdin.
#[instrument(skip(config))]
fn run_simulation(config: MatchConfig, max_rolls: usize, quiet: bool) -> Result<()> {
    let presenter = Rc::new(if quiet {
        ConsolePresenter::quiet()
    } else {
        ConsolePresenter::new()
    });
    let mut controller = MatchBuilder::new(config)
        .random_dice()
        .observer(presenter.clone())
        .build()?;

    info!("Match started");
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    let mut rolls = 0;

    while !controller.phase().is_terminal() && rolls < max_rolls {
        match controller.phase() {
            Phase::AwaitingRoll => {
                let color = controller.current_player();
                if controller.table().player(color).is_human() {
                    println!("{} to roll, press enter", color);
                    if lines.next().transpose()?.is_none() {
                        warn!("Input closed before the match ended");
                        break;
                    }
                }
                if controller.roll_dice()?.is_accepted() {
                    rolls += 1;
                }
            }
            Phase::AwaitingMoveChoice => {
                let Some(piece) = ask_for_piece(&controller, &mut lines)? else {
                    warn!("Input closed before the match ended");
                    break;
                };
                if let Transition::Ignored(rejection) = controller.piece_chosen(piece)? {
                    println!("{}", rejection);
                }
            }
            phase => bail!("Controller stuck in {}", phase),
        }
    }

    info!(rolls, events = presenter.count(), winner = ?controller.winner(), "Match finished");
    println!("{}", serde_json::to_string_pretty(&controller.snapshot())?);
    Ok(())
}

/// Prompts for a piece slot (1-4) among the movable pieces.
fn ask_for_piece(
    controller: &TurnController,
    lines: &mut impl Iterator<Item = std::io::Result<String>>,
) -> Result<Option<PieceId>> {
    let color = controller.current_player();
    let candidates = controller
        .movable_pieces()
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    loop {
        println!("{} pick a piece ({})", color, candidates);
        let Some(line) = lines.next().transpose()? else {
            return Ok(None);
        };
        match line.trim().parse::<usize>() {
            Ok(slot @ 1..=4) => return Ok(Some(PieceId::new(color, slot - 1))),
            _ => println!("Enter a slot number from 1 to 4"),
        }
    }
}

/// Validates a config file and prints its normalized form.
#[instrument(skip_all, fields(path = %path.display()))]
fn check_config(path: PathBuf) -> Result<()> {
    let config = MatchConfig::from_file(&path)?;
    let seats = config.validate()?;
    info!(?seats, "Config is valid");
    print!("{}", config.to_toml()?);
    Ok(())
}
