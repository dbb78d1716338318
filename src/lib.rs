//! Strictly Ludo library - a type-safe ludo rules engine
//!
//! The engine decides whose turn it is, which moves are legal, what a
//! capture does and when the match ends. Presentation (rendering, sound,
//! animation) lives outside and listens through the event channel.
//!
//! # Architecture
//!
//! - **Board**: pure track topology plus the occupancy index
//! - **Piece / Player**: per-piece progress and per-color strategy
//! - **TurnController**: the turn state machine
//! - **EventChannel**: synchronous fan-out to presenters
//!
//! # Example
//!
//! ```no_run
//! use strictly_ludo::{MatchBuilder, MatchConfig, Phase};
//!
//! # fn example() -> anyhow::Result<()> {
//! let mut controller = MatchBuilder::new(MatchConfig::new(4).with_seed(7))
//!     .random_dice()
//!     .build()?;
//!
//! while controller.phase() != Phase::Concluded {
//!     controller.roll_dice()?;
//! }
//! println!("{:?} wins", controller.winner());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod games;
mod match_config;
mod presenter;

// Crate-level exports - Configuration
pub use match_config::{ConfigError, ConfigErrorKind, MatchConfig};

// Crate-level exports - Console presenter
pub use presenter::ConsolePresenter;

// Crate-level exports - Invariants
pub use games::ludo::invariants;

// Crate-level exports - Game types (ludo)
pub use games::ludo::{
    entry_offset, global_position, is_safe, path_index, relative_position, start_offset,
    would_capture, Board, Color, Contract, Coordinate, Dice, DieValue, EngineFault, EventChannel,
    EventLog, GameEvent, LegalMove, MatchBuilder, MatchError, MatchSnapshot, Move, MoveContract,
    MoveError, MoveOutcome, MoveResult, Observer, ObserverId, Phase, Piece, PieceCanMove,
    PieceId, PieceState, Player, PlayerSnapshot, PlayersTurn, RandomDice, Rejection,
    ScriptedDice, Strategy, StrategyError, Table, Transition, TurnController, HOME_POSITION,
    HOME_STRETCH_START, LAST_TRACK_POSITION, PIECES_PER_PLAYER, SAFE_INDICES, START_POSITION,
    START_ROLL, TRACK_LENGTH,
};
