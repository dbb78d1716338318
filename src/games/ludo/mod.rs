//! Four-color race-and-capture rules engine.

mod action;
mod board;
mod contracts;
mod controller;
mod dice;
mod events;
pub mod invariants;
mod phases;
mod piece;
mod player;
mod strategy;
mod table;
mod types;

pub use action::{Move, MoveError, MoveOutcome, MoveResult};
pub use board::{
    entry_offset, global_position, is_safe, path_index, relative_position, start_offset, Board,
    Coordinate, SAFE_INDICES,
};
pub use contracts::{Contract, LegalMove, MoveContract, PieceCanMove, PlayersTurn};
pub use controller::{
    MatchBuilder, MatchError, MatchSnapshot, PlayerSnapshot, TurnController,
};
pub use dice::{Dice, RandomDice, ScriptedDice};
pub use events::{EventChannel, EventLog, GameEvent, Observer, ObserverId};
pub use phases::{EngineFault, Phase, Rejection, Transition};
pub use piece::{Piece, PieceState};
pub use player::{Player, StrategyError};
pub use strategy::{would_capture, Strategy};
pub use table::Table;
pub use types::{
    Color, DieValue, PieceId, HOME_POSITION, HOME_STRETCH_START, LAST_TRACK_POSITION,
    PIECES_PER_PLAYER, START_POSITION, START_ROLL, TRACK_LENGTH,
};
