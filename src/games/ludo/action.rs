//! First-class action types for ludo.
//!
//! A move is a domain event: a piece and the roll it spends. It can be
//! validated before it is applied and logged or replayed afterwards.

use super::board::Coordinate;
use super::types::{Color, DieValue, PieceId};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A move: one piece advanced by one roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The piece being moved.
    pub piece: PieceId,
    /// The roll spent on the move.
    pub roll: DieValue,
}

impl Move {
    /// Creates a new move.
    #[instrument]
    pub fn new(piece: PieceId, roll: DieValue) -> Self {
        Self { piece, roll }
    }

    /// Returns the color making this move.
    pub fn color(&self) -> Color {
        self.piece.color
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} +{}", self.piece, self.roll)
    }
}

/// Result code of applying a move to a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum MoveResult {
    /// The piece moved.
    Success,
    /// The move was illegal; nothing changed.
    InvalidMove,
    /// The piece moved and sent at least one opponent back to start.
    KnockedOutOpponent,
    /// The piece arrived home and so did all of its siblings.
    GameWon,
}

impl MoveResult {
    /// True when the move committed.
    pub fn is_applied(self) -> bool {
        !matches!(self, MoveResult::InvalidMove)
    }
}

/// Everything a presenter needs to know about a resolved move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct MoveOutcome {
    /// The move that was attempted.
    action: Move,
    /// Result code.
    result: MoveResult,
    /// Relative position before the move.
    from: i8,
    /// Relative position after the move.
    to: i8,
    /// World coordinate the piece now stands on.
    destination: Coordinate,
    /// Opponent pieces sent back to start, in board order.
    captured: Vec<PieceId>,
}

impl MoveOutcome {
    pub(super) fn new(
        action: Move,
        result: MoveResult,
        from: i8,
        to: i8,
        destination: Coordinate,
        captured: Vec<PieceId>,
    ) -> Self {
        Self {
            action,
            result,
            from,
            to,
            destination,
            captured,
        }
    }

    /// An outcome that changed nothing.
    pub(super) fn rejected(action: Move, relative: i8) -> Self {
        Self::new(
            action,
            MoveResult::InvalidMove,
            relative,
            relative,
            Coordinate::of(action.piece, relative),
            Vec::new(),
        )
    }
}

/// Error raised when a move is checked against the match state.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The piece does not belong to the player whose turn it is.
    #[display("It's not {}'s turn", _0)]
    WrongPlayer(Color),

    /// The piece cannot move by the roll.
    #[display("{} cannot move by {}", _0, _1)]
    IllegalMove(PieceId, DieValue),

    /// The piece does not exist.
    #[display("No piece {}", _0)]
    NoSuchPiece(PieceId),

    /// An invariant was violated (postcondition failure).
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for MoveError {}
