//! Turn phases and the vocabulary the controller answers with.

use super::action::MoveOutcome;
use super::types::{Color, DieValue, PieceId};
use serde::{Deserialize, Serialize};

/// Where the turn state machine stands.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum Phase {
    /// Waiting for the current player's roll.
    AwaitingRoll,
    /// Waiting for a person to pick one of the movable pieces.
    AwaitingMoveChoice,
    /// A move is being resolved. Never observable between calls.
    ApplyingMove,
    /// Someone won. Terminal.
    Concluded,
}

impl Phase {
    /// True once the match is over.
    pub fn is_terminal(self) -> bool {
        self == Phase::Concluded
    }
}

/// Why an input was ignored.
///
/// Rejections never change match state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Rejection {
    /// The input is not accepted in this phase.
    #[display("Not accepted while {}", _0)]
    OutOfPhase(Phase),
    /// The input came from a player whose turn it is not.
    #[display("It's not {}'s turn", _0)]
    NotYourTurn(Color),
    /// The die value was outside 1-6.
    #[display("{} is not a die face", _0)]
    InvalidDie(u8),
    /// The chosen piece belongs to someone else.
    #[display("{} belongs to another player", _0)]
    ForeignPiece(PieceId),
    /// The chosen piece cannot move by the last roll.
    #[display("{} cannot move by {}", _0, _1)]
    IllegalPiece(PieceId, DieValue),
    /// The match is over.
    #[display("The match is over")]
    Concluded,
}

/// What a stimulus did to the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Input was ignored; nothing changed.
    Ignored(Rejection),
    /// A person must now pick a piece.
    AwaitingChoice(Vec<PieceId>),
    /// No piece could move; the turn went to the next player.
    TurnPassed {
        /// Player who rolled.
        from: Color,
        /// Player now to roll.
        to: Color,
    },
    /// A move was applied and play continues.
    Moved {
        /// The resolved move.
        outcome: MoveOutcome,
        /// Player now to roll (the mover on an extra turn).
        next: Color,
    },
    /// A move won the match.
    Won {
        /// The winning move.
        outcome: MoveOutcome,
        /// The winner.
        winner: Color,
    },
}

impl Transition {
    /// True if the input changed the match.
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Transition::Ignored(_))
    }
}

/// Internal-consistency fault: the phase gating was bypassed somehow.
///
/// These never happen in correct operation.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum EngineFault {
    /// A move the controller checked as legal was refused by the piece.
    #[display("Move of {} by {} was pre-checked but rejected", piece, roll)]
    RejectedLegalMove {
        /// The piece.
        piece: PieceId,
        /// The roll.
        roll: DieValue,
    },
    /// Advancing the turn wrapped around without finding another active player.
    #[display("No other active player after {}", _0)]
    NoActivePlayer(Color),
    /// The table broke an invariant after a move.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for EngineFault {}
