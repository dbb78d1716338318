//! Move selection: manual (deferred to a person) or automated.

use super::board::{is_safe, Board};
use super::piece::Piece;
use super::player::Player;
use super::types::{DieValue, PieceId, LAST_TRACK_POSITION};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// How a player's moves are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Strategy {
    /// Waits for a piece to be chosen from outside the engine.
    Manual,
    /// Picks a move by fixed priority.
    Automated,
}

impl Strategy {
    /// Returns the piece this strategy would move, if it decides on its own.
    ///
    /// Manual selection never decides. Automated selection picks, in order:
    /// 1. a piece leaving start on a six,
    /// 2. a piece whose move captures an opponent,
    /// 3. the piece furthest along, earliest slot on ties.
    #[instrument(skip(player, board), fields(color = %player.color()))]
    pub fn best_move(self, player: &Player, board: &Board, roll: DieValue) -> Option<PieceId> {
        match self {
            Strategy::Manual => None,
            Strategy::Automated => automated_choice(player.pieces(), board, roll),
        }
    }
}

fn automated_choice(pieces: &[Piece], board: &Board, roll: DieValue) -> Option<PieceId> {
    let movable: Vec<&Piece> = pieces.iter().filter(|p| p.can_move(roll)).collect();

    if roll.is_six()
        && let Some(piece) = movable.iter().find(|p| p.in_start_area())
    {
        debug!(piece = %piece.id(), "Leaving start");
        return Some(piece.id());
    }

    if let Some(piece) = movable.iter().find(|p| would_capture(p, board, roll)) {
        debug!(piece = %piece.id(), "Capturing");
        return Some(piece.id());
    }

    // max_by_key keeps the last maximum; fold keeps the first
    let furthest = movable.iter().fold(None::<&&Piece>, |best, p| match best {
        Some(b) if b.relative() >= p.relative() => Some(b),
        _ => Some(p),
    });
    furthest.map(|p| p.id())
}

/// True when moving the piece by the roll would capture an opponent.
#[instrument(skip(piece, board), fields(piece = %piece.id()))]
pub fn would_capture(piece: &Piece, board: &Board, roll: DieValue) -> bool {
    let color = piece.id().color;
    let Some(target) = piece.target(roll) else {
        return false;
    };
    if target > LAST_TRACK_POSITION || is_safe(color, target) {
        return false;
    }
    board
        .occupant_at(color, target)
        .is_some_and(|occupant| occupant.color != color)
}
