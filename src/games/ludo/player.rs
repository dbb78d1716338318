//! A seated color: its pieces, seat flags and move strategy.

use super::board::Board;
use super::piece::Piece;
use super::strategy::Strategy;
use super::types::{Color, DieValue, PieceId, PIECES_PER_PLAYER};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Error raised when a player's strategy would break its seat rules.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("{} is automated and cannot use manual selection", color)]
pub struct StrategyError {
    /// The automated color.
    pub color: Color,
}

/// One player of the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    color: Color,
    pieces: [Piece; PIECES_PER_PLAYER],
    human: bool,
    active: bool,
    strategy: Strategy,
}

impl Player {
    /// Seats a player with every piece in start.
    ///
    /// Human players default to manual selection; everyone else is automated.
    #[instrument]
    pub fn new(color: Color, human: bool) -> Self {
        let pieces = std::array::from_fn(|index| Piece::new(PieceId::new(color, index)));
        Self {
            color,
            pieces,
            human,
            active: true,
            strategy: if human {
                Strategy::Manual
            } else {
                Strategy::Automated
            },
        }
    }

    /// An unseated color: present on the table, never takes a turn.
    #[instrument]
    pub fn vacant(color: Color) -> Self {
        Self {
            active: false,
            ..Self::new(color, false)
        }
    }

    /// Returns the player's color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns true if a person picks this player's moves.
    pub fn is_human(&self) -> bool {
        self.human
    }

    /// Returns true while the player still takes turns.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the move strategy.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Returns all four pieces.
    pub fn pieces(&self) -> &[Piece; PIECES_PER_PLAYER] {
        &self.pieces
    }

    /// Returns one piece by slot.
    pub fn piece(&self, index: usize) -> Option<&Piece> {
        self.pieces.get(index)
    }

    pub(super) fn piece_mut(&mut self, index: usize) -> Option<&mut Piece> {
        self.pieces.get_mut(index)
    }

    /// Swaps the strategy.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError`] when an automated player is given manual selection.
    #[instrument(skip(self), fields(color = %self.color))]
    pub fn set_strategy(&mut self, strategy: Strategy) -> Result<(), StrategyError> {
        if !self.human && strategy == Strategy::Manual {
            return Err(StrategyError { color: self.color });
        }
        debug!(?strategy, "Strategy changed");
        self.strategy = strategy;
        Ok(())
    }

    pub(super) fn deactivate(&mut self) {
        self.active = false;
    }

    /// True if any piece can move by the roll.
    #[instrument(skip(self), fields(color = %self.color))]
    pub fn has_movable_pieces(&self, roll: DieValue) -> bool {
        self.pieces.iter().any(|p| p.can_move(roll))
    }

    /// Pieces that can move by the roll, in slot order.
    #[instrument(skip(self), fields(color = %self.color))]
    pub fn movable_pieces(&self, roll: DieValue) -> Vec<PieceId> {
        self.pieces
            .iter()
            .filter(|p| p.can_move(roll))
            .map(Piece::id)
            .collect()
    }

    /// Asks the strategy for the piece to move.
    #[instrument(skip(self, board), fields(color = %self.color))]
    pub fn best_piece_to_move(&self, board: &Board, roll: DieValue) -> Option<PieceId> {
        self.strategy.best_move(self, board, roll)
    }

    /// True once every piece has arrived.
    pub fn has_won(&self) -> bool {
        self.pieces.iter().all(Piece::has_arrived)
    }
}
