//! The logical board: every player's pieces plus the occupancy index.
//!
//! All piece movement goes through [`Table::move_piece`] so that relative
//! positions and the occupancy index commit together.

use super::action::{Move, MoveOutcome, MoveResult};
use super::board::{is_safe, Board, Coordinate};
use super::piece::Piece;
use super::player::Player;
use super::types::{Color, PieceId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Pieces and board for a whole match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    board: Board,
    players: Vec<Player>,
}

impl Table {
    /// Creates a table with one player per color, in seat order.
    ///
    /// `seat` decides, per color, whether the seat is taken and by a human.
    #[instrument(skip(seat))]
    pub fn new(seat: impl Fn(Color) -> Option<bool>) -> Self {
        let players = Color::ALL
            .iter()
            .map(|&color| match seat(color) {
                Some(human) => Player::new(color, human),
                None => Player::vacant(color),
            })
            .collect();
        Self {
            board: Board::new(),
            players,
        }
    }

    /// Returns the occupancy index.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns all players in seat order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Returns the player of a color.
    pub fn player(&self, color: Color) -> &Player {
        &self.players[color.seat()]
    }

    pub(super) fn player_mut(&mut self, color: Color) -> &mut Player {
        &mut self.players[color.seat()]
    }

    /// Returns a piece by id.
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.player(id.color).piece(id.index)
    }

    /// Iterates over every piece on the table.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.players.iter().flat_map(|p| p.pieces().iter())
    }

    /// Moves a piece by a roll, resolving captures and the win condition.
    ///
    /// An illegal move returns [`MoveResult::InvalidMove`] and changes nothing.
    #[instrument(skip(self), fields(piece = %action.piece, roll = %action.roll))]
    pub fn move_piece(&mut self, action: Move) -> MoveOutcome {
        let id = action.piece;
        let Some(piece) = self.player_mut(id.color).piece_mut(id.index) else {
            warn!("No such piece");
            return MoveOutcome::rejected(action, super::types::START_POSITION);
        };
        let from = piece.relative();
        let Some(to) = piece.advance(action.roll) else {
            debug!(from, "Move rejected by piece");
            return MoveOutcome::rejected(action, from);
        };

        let destination = self.board.place(id, to);

        let captured = if matches!(destination, Coordinate::Track(_)) && !is_safe(id.color, to) {
            self.capture_at(destination, id)
        } else {
            Vec::new()
        };

        let result = if !captured.is_empty() {
            MoveResult::KnockedOutOpponent
        } else if self.player(id.color).has_won() {
            MoveResult::GameWon
        } else {
            MoveResult::Success
        };

        info!(from, to, %destination, %result, "Piece moved");
        MoveOutcome::new(action, result, from, to, destination, captured)
    }

    /// Sends every piece of another color on the coordinate back to start.
    fn capture_at(&mut self, coordinate: Coordinate, attacker: PieceId) -> Vec<PieceId> {
        let victims: Vec<PieceId> = self
            .board
            .occupants(coordinate)
            .iter()
            .copied()
            .filter(|p| p.color != attacker.color)
            .collect();
        for &victim in &victims {
            info!(%victim, %attacker, "Knocked out");
            self.return_to_start(victim);
        }
        victims
    }

    /// Unconditionally sends a piece back to its start area.
    #[instrument(skip(self))]
    pub fn return_to_start(&mut self, id: PieceId) -> Coordinate {
        self.board.remove(id);
        if let Some(piece) = self.player_mut(id.color).piece_mut(id.index) {
            piece.reset();
        }
        Coordinate::Start(id)
    }

    /// Puts a piece at a relative position without any rules check.
    ///
    /// Used to set up puzzle positions before a match starts.
    #[instrument(skip(self))]
    pub fn set_position(&mut self, id: PieceId, relative: i8) {
        let placed = Piece::at(id, relative);
        let Some(piece) = self.player_mut(id.color).piece_mut(id.index) else {
            warn!("No such piece");
            return;
        };
        *piece = placed;
        self.board.place(id, placed.relative());
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::ludo::types::{DieValue, HOME_POSITION, START_POSITION};

    fn die(v: u8) -> DieValue {
        DieValue::new(v).expect("valid die")
    }

    fn full_table() -> Table {
        Table::new(|_| Some(false))
    }

    #[test]
    fn test_leave_start_with_six() {
        let mut table = full_table();
        let id = PieceId::new(Color::A, 0);
        let outcome = table.move_piece(Move::new(id, die(6)));
        assert_eq!(*outcome.result(), MoveResult::Success);
        assert_eq!(*outcome.to(), 0);
        assert_eq!(*outcome.destination(), Coordinate::Track(1));
        assert_eq!(table.board().occupant_at(Color::A, 0), Some(id));
    }

    #[test]
    fn test_invalid_move_changes_nothing() {
        let mut table = full_table();
        let id = PieceId::new(Color::A, 0);
        let before = table.clone();
        let outcome = table.move_piece(Move::new(id, die(4)));
        assert_eq!(*outcome.result(), MoveResult::InvalidMove);
        assert_eq!(table, before);
    }

    #[test]
    fn test_capture_sends_victim_home() {
        let mut table = full_table();
        let attacker = PieceId::new(Color::A, 0);
        let victim = PieceId::new(Color::B, 0);
        table.set_position(attacker, 10);
        table.set_position(victim, 0);

        let outcome = table.move_piece(Move::new(attacker, die(3)));
        assert_eq!(*outcome.result(), MoveResult::KnockedOutOpponent);
        assert_eq!(outcome.captured(), &vec![victim]);
        assert_eq!(table.piece(victim).map(Piece::relative), Some(START_POSITION));
        assert_eq!(table.board().locate(victim), None);
        assert_eq!(table.board().occupant_at(Color::A, 13), Some(attacker));
    }

    #[test]
    fn test_safe_cell_shares() {
        let mut table = full_table();
        let mover = PieceId::new(Color::A, 0);
        let other = PieceId::new(Color::C, 0);
        table.set_position(mover, 4);
        table.set_position(other, 33);
        let outcome = table.move_piece(Move::new(mover, die(3)));
        assert_eq!(*outcome.result(), MoveResult::Success);
        assert_eq!(table.piece(other).map(Piece::relative), Some(33));
    }

    #[test]
    fn test_own_piece_is_never_captured() {
        let mut table = full_table();
        let first = PieceId::new(Color::A, 0);
        let second = PieceId::new(Color::A, 1);
        table.set_position(first, 10);
        table.set_position(second, 12);
        let outcome = table.move_piece(Move::new(first, die(2)));
        assert_eq!(*outcome.result(), MoveResult::Success);
        assert_eq!(table.board().occupants(Coordinate::Track(13)), &[second, first]);
    }

    #[test]
    fn test_arrival_without_win() {
        let mut table = full_table();
        let id = PieceId::new(Color::B, 2);
        table.set_position(id, 55);
        let outcome = table.move_piece(Move::new(id, die(2)));
        assert_eq!(*outcome.result(), MoveResult::Success);
        assert_eq!(*outcome.destination(), Coordinate::Home(Color::B));
    }

    #[test]
    fn test_last_arrival_wins() {
        let mut table = full_table();
        for index in 0..3 {
            table.set_position(PieceId::new(Color::D, index), HOME_POSITION);
        }
        let last = PieceId::new(Color::D, 3);
        table.set_position(last, 55);
        let outcome = table.move_piece(Move::new(last, die(2)));
        assert_eq!(*outcome.result(), MoveResult::GameWon);
    }

    #[test]
    fn test_return_to_start_clears_occupancy() {
        let mut table = full_table();
        let id = PieceId::new(Color::C, 1);
        table.set_position(id, 20);
        assert_eq!(table.return_to_start(id), Coordinate::Start(id));
        assert_eq!(table.board().locate(id), None);
        assert!(table.piece(id).is_some_and(Piece::in_start_area));
    }
}
