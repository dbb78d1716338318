//! Contract-based validation for ludo moves.
//!
//! Contracts define correctness through preconditions and postconditions.
//! They formalize the Hoare-style reasoning: {P} action {Q}

use super::action::{Move, MoveError};
use super::invariants::{InvariantSet, TableInvariants};
use super::types::Color;
use super::Table;
use tracing::instrument;

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// A contract defines preconditions and postconditions for state transitions.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), MoveError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), MoveError>;
}

// ─────────────────────────────────────────────────────────────
//  Move Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the piece belongs to the player whose turn it is.
pub struct PlayersTurn;

impl PlayersTurn {
    /// Checks the move's color against the current player.
    #[instrument]
    pub fn check(mov: &Move, current: Color) -> Result<(), MoveError> {
        if mov.color() != current {
            Err(MoveError::WrongPlayer(mov.color()))
        } else {
            Ok(())
        }
    }
}

/// Precondition: the piece exists and can move by the roll.
pub struct PieceCanMove;

impl PieceCanMove {
    /// Checks the piece's own movement rules.
    #[instrument(skip(table))]
    pub fn check(mov: &Move, table: &Table) -> Result<(), MoveError> {
        let piece = table
            .piece(mov.piece)
            .ok_or(MoveError::NoSuchPiece(mov.piece))?;
        if piece.can_move(mov.roll) {
            Ok(())
        } else {
            Err(MoveError::IllegalMove(mov.piece, mov.roll))
        }
    }
}

/// Composite precondition: right player, movable piece.
pub struct LegalMove;

impl LegalMove {
    /// Validates all preconditions for a move.
    #[instrument(skip(table))]
    pub fn check(mov: &Move, table: &Table, current: Color) -> Result<(), MoveError> {
        PlayersTurn::check(mov, current)?;
        PieceCanMove::check(mov, table)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  Move Contract (Pre + Post)
// ─────────────────────────────────────────────────────────────

/// Contract for move actions on the table.
///
/// Preconditions:
/// - The piece can move by the roll
///
/// Postconditions:
/// - Occupancy index mirrors piece positions
/// - No unsafe cell holds two colors
/// - Positions stay on the route
/// - Automated seats stay automated
pub struct MoveContract;

impl Contract<Table, Move> for MoveContract {
    fn pre(table: &Table, action: &Move) -> Result<(), MoveError> {
        PieceCanMove::check(action, table)
    }

    fn post(_before: &Table, after: &Table) -> Result<(), MoveError> {
        TableInvariants::check_all(after).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            MoveError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::ludo::{DieValue, PieceId};

    fn die(v: u8) -> DieValue {
        DieValue::new(v).expect("valid die")
    }

    #[test]
    fn test_precondition_needs_six_from_start() {
        let table = Table::new(|_| Some(false));
        let piece = PieceId::new(Color::A, 0);
        assert!(MoveContract::pre(&table, &Move::new(piece, die(6))).is_ok());
        assert_eq!(
            MoveContract::pre(&table, &Move::new(piece, die(2))),
            Err(MoveError::IllegalMove(piece, die(2)))
        );
    }

    #[test]
    fn test_precondition_wrong_turn() {
        let table = Table::new(|_| Some(false));
        let action = Move::new(PieceId::new(Color::B, 0), die(6));
        assert_eq!(
            LegalMove::check(&action, &table, Color::A),
            Err(MoveError::WrongPlayer(Color::B))
        );
    }

    #[test]
    fn test_precondition_unknown_piece() {
        let table = Table::new(|_| Some(false));
        let action = Move::new(PieceId::new(Color::A, 9), die(6));
        assert!(matches!(
            LegalMove::check(&action, &table, Color::A),
            Err(MoveError::NoSuchPiece(_))
        ));
    }

    #[test]
    fn test_postcondition_holds_after_move() {
        let before = Table::new(|_| Some(false));
        let mut after = before.clone();
        after.move_piece(Move::new(PieceId::new(Color::A, 0), die(6)));
        assert!(MoveContract::post(&before, &after).is_ok());
    }

    #[test]
    fn test_postcondition_detects_corruption() {
        let before = Table::new(|_| Some(false));
        let mut after = before.clone();
        after.board_mut().place(PieceId::new(Color::B, 1), 20);
        assert!(matches!(
            MoveContract::post(&before, &after),
            Err(MoveError::InvariantViolation(_))
        ));
    }
}
