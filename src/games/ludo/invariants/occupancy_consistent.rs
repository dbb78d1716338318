//! Occupancy invariant: the index mirrors the pieces' own positions.

use super::super::board::{Board, Coordinate};
use super::super::Table;
use super::Invariant;

/// Invariant: every indexed piece stands where the index says, and every
/// piece on an indexed cell is recorded exactly once.
///
/// Verified by rebuilding the index from the pieces and comparing.
pub struct OccupancyConsistentInvariant;

impl Invariant<Table> for OccupancyConsistentInvariant {
    fn holds(table: &Table) -> bool {
        let mut rebuilt = Board::new();
        for piece in table.pieces() {
            if Coordinate::of(piece.id(), piece.relative()).is_indexed() {
                rebuilt.place(piece.id(), piece.relative());
            }
        }

        // Stack order depends on move history, so compare as sets
        let sorted = |board: &Board| {
            board
                .cells()
                .map(|(coordinate, pieces)| {
                    let mut pieces = pieces.to_vec();
                    pieces.sort();
                    (*coordinate, pieces)
                })
                .collect::<Vec<_>>()
        };
        sorted(&rebuilt) == sorted(table.board())
    }

    fn description() -> &'static str {
        "Occupancy index matches piece positions"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::ludo::{Color, PieceId};

    #[test]
    fn test_placed_pieces_hold() {
        let mut table = Table::new(|_| Some(false));
        table.set_position(PieceId::new(Color::A, 0), 12);
        table.set_position(PieceId::new(Color::A, 1), 12);
        table.set_position(PieceId::new(Color::B, 0), 53);
        assert!(OccupancyConsistentInvariant::holds(&table));
    }

    #[test]
    fn test_stale_record_violates() {
        let mut table = Table::new(|_| Some(false));
        let id = PieceId::new(Color::C, 2);
        table.set_position(id, 20);
        table.board_mut().remove(id);
        assert!(!OccupancyConsistentInvariant::holds(&table));
    }
}
