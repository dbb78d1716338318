//! No cell is shared by two colors once a move has resolved.

use super::super::Table;
use super::Invariant;

/// Invariant: each indexed cell holds pieces of a single color.
///
/// Two colors may meet on a safe cell, so this only looks at cells where a
/// capture would have fired.
pub struct NoMixedCellsInvariant;

impl Invariant<Table> for NoMixedCellsInvariant {
    fn holds(table: &Table) -> bool {
        table.board().cells().all(|(_, pieces)| {
            let Some(first) = pieces.first() else {
                return true;
            };
            let unsafe_cell = table
                .piece(*first)
                .is_some_and(|p| !p.in_safe_zone());
            !unsafe_cell || pieces.iter().all(|p| p.color == first.color)
        })
    }

    fn description() -> &'static str {
        "No unsafe cell holds two colors"
    }
}
