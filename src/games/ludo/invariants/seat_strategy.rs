//! Seat invariant: automated seats never wait for manual selection.

use super::super::strategy::Strategy;
use super::super::Table;
use super::Invariant;

/// Invariant: a non-human player always uses the automated strategy.
pub struct SeatStrategyInvariant;

impl Invariant<Table> for SeatStrategyInvariant {
    fn holds(table: &Table) -> bool {
        table
            .players()
            .iter()
            .all(|p| p.is_human() || p.strategy() == Strategy::Automated)
    }

    fn description() -> &'static str {
        "Non-human players are automated"
    }
}
