//! Progress invariant: relative positions stay on the route.

use super::super::types::{HOME_POSITION, START_POSITION};
use super::super::Table;
use super::Invariant;

/// Invariant: every relative position lies in -1..=57.
pub struct ProgressBoundedInvariant;

impl Invariant<Table> for ProgressBoundedInvariant {
    fn holds(table: &Table) -> bool {
        table
            .pieces()
            .all(|p| (START_POSITION..=HOME_POSITION).contains(&p.relative()))
    }

    fn description() -> &'static str {
        "Relative positions stay between start and home"
    }
}
