//! First-class invariants for ludo.
//!
//! Invariants are logical properties that must hold between moves.
//! They are testable independently and serve as documentation of system guarantees.

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for tuples of two to four invariants.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set.
    ///
    /// Returns Ok(()) if all invariants hold, or Err with a list of
    /// violations if any invariant fails.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

macro_rules! impl_invariant_set {
    ($($inv:ident),+) => {
        impl<S, $($inv),+> InvariantSet<S> for ($($inv,)+)
        where
            $($inv: Invariant<S>,)+
        {
            fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
                let mut violations = Vec::new();
                $(
                    if !$inv::holds(state) {
                        violations.push(InvariantViolation::new($inv::description()));
                    }
                )+
                if violations.is_empty() {
                    Ok(())
                } else {
                    Err(violations)
                }
            }
        }
    };
}

impl_invariant_set!(I1, I2);
impl_invariant_set!(I1, I2, I3);
impl_invariant_set!(I1, I2, I3, I4);

pub mod no_mixed_cells;
pub mod occupancy_consistent;
pub mod progress_bounded;
pub mod seat_strategy;

pub use no_mixed_cells::NoMixedCellsInvariant;
pub use occupancy_consistent::OccupancyConsistentInvariant;
pub use progress_bounded::ProgressBoundedInvariant;
pub use seat_strategy::SeatStrategyInvariant;

/// All table invariants as a composable set.
pub type TableInvariants = (
    OccupancyConsistentInvariant,
    NoMixedCellsInvariant,
    ProgressBoundedInvariant,
    SeatStrategyInvariant,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::ludo::{Color, PieceId, Table};

    #[test]
    fn test_invariant_set_holds_for_fresh_table() {
        let table = Table::new(|_| Some(false));
        assert!(TableInvariants::check_all(&table).is_ok());
    }

    #[test]
    fn test_invariant_set_detects_violations() {
        let mut table = Table::new(|_| Some(false));
        // Index a piece that is still in start
        table.board_mut().place(PieceId::new(Color::A, 0), 3);

        let violations = TableInvariants::check_all(&table).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].description,
            OccupancyConsistentInvariant::description()
        );
    }

    #[test]
    fn test_two_invariants_as_set() {
        let table = Table::new(|c| (c != Color::B).then_some(true));
        type TwoInvariants = (NoMixedCellsInvariant, ProgressBoundedInvariant);
        assert!(TwoInvariants::check_all(&table).is_ok());
    }
}
