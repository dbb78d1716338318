//! Dice collaborators.

use super::types::DieValue;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

/// Source of die rolls.
pub trait Dice {
    /// Rolls one die.
    fn roll(&mut self) -> DieValue;
}

/// Uniform random die.
#[derive(Debug, Clone)]
pub struct RandomDice {
    rng: StdRng,
}

impl RandomDice {
    /// Creates a die seeded from the operating system.
    #[instrument]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates a reproducible die.
    #[instrument]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomDice {
    fn default() -> Self {
        Self::new()
    }
}

impl Dice for RandomDice {
    fn roll(&mut self) -> DieValue {
        let face: u8 = self.rng.random_range(1..=6);
        debug!(face, "Rolled");
        // random_range(1..=6) never leaves the die's range
        DieValue::new(face).unwrap_or(DieValue::MIN)
    }
}

/// Die that plays back a fixed sequence, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    faces: Vec<DieValue>,
    cursor: usize,
}

impl ScriptedDice {
    /// Creates a scripted die.
    ///
    /// Returns `None` when the script is empty or holds a value outside 1-6.
    #[instrument]
    pub fn new(faces: &[u8]) -> Option<Self> {
        let faces = faces
            .iter()
            .map(|&face| DieValue::new(face))
            .collect::<Option<Vec<_>>>()?;
        (!faces.is_empty()).then_some(Self { faces, cursor: 0 })
    }

    /// Number of rolls made so far.
    pub fn rolls(&self) -> usize {
        self.cursor
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self) -> DieValue {
        let face = self.faces[self.cursor % self.faces.len()];
        self.cursor += 1;
        face
    }
}
