//! Core domain types for ludo.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Number of cells on the shared circular track.
pub const TRACK_LENGTH: i8 = 52;

/// Sentinel relative position for a piece still in its start area.
pub const START_POSITION: i8 = -1;

/// Last relative position on the shared track.
pub const LAST_TRACK_POSITION: i8 = 50;

/// First relative position of the private home stretch.
pub const HOME_STRETCH_START: i8 = 51;

/// Terminal relative position; a piece here has arrived.
pub const HOME_POSITION: i8 = 57;

/// Pieces owned by each player.
pub const PIECES_PER_PLAYER: usize = 4;

/// The die face required to leave the start area.
pub const START_ROLL: u8 = 6;

/// Player color. Declaration order is seat order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
    strum::EnumString,
)]
pub enum Color {
    /// Seat 0 (blue on the physical board).
    A,
    /// Seat 1 (red).
    B,
    /// Seat 2 (green).
    C,
    /// Seat 3 (yellow).
    D,
}

impl Color {
    /// All colors in seat order.
    pub const ALL: [Color; 4] = [Color::A, Color::B, Color::C, Color::D];

    /// Returns this color's seat index (0-3).
    pub fn seat(self) -> usize {
        match self {
            Color::A => 0,
            Color::B => 1,
            Color::C => 2,
            Color::D => 3,
        }
    }

    /// Creates a color from a seat index.
    #[instrument]
    pub fn from_seat(seat: usize) -> Option<Self> {
        Self::ALL.get(seat).copied()
    }
}

/// Identifies one piece: its owner's color and its slot (0-3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PieceId {
    /// Owning color.
    pub color: Color,
    /// Slot within the owner's set of pieces.
    pub index: usize,
}

impl PieceId {
    /// Creates a new piece id.
    pub fn new(color: Color, index: usize) -> Self {
        Self { color, index }
    }
}

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.color, self.index + 1)
    }
}

/// A validated die face (1-6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DieValue(u8);

impl DieValue {
    /// Lowest face.
    pub const MIN: DieValue = DieValue(1);

    /// Highest face.
    pub const MAX: DieValue = DieValue(6);

    /// Creates a die value, rejecting anything outside 1-6.
    #[instrument]
    pub fn new(value: u8) -> Option<Self> {
        (1..=6).contains(&value).then_some(Self(value))
    }

    /// Returns the face value.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Returns true for the face that unlocks the start area and grants an extra roll.
    pub fn is_six(self) -> bool {
        self.0 == START_ROLL
    }

    /// Face value as a relative step count.
    pub fn steps(self) -> i8 {
        self.0 as i8
    }
}

impl TryFrom<u8> for DieValue {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("Die value {} is outside 1-6", value))
    }
}

impl From<DieValue> for u8 {
    fn from(value: DieValue) -> Self {
        value.0
    }
}

impl std::fmt::Display for DieValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_seat_round_trip() {
        for color in Color::iter() {
            assert_eq!(Color::from_seat(color.seat()), Some(color));
        }
        assert_eq!(Color::from_seat(4), None);
    }

    #[test]
    fn test_die_value_bounds() {
        assert!(DieValue::new(0).is_none());
        assert!(DieValue::new(7).is_none());
        assert_eq!(DieValue::new(6).map(DieValue::is_six), Some(true));
        assert_eq!(DieValue::new(3).map(DieValue::steps), Some(3));
    }

    #[test]
    fn test_die_value_rejects_bad_json() {
        assert!(serde_json::from_str::<DieValue>("9").is_err());
        assert_eq!(serde_json::from_str::<DieValue>("4").ok(), DieValue::new(4));
    }
}
