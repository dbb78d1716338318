//! Board topology and the occupancy index.
//!
//! Two numbering schemes coexist on the shared track:
//! - the *global* index (`start_offset`), used for captures and safe cells
//! - the *path* index (`entry_offset`), used by presenters to index a
//!   52-entry array of track cells
//!
//! They differ by exactly one cell for every color. Rules code only ever
//! uses the global index.

use super::types::{
    Color, PieceId, HOME_POSITION, HOME_STRETCH_START, LAST_TRACK_POSITION, START_POSITION,
    TRACK_LENGTH,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument, trace};

/// Global track indices on which no capture can happen.
pub const SAFE_INDICES: [u8; 8] = [0, 8, 13, 21, 26, 34, 39, 47];

/// Offset of a color's relative position zero in the global numbering.
#[instrument]
pub fn start_offset(color: Color) -> u8 {
    match color {
        Color::A => 1,
        Color::B => 14,
        Color::C => 27,
        Color::D => 40,
    }
}

/// Offset of a color's relative position zero in the presenter's path array.
#[instrument]
pub fn entry_offset(color: Color) -> u8 {
    match color {
        Color::A => 0,
        Color::B => 13,
        Color::C => 26,
        Color::D => 39,
    }
}

/// Maps a relative position to a global track index.
///
/// Returns `None` when the piece is not on the shared track.
#[instrument]
pub fn global_position(color: Color, relative: i8) -> Option<u8> {
    if !(0..=LAST_TRACK_POSITION).contains(&relative) {
        return None;
    }
    Some(((relative as i16 + start_offset(color) as i16) % TRACK_LENGTH as i16) as u8)
}

/// Inverse of [`global_position`] for a color.
#[instrument]
pub fn relative_position(color: Color, global: u8) -> i8 {
    let len = TRACK_LENGTH as i16;
    ((global as i16 - start_offset(color) as i16).rem_euclid(len)) as i8
}

/// Index into a presenter's 52-cell path array.
#[instrument]
pub fn path_index(color: Color, relative: i8) -> Option<u8> {
    if !(0..=LAST_TRACK_POSITION).contains(&relative) {
        return None;
    }
    Some(((relative as i16 + entry_offset(color) as i16) % TRACK_LENGTH as i16) as u8)
}

/// True when a piece at this relative position cannot be captured.
#[instrument]
pub fn is_safe(color: Color, relative: i8) -> bool {
    match global_position(color, relative) {
        Some(global) => SAFE_INDICES.contains(&global),
        None => true,
    }
}

/// A world coordinate a presenter can place a piece at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Coordinate {
    /// The piece's slot in its color's start area.
    Start(PieceId),
    /// A cell of the shared track, by global index.
    Track(u8),
    /// A cell of a color's private home stretch (0-5).
    HomeStretch(Color, u8),
    /// The color's home.
    Home(Color),
}

impl Coordinate {
    /// Resolves the coordinate of a piece at a relative position.
    #[instrument]
    pub fn of(piece: PieceId, relative: i8) -> Self {
        if relative <= START_POSITION {
            Coordinate::Start(piece)
        } else if let Some(global) = global_position(piece.color, relative) {
            Coordinate::Track(global)
        } else if relative < HOME_POSITION {
            Coordinate::HomeStretch(piece.color, (relative - HOME_STRETCH_START) as u8)
        } else {
            Coordinate::Home(piece.color)
        }
    }

    /// True for coordinates recorded in the occupancy index.
    pub fn is_indexed(&self) -> bool {
        matches!(self, Coordinate::Track(_) | Coordinate::HomeStretch(..))
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Coordinate::Start(piece) => write!(f, "start({})", piece),
            Coordinate::Track(global) => write!(f, "track {}", global),
            Coordinate::HomeStretch(color, step) => write!(f, "{} stretch {}", color, step),
            Coordinate::Home(color) => write!(f, "{} home", color),
        }
    }
}

/// Occupancy index: who stands on which indexed cell.
///
/// Each cell holds a stack of pieces, most recent arrival last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: BTreeMap<Coordinate, Vec<PieceId>>,
}

impl Board {
    /// Creates an empty board.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the most recently placed piece at a color's relative position.
    #[instrument(skip(self))]
    pub fn occupant_at(&self, color: Color, relative: i8) -> Option<PieceId> {
        let coordinate = Coordinate::of(PieceId::new(color, 0), relative);
        self.occupants(coordinate).last().copied()
    }

    /// Returns every piece at a coordinate, oldest first.
    pub fn occupants(&self, coordinate: Coordinate) -> &[PieceId] {
        self.cells.get(&coordinate).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the coordinate a piece is indexed at, if any.
    pub fn locate(&self, piece: PieceId) -> Option<Coordinate> {
        self.cells
            .iter()
            .find(|(_, pieces)| pieces.contains(&piece))
            .map(|(coordinate, _)| *coordinate)
    }

    /// Records a piece at a relative position, vacating its previous cell.
    ///
    /// Idempotent: placing a piece where it already stands changes nothing.
    #[instrument(skip(self))]
    pub fn place(&mut self, piece: PieceId, relative: i8) -> Coordinate {
        let coordinate = Coordinate::of(piece, relative);
        if self.locate(piece) == Some(coordinate) {
            return coordinate;
        }
        self.remove(piece);
        if coordinate.is_indexed() {
            trace!(%piece, %coordinate, "Indexing piece");
            self.cells.entry(coordinate).or_default().push(piece);
        }
        coordinate
    }

    /// Deletes any occupancy record for a piece.
    #[instrument(skip(self))]
    pub fn remove(&mut self, piece: PieceId) {
        if let Some(coordinate) = self.locate(piece) {
            debug!(%piece, %coordinate, "Vacating cell");
            if let Some(pieces) = self.cells.get_mut(&coordinate) {
                pieces.retain(|p| *p != piece);
                if pieces.is_empty() {
                    self.cells.remove(&coordinate);
                }
            }
        }
    }

    /// Iterates over every occupied cell.
    pub fn cells(&self) -> impl Iterator<Item = (&Coordinate, &[PieceId])> {
        self.cells.iter().map(|(c, p)| (c, p.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_off_track_has_no_global_position() {
        assert_eq!(global_position(Color::A, START_POSITION), None);
        assert_eq!(global_position(Color::A, HOME_STRETCH_START), None);
        assert_eq!(global_position(Color::A, HOME_POSITION), None);
    }

    #[test]
    fn test_global_position_wraps() {
        assert_eq!(global_position(Color::A, 0), Some(1));
        assert_eq!(global_position(Color::D, 12), Some(0));
        assert_eq!(global_position(Color::D, 50), Some(38));
    }

    #[test]
    fn test_path_index_trails_global_by_one() {
        for color in Color::ALL {
            for rel in 0..=LAST_TRACK_POSITION {
                let global = global_position(color, rel).map(|g| g as i16);
                let path = path_index(color, rel).map(|p| p as i16);
                assert_eq!(global.zip(path).map(|(g, p)| (g - p).rem_euclid(52)), Some(1));
            }
        }
    }

    #[test]
    fn test_start_and_home_stretch_are_safe() {
        assert!(is_safe(Color::B, START_POSITION));
        assert!(is_safe(Color::B, 53));
        assert!(is_safe(Color::B, HOME_POSITION));
        // A's relative 7 lands on global 8
        assert!(is_safe(Color::A, 7));
        assert!(!is_safe(Color::A, 10));
    }

    #[test]
    fn test_place_vacates_previous_cell() {
        let mut board = Board::new();
        let piece = PieceId::new(Color::A, 0);
        board.place(piece, 3);
        board.place(piece, 5);
        assert_eq!(board.occupant_at(Color::A, 3), None);
        assert_eq!(board.occupant_at(Color::A, 5), Some(piece));
        assert_eq!(board.cells().count(), 1);
    }

    #[test]
    fn test_place_is_idempotent() {
        let mut board = Board::new();
        let first = PieceId::new(Color::A, 0);
        let second = PieceId::new(Color::A, 1);
        board.place(first, 5);
        board.place(second, 5);
        board.place(first, 5);
        assert_eq!(board.occupants(Coordinate::Track(6)), &[first, second]);
    }

    #[test]
    fn test_occupant_visible_across_colors() {
        let mut board = Board::new();
        let b = PieceId::new(Color::B, 2);
        board.place(b, 0);
        // B's entry cell is A's relative 13
        assert_eq!(board.occupant_at(Color::A, 13), Some(b));
    }

    #[test]
    fn test_start_and_home_are_not_indexed() {
        let mut board = Board::new();
        let piece = PieceId::new(Color::C, 3);
        board.place(piece, 10);
        board.place(piece, HOME_POSITION);
        assert_eq!(board.locate(piece), None);
        board.place(piece, START_POSITION);
        assert_eq!(board.cells().count(), 0);
    }
}
