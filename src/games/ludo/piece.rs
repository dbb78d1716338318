//! Per-piece progress and movement legality.

use super::board::is_safe;
use super::types::{
    DieValue, PieceId, HOME_POSITION, LAST_TRACK_POSITION, START_POSITION,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Where a piece is along its route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum PieceState {
    /// Waiting in the start area.
    InStart,
    /// On the shared track (relative 0-50).
    OnTrack,
    /// On the private home stretch (relative 51-56).
    InHomeStretch,
    /// Home. Terminal.
    Arrived,
}

/// A single piece and its relative progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    id: PieceId,
    relative: i8,
}

impl Piece {
    /// Creates a piece in its start area.
    pub fn new(id: PieceId) -> Self {
        Self {
            id,
            relative: START_POSITION,
        }
    }

    /// Returns the piece id.
    pub fn id(&self) -> PieceId {
        self.id
    }

    /// Returns the relative position (-1 while in start, 57 once arrived).
    pub fn relative(&self) -> i8 {
        self.relative
    }

    /// Classifies the relative position.
    pub fn state(&self) -> PieceState {
        match self.relative {
            r if r <= START_POSITION => PieceState::InStart,
            r if r <= LAST_TRACK_POSITION => PieceState::OnTrack,
            r if r < HOME_POSITION => PieceState::InHomeStretch,
            _ => PieceState::Arrived,
        }
    }

    /// True while the piece waits in the start area.
    pub fn in_start_area(&self) -> bool {
        self.state() == PieceState::InStart
    }

    /// True while the piece is on its private home stretch.
    pub fn in_home_stretch(&self) -> bool {
        self.state() == PieceState::InHomeStretch
    }

    /// True once the piece is home.
    pub fn has_arrived(&self) -> bool {
        self.state() == PieceState::Arrived
    }

    /// True when the piece cannot be captured where it stands.
    pub fn in_safe_zone(&self) -> bool {
        is_safe(self.id.color, self.relative)
    }

    /// Relative position this piece would reach with the given roll, if legal.
    ///
    /// Leaving start requires a six and always lands on relative zero.
    #[instrument(skip(self), fields(piece = %self.id, relative = self.relative))]
    pub fn target(&self, roll: DieValue) -> Option<i8> {
        match self.state() {
            PieceState::Arrived => None,
            PieceState::InStart => roll.is_six().then_some(0),
            PieceState::OnTrack | PieceState::InHomeStretch => {
                let target = self.relative + roll.steps();
                (target <= HOME_POSITION).then_some(target)
            }
        }
    }

    /// Returns true if the piece may move by the given roll.
    pub fn can_move(&self, roll: DieValue) -> bool {
        self.target(roll).is_some()
    }

    /// Advances the piece, returning the new relative position.
    ///
    /// Leaves the piece untouched and returns `None` when the move is illegal.
    #[instrument(skip(self), fields(piece = %self.id))]
    pub(super) fn advance(&mut self, roll: DieValue) -> Option<i8> {
        let target = self.target(roll)?;
        self.relative = target;
        Some(target)
    }

    /// Sends the piece back to its start area.
    pub(super) fn reset(&mut self) {
        self.relative = START_POSITION;
    }

    pub(crate) fn at(id: PieceId, relative: i8) -> Self {
        Self {
            id,
            relative: relative.clamp(START_POSITION, HOME_POSITION),
        }
    }
}
