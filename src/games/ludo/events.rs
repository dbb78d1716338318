//! Event fan-out to presenters.
//!
//! Observers are notified synchronously, in registration order, over a
//! snapshot of the registry taken when `notify` starts. An observer may
//! subscribe or unsubscribe anyone, itself included, from inside its
//! handler; the change takes effect from the next notification.

use super::board::Coordinate;
use super::types::{Color, DieValue, PieceId};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{instrument, trace};

/// Something that happened in the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// It is now this color's turn to roll.
    TurnChanged(Color),
    /// The current player rolled.
    DiceRolled {
        /// Who rolled.
        color: Color,
        /// The face.
        value: DieValue,
    },
    /// A piece moved.
    PieceMoved {
        /// The piece.
        piece: PieceId,
        /// Steps spent.
        steps: DieValue,
        /// Where a presenter should animate it to.
        to: Coordinate,
    },
    /// A piece was captured and sent back to start.
    PieceKnockedOut {
        /// The captured piece.
        knocked: PieceId,
        /// The capturing piece.
        attacker: PieceId,
    },
    /// The match is over.
    GameWon(Color),
    /// These pieces may be chosen; presenters should highlight them.
    MoveCandidates {
        /// Whose pieces.
        color: Color,
        /// The movable pieces.
        pieces: Vec<PieceId>,
    },
    /// Move candidates are no longer selectable.
    CandidatesCleared,
    /// The same player rolls again.
    ExtraTurn(Color),
    /// A player left the match.
    PlayerDeactivated(Color),
}

impl std::fmt::Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameEvent::TurnChanged(color) => write!(f, "{}'s turn", color),
            GameEvent::DiceRolled { color, value } => write!(f, "{} rolled {}", color, value),
            GameEvent::PieceMoved { piece, steps, to } => {
                write!(f, "{} moved {} to {}", piece, steps, to)
            }
            GameEvent::PieceKnockedOut { knocked, attacker } => {
                write!(f, "{} knocked out {}", attacker, knocked)
            }
            GameEvent::GameWon(color) => write!(f, "{} wins", color),
            GameEvent::MoveCandidates { color, pieces } => {
                let names: Vec<String> = pieces.iter().map(ToString::to_string).collect();
                write!(f, "{} may move {}", color, names.join(", "))
            }
            GameEvent::CandidatesCleared => write!(f, "Candidates cleared"),
            GameEvent::ExtraTurn(color) => write!(f, "{} rolls again", color),
            GameEvent::PlayerDeactivated(color) => write!(f, "{} left", color),
        }
    }
}

/// Receives match events.
pub trait Observer {
    /// Called once per event.
    fn on_event(&self, event: &GameEvent);
}

/// Handle returned by [`EventChannel::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

/// Ordered registry of observers.
#[derive(Default)]
pub struct EventChannel {
    observers: RefCell<Vec<(ObserverId, Rc<dyn Observer>)>>,
    next_id: Cell<u64>,
}

impl std::fmt::Debug for EventChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventChannel")
            .field("observers", &self.len())
            .finish()
    }
}

impl EventChannel {
    /// Creates an empty channel.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer at the end of the notification order.
    #[instrument(skip(self, observer))]
    pub fn subscribe(&self, observer: Rc<dyn Observer>) -> ObserverId {
        let id = ObserverId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.observers.borrow_mut().push((id, observer));
        trace!(?id, "Observer subscribed");
        id
    }

    /// Removes an observer. Returns false if it was not registered.
    #[instrument(skip(self))]
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|(registered, _)| *registered != id);
        before != observers.len()
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.observers.borrow().len()
    }

    /// True when nobody listens.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delivers an event to every observer registered when the call starts.
    #[instrument(skip(self, event), fields(event = %event))]
    pub fn notify(&self, event: &GameEvent) {
        let snapshot: Vec<Rc<dyn Observer>> = self
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| Rc::clone(observer))
            .collect();
        for observer in snapshot {
            observer.on_event(event);
        }
    }
}

/// Observer that records every event, for tests and replays.
#[derive(Debug, Default)]
pub struct EventLog {
    events: RefCell<Vec<GameEvent>>,
}

impl EventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events.
    pub fn events(&self) -> Vec<GameEvent> {
        self.events.borrow().clone()
    }

    /// Drops everything recorded so far.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl Observer for EventLog {
    fn on_event(&self, event: &GameEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
