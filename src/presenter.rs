//! Text presenter for the command-line front end.

use crate::games::ludo::{GameEvent, Observer};
use std::cell::Cell;
use tracing::debug;

/// Prints every event as one numbered line.
#[derive(Debug, Default)]
pub struct ConsolePresenter {
    count: Cell<usize>,
    quiet: bool,
}

impl ConsolePresenter {
    /// Creates a presenter that prints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a presenter that only counts events.
    pub fn quiet() -> Self {
        Self {
            quiet: true,
            ..Self::default()
        }
    }

    /// Number of events seen.
    pub fn count(&self) -> usize {
        self.count.get()
    }
}

impl Observer for ConsolePresenter {
    fn on_event(&self, event: &GameEvent) {
        let n = self.count.get() + 1;
        self.count.set(n);
        debug!(n, %event, "Presenting");
        if !self.quiet {
            println!("{:>5}  {}", n, event);
        }
    }
}
