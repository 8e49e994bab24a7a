#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! High score tracking system.
//!
//! The tracker only keeps the best score in memory. Persisting a new record
//! is left to whoever owns the storage collaborator.

use neon_snake_core::Event;

/// Pure system remembering the best score seen across sessions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HighScoreTracker {
    best: u32,
}

impl HighScoreTracker {
    /// Creates a tracker seeded with a previously persisted best score.
    #[must_use]
    pub const fn new(best: u32) -> Self {
        Self { best }
    }

    /// Best score observed so far.
    #[must_use]
    pub const fn best(&self) -> u32 {
        self.best
    }

    /// Consumes events and returns the new best score when a game over beats it.
    ///
    /// Ties do not count as a new record.
    pub fn handle(&mut self, events: &[Event]) -> Option<u32> {
        let mut record = None;
        for event in events {
            if let Event::GameOver { score, .. } = event {
                if *score > self.best {
                    self.best = *score;
                    record = Some(*score);
                }
            }
        }
        record
    }
}
