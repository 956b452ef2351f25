use serde::{Deserialize, Serialize};

/// A day on the library calendar. Day 0 is before the desk has ever opened.
pub type Day = u32;

/// Monotonic day counter owned by the desk.
///
/// The clock only moves forward, one day per desk-open event. There is no
/// way to rewind or reset it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Clock {
    /// Current day
    day: Day,
}

impl Clock {
    /// Create a clock at day 0
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to the next day and return it
    pub fn advance(&mut self) -> Day {
        self.day = self.day.saturating_add(1);
        self.day
    }

    /// The current day
    #[must_use]
    pub fn current(&self) -> Day {
        self.day
    }
}
