use serde::{Deserialize, Serialize};

use crate::member::BOOK_LIMIT;

/// Tunable circulation rules.
///
/// Any field left out of a serialized policy falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CirculationPolicy {
    /// Length of a loan in days, counted from the day of checkout or renewal
    pub loan_days: u32,
    /// Books a member may hold at once
    pub book_limit: usize,
    /// Minimum number of characters in a search query
    pub min_search_len: usize,
    /// Maximum number of entries kept in the desk history
    pub history_limit: usize,
}

impl Default for CirculationPolicy {
    fn default() -> Self {
        Self { loan_days: 7, book_limit: BOOK_LIMIT, min_search_len: 4, history_limit: 100 }
    }
}

impl CirculationPolicy {
    /// Parse a policy from JSON
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the text is not a valid policy.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
