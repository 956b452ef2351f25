use serde::{Deserialize, Serialize};

use crate::{book::BookId, clock::Day};

/// Successful desk transitions, as reported to observers and kept in history
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum DeskEvent {
    /// The desk opened for the given day
    Opened(Day),
    /// The desk closed
    Closed,
    /// A new library card was issued
    CardIssued(String),
    /// The desk started serving a member
    Serving(String),
    /// A book was lent to a member until the given day
    CheckedOut {
        /// Borrowing member
        member: String,
        /// Book lent
        book_id: BookId,
        /// Day the loan ends
        due: Day,
    },
    /// A book came back to the shelf
    CheckedIn {
        /// Returning member
        member: String,
        /// Book returned
        book_id: BookId,
    },
    /// A loan was extended
    Renewed {
        /// Borrowing member
        member: String,
        /// Book renewed
        book_id: BookId,
        /// New day the loan ends
        due: Day,
    },
}
