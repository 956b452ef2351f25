//! Per-item results of desk operations.
//!
//! These are soft outcomes: a miss on one book id is reported here and the
//! rest of the batch still runs.

use serde::{Deserialize, Serialize};

use crate::{
    book::{Book, BookId},
    clock::Day,
};

/// Common view over the per-id outcomes of a batch
pub trait BatchOutcome {
    /// The book id the outcome refers to
    fn book_id(&self) -> BookId;

    /// Whether the operation took effect for this id
    fn is_success(&self) -> bool;
}

/// Result of issuing a library card
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum CardOutcome {
    /// A new card was issued
    Issued(String),
    /// The member already had a card; nothing changed
    AlreadyHasCard(String),
}

/// Result of checking out one book id
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum CheckOutOutcome {
    /// The book moved to the member, due on `due`
    CheckedOut {
        /// Book lent
        book_id: BookId,
        /// Day the loan ends
        due: Day,
    },
    /// The book is not on the shelf
    NotAvailable(BookId),
    /// The member already holds the maximum number of books; the book stays
    /// on the shelf
    AtLimit(BookId),
}

impl BatchOutcome for CheckOutOutcome {
    fn book_id(&self) -> BookId {
        match self {
            Self::CheckedOut { book_id, .. } | Self::NotAvailable(book_id) | Self::AtLimit(book_id) => {
                *book_id
            }
        }
    }

    fn is_success(&self) -> bool {
        matches!(self, Self::CheckedOut { .. })
    }
}

/// Result of checking in one book id
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum CheckInOutcome {
    /// The book went back on the shelf
    Returned(BookId),
    /// The served member does not hold this book
    NotHeld(BookId),
}

impl BatchOutcome for CheckInOutcome {
    fn book_id(&self) -> BookId {
        match self {
            Self::Returned(book_id) | Self::NotHeld(book_id) => *book_id,
        }
    }

    fn is_success(&self) -> bool {
        matches!(self, Self::Returned(_))
    }
}

/// Result of renewing one book id
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum RenewOutcome {
    /// The loan now ends on `due`
    Renewed {
        /// Book renewed
        book_id: BookId,
        /// New day the loan ends
        due: Day,
    },
    /// The served member does not hold this book
    NotHeld(BookId),
}

impl BatchOutcome for RenewOutcome {
    fn book_id(&self) -> BookId {
        match self {
            Self::Renewed { book_id, .. } | Self::NotHeld(book_id) => *book_id,
        }
    }

    fn is_success(&self) -> bool {
        matches!(self, Self::Renewed { .. })
    }
}

/// Outcomes of a batch operation for the served member, in input order
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BatchReport<T> {
    /// Member the batch ran for
    pub member: String,
    /// One outcome per requested id
    pub outcomes: Vec<T>,
}

impl<T: BatchOutcome> BatchReport<T> {
    /// Number of ids the operation took effect for
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.is_success()).count()
    }

    /// Ids the operation took effect for, in input order
    #[must_use]
    pub fn succeeded(&self) -> Vec<BookId> {
        self.outcomes.iter().filter(|o| o.is_success()).map(BatchOutcome::book_id).collect()
    }
}

/// Result of a catalog search
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum SearchOutcome {
    /// The query was shorter than the minimum; nothing was matched
    TooShort {
        /// Minimum query length in characters
        min_len: usize,
    },
    /// No available book matched
    NoneFound,
    /// Matching available books, in shelf order
    Found(Vec<Book>),
}

impl SearchOutcome {
    /// Ids of the matched books, empty unless `Found`
    #[must_use]
    pub fn ids(&self) -> Vec<BookId> {
        match self {
            Self::Found(books) => books.iter().map(Book::id).collect(),
            Self::TooShort { .. } | Self::NoneFound => Vec::new(),
        }
    }
}
