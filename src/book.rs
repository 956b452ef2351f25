use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clock::Day;

/// Catalog identifier of a book, assigned 1..N at catalog load
pub type BookId = u32;

/// Where a book stands in the circulation cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum BookStatus {
    /// Book is on the shelf and can be checked out
    #[default]
    Available,
    /// Book is checked out and due back on the given day
    CheckedOut {
        /// Day the loan ends
        due: Day,
    },
}

impl BookStatus {
    /// Get a human-readable description of the status
    #[must_use]
    pub fn get_description(&self) -> String {
        match self {
            Self::Available => "Book is available for checkout".to_string(),
            Self::CheckedOut { due } => format!("Book is checked out, due on day {due}"),
        }
    }
}

/// A single catalog entry.
///
/// The due date is `None` exactly while the book is available.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Book {
    /// Catalog identifier
    id: BookId,
    /// Book title
    title: String,
    /// Single author
    author: String,
    /// Day the current loan ends, if checked out
    due_date: Option<Day>,
}

impl Book {
    /// Create an available book
    #[must_use]
    pub fn new(id: BookId, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self { id, title: title.into(), author: author.into(), due_date: None }
    }

    /// Catalog identifier
    #[must_use]
    pub fn id(&self) -> BookId {
        self.id
    }

    /// Book title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Book author
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Day the current loan ends, `None` while available
    #[must_use]
    pub fn due_date(&self) -> Option<Day> {
        self.due_date
    }

    /// Current circulation status
    #[must_use]
    pub fn status(&self) -> BookStatus {
        self.due_date.map_or(BookStatus::Available, |due| BookStatus::CheckedOut { due })
    }

    /// Mark the book as lent out until `due`. Renewals call this again with
    /// the extended date.
    pub fn check_out(&mut self, due: Day) {
        self.due_date = Some(due);
    }

    /// Clear the due date, making the book available again
    pub fn check_in(&mut self) {
        self.due_date = None;
    }

    /// Whether the loan ran past its due date as of `today`
    #[must_use]
    pub fn is_overdue(&self, today: Day) -> bool {
        self.due_date.is_some_and(|due| today > due)
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}, by {}", self.id, self.title, self.author)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A fresh, available book
    fn dune() -> Book {
        Book::new(4, "Dune", "Frank Herbert")
    }

    #[test]
    fn test_new_book_is_available() {
        let book = dune();
        assert_eq!(book.due_date(), None);
        assert_eq!(book.status(), BookStatus::Available);
    }

    #[test]
    fn test_check_out_sets_due_date() {
        let mut book = dune();
        book.check_out(8);
        assert_eq!(book.due_date(), Some(8));
        assert_eq!(book.status(), BookStatus::CheckedOut { due: 8 });
    }

    #[test]
    fn test_check_in_clears_due_date() {
        let mut book = dune();
        book.check_out(8);
        book.check_in();
        assert_eq!(book.due_date(), None);
        assert_eq!(book.status(), BookStatus::Available);
    }

    #[test]
    fn test_available_book_is_never_overdue() {
        let book = dune();
        assert!(!book.is_overdue(0));
        assert!(!book.is_overdue(Day::MAX));
    }

    #[test]
    fn test_overdue_only_after_due_day() {
        let mut book = dune();
        book.check_out(8);
        assert!(!book.is_overdue(7));
        assert!(!book.is_overdue(8));
        assert!(book.is_overdue(9));
    }

    #[test]
    fn test_display_format() {
        assert_eq!(dune().to_string(), "4: Dune, by Frank Herbert");
    }

    #[test]
    fn test_status_description() {
        assert_eq!(BookStatus::Available.get_description(), "Book is available for checkout");
        assert_eq!(
            BookStatus::CheckedOut { due: 3 }.get_description(),
            "Book is checked out, due on day 3"
        );
    }
}
