use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    book::{Book, BookId},
    clock::Day,
};

/// Default number of books a member may hold at once
pub const BOOK_LIMIT: usize = 3;

/// Reminder generated for each overdue book a member holds
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OverdueNotice {
    /// Member holding the book
    pub member: String,
    /// Overdue book
    pub book_id: BookId,
    /// Title of the overdue book
    pub title: String,
    /// Day the loan ended
    pub due_date: Day,
}

impl fmt::Display for OverdueNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Reminder {}: this book is overdue ({}: {}, due day {})",
            self.member, self.book_id, self.title, self.due_date
        )
    }
}

/// A card-holding patron and the books currently lent to them.
///
/// Members never change their own books' due dates; the desk does that
/// before handing a book over.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Member {
    /// Name on the library card, unique within the roster
    name: String,
    /// Books checked out to this member, in checkout order
    held: Vec<Book>,
    /// Maximum number of held books
    book_limit: usize,
}

impl Member {
    /// Create a member with no books and the default limit
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_limit(name, BOOK_LIMIT)
    }

    /// Create a member with no books and a custom limit
    #[must_use]
    pub fn with_limit(name: impl Into<String>, book_limit: usize) -> Self {
        Self { name: name.into(), held: Vec::new(), book_limit }
    }

    /// Name on the card
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Books currently held, in checkout order
    #[must_use]
    pub fn books(&self) -> &[Book] {
        &self.held
    }

    /// Maximum number of books this member may hold
    #[must_use]
    pub fn book_limit(&self) -> usize {
        self.book_limit
    }

    /// Whether another checkout would exceed the limit
    #[must_use]
    pub fn is_at_limit(&self) -> bool {
        self.held.len() >= self.book_limit
    }

    /// Whether the member holds the book with this id
    #[must_use]
    pub fn holds(&self, id: BookId) -> bool {
        self.held.iter().any(|book| book.id() == id)
    }

    /// Take a book into the held set.
    ///
    /// # Errors
    ///
    /// Hands the book back unchanged when the member is already at the limit.
    pub fn check_out(&mut self, book: Book) -> Result<(), Book> {
        if self.is_at_limit() {
            return Err(book);
        }
        self.held.push(book);
        Ok(())
    }

    /// Remove a book from the held set, returning it if it was held
    pub fn give_back(&mut self, id: BookId) -> Option<Book> {
        let pos = self.held.iter().position(|book| book.id() == id)?;
        Some(self.held.remove(pos))
    }

    /// Mutable access to a held book, used by the desk for renewals
    pub(crate) fn held_book_mut(&mut self, id: BookId) -> Option<&mut Book> {
        self.held.iter_mut().find(|book| book.id() == id)
    }

    /// Held books whose loans ran past their due date
    #[must_use]
    pub fn overdue_books(&self, today: Day) -> Vec<&Book> {
        self.held.iter().filter(|book| book.is_overdue(today)).collect()
    }

    /// One reminder per overdue held book
    #[must_use]
    pub fn overdue_notices(&self, today: Day) -> Vec<OverdueNotice> {
        self.held
            .iter()
            .filter_map(|book| {
                let due_date = book.due_date()?;
                book.is_overdue(today).then(|| OverdueNotice {
                    member: self.name.clone(),
                    book_id: book.id(),
                    title: book.title().to_string(),
                    due_date,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A book already lent until `due`
    fn lent(id: BookId, due: Day) -> Book {
        let mut book = Book::new(id, format!("Title {id}"), "Author");
        book.check_out(due);
        book
    }

    #[test]
    fn test_new_member_holds_nothing() {
        let member = Member::new("Alice");
        assert_eq!(member.name(), "Alice");
        assert!(member.books().is_empty());
        assert_eq!(member.book_limit(), BOOK_LIMIT);
    }

    #[test]
    fn test_check_out_respects_limit() {
        let mut member = Member::new("Alice");
        for id in 1..=3 {
            assert!(member.check_out(lent(id, 8)).is_ok());
        }
        assert!(member.is_at_limit());

        let rejected = member.check_out(lent(4, 8));
        assert!(matches!(rejected, Err(ref book) if book.id() == 4));
        assert_eq!(member.books().len(), 3);
    }

    #[test]
    fn test_custom_limit() {
        let mut member = Member::with_limit("Bob", 1);
        assert!(member.check_out(lent(1, 8)).is_ok());
        assert!(member.check_out(lent(2, 8)).is_err());
    }

    #[test]
    fn test_give_back_removes_only_that_book() {
        let mut member = Member::new("Alice");
        assert!(member.check_out(lent(1, 8)).is_ok());
        assert!(member.check_out(lent(2, 8)).is_ok());

        let returned = member.give_back(1);
        assert_eq!(returned.map(|book| book.id()), Some(1));
        assert!(!member.holds(1));
        assert!(member.holds(2));
    }

    #[test]
    fn test_give_back_missing_book_is_noop() {
        let mut member = Member::new("Alice");
        assert!(member.check_out(lent(1, 8)).is_ok());
        assert!(member.give_back(9).is_none());
        assert_eq!(member.books().len(), 1);
    }

    #[test]
    fn test_overdue_notices() {
        let mut member = Member::new("Alice");
        assert!(member.check_out(lent(1, 5)).is_ok());
        assert!(member.check_out(lent(2, 20)).is_ok());

        let notices = member.overdue_notices(10);
        assert_eq!(notices.len(), 1);
        let notice = notices.first().map(ToString::to_string).unwrap_or_default();
        assert_eq!(notice, "Reminder Alice: this book is overdue (1: Title 1, due day 5)");

        let overdue: Vec<BookId> = member.overdue_books(10).iter().map(|book| book.id()).collect();
        assert_eq!(overdue, vec![1]);
        assert!(member.overdue_notices(5).is_empty());
    }
}
