//! Console wording for desk outcomes.
//!
//! Each function returns the lines to show for one operation, so the shell
//! decides where they go.

use std::collections::BTreeMap;

use crate::{
    book::Book,
    clock::Day,
    outcome::{BatchReport, CardOutcome, CheckInOutcome, CheckOutOutcome, RenewOutcome, SearchOutcome},
};

/// Banner shown when the session ends
pub const CLOSING_BANNER: &str = "The library is now closed for renovations";

/// Message for a successful open
#[must_use]
pub fn opened(day: Day) -> String {
    format!("Today is day {day}")
}

/// Message for a successful close
#[must_use]
pub fn closed() -> String {
    "Good night".to_string()
}

/// Message for a card request
#[must_use]
pub fn card(outcome: &CardOutcome) -> String {
    match outcome {
        CardOutcome::Issued(name) => format!("Library card is issued to {name}."),
        CardOutcome::AlreadyHasCard(name) => format!("{name} already has a library card."),
    }
}

/// Message for a successful serve
#[must_use]
pub fn serving(name: &str) -> String {
    format!("Now serving {name}.")
}

/// One line per requested id, successes carrying the running count
#[must_use]
pub fn check_out(report: &BatchReport<CheckOutOutcome>) -> Vec<String> {
    let name = &report.member;
    let mut count: usize = 0;
    report
        .outcomes
        .iter()
        .map(|outcome| match outcome {
            CheckOutOutcome::CheckedOut { due, .. } => {
                count = count.saturating_add(1);
                format!("{count} books have been checked out to {name} (due day {due}).")
            }
            CheckOutOutcome::NotAvailable(id) => format!("The library does not have book {id}."),
            CheckOutOutcome::AtLimit(id) => {
                format!("{name} is at the book limit; book {id} stays on the shelf.")
            }
        })
        .collect()
}

/// One line per requested id, successes carrying the running count
#[must_use]
pub fn check_in(report: &BatchReport<CheckInOutcome>) -> Vec<String> {
    let name = &report.member;
    let mut count: usize = 0;
    report
        .outcomes
        .iter()
        .map(|outcome| match outcome {
            CheckInOutcome::Returned(_) => {
                count = count.saturating_add(1);
                format!("{name} has returned {count} books.")
            }
            CheckInOutcome::NotHeld(id) => format!("{name} does not have book {id}."),
        })
        .collect()
}

/// One line per requested id, successes carrying the running count
#[must_use]
pub fn renew(report: &BatchReport<RenewOutcome>) -> Vec<String> {
    let name = &report.member;
    let mut count: usize = 0;
    report
        .outcomes
        .iter()
        .map(|outcome| match outcome {
            RenewOutcome::Renewed { due, .. } => {
                count = count.saturating_add(1);
                format!("{count} books have been renewed for {name} (due day {due}).")
            }
            RenewOutcome::NotHeld(id) => format!("The member does not have book {id}."),
        })
        .collect()
}

/// Matching books followed by a count, or the reason nothing matched
#[must_use]
pub fn search(outcome: &SearchOutcome) -> Vec<String> {
    match outcome {
        SearchOutcome::TooShort { min_len } => {
            vec![format!("Search string must contain at least {min_len} characters")]
        }
        SearchOutcome::NoneFound => vec!["No books found".to_string()],
        SearchOutcome::Found(books) => {
            let mut lines: Vec<String> = books.iter().map(ToString::to_string).collect();
            lines.push(format!("{} books found", books.len()));
            lines
        }
    }
}

/// Overdue books of one member
#[must_use]
pub fn overdue(name: &str, books: &[Book]) -> Vec<String> {
    if books.is_empty() {
        return vec![format!("{name}: no books are overdue")];
    }
    books.iter().map(|book| format!("{name}: {book} is overdue")).collect()
}

/// Overdue books of every member, in name order
#[must_use]
pub fn all_overdue(by_member: &BTreeMap<String, Vec<Book>>) -> Vec<String> {
    if by_member.is_empty() {
        return vec!["No library cards have been issued".to_string()];
    }
    by_member.iter().flat_map(|(name, books)| overdue(name, books)).collect()
}
