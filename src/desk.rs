use std::{
    collections::{BTreeMap, HashSet, VecDeque},
    fmt,
};

use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    book::{Book, BookId},
    clock::{Clock, Day},
    events::DeskEvent,
    member::Member,
    observers::DeskObserver,
    outcome::{BatchReport, CardOutcome, CheckInOutcome, CheckOutOutcome, RenewOutcome, SearchOutcome},
    policy::CirculationPolicy,
};

/// Hard precondition failures. The requested operation had no effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeskError {
    /// The desk must be open for this operation
    #[error("The library is not open!")]
    NotOpen,

    /// `open` was called on an open desk
    #[error("The library is already open!")]
    AlreadyOpen,

    /// The operation needs a served member and none is selected
    #[error("No member is currently being served.")]
    NoMemberServed,

    /// No card was issued under this name
    #[error("{name} does not have a library card.")]
    UnknownMember {
        /// Name that was looked up
        name: String,
    },
}

/// Whether the desk is taking requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum DeskState {
    /// Closed for the day
    #[default]
    Closed,
    /// Open for the day
    Open,
}

/// A transition as kept in the desk history
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CirculationRecord {
    /// Day the transition happened
    pub day: Day,
    /// What happened
    pub event: DeskEvent,
}

/// The circulation desk.
///
/// Owns the shelf, the roster, the clock and the served-member cursor. Every
/// book is either on the shelf or held by exactly one member, and all moves
/// between the two go through the methods here.
pub struct Desk {
    /// Open/closed state
    state: DeskState,
    /// Day counter, advanced on every open
    clock: Clock,
    /// Books on the shelf, in shelf order
    available: Vec<Book>,
    /// Card holders by name
    members: BTreeMap<String, Member>,
    /// Name of the member currently being served
    served: Option<String>,
    /// Circulation rules
    policy: CirculationPolicy,
    /// Recent transitions, oldest first
    history: VecDeque<CirculationRecord>,
    /// Registered event observers
    observers: Vec<Box<dyn DeskObserver>>,
}

impl fmt::Debug for Desk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Desk")
            .field("state", &self.state)
            .field("clock", &self.clock)
            .field("available", &self.available)
            .field("members", &self.members)
            .field("served", &self.served)
            .field("policy", &self.policy)
            .field("history", &self.history)
            .field("observers_count", &self.observers.len())
            .finish()
    }
}

impl Desk {
    /// Create a closed desk on day 0 with the default policy
    #[must_use]
    pub fn new(books: Vec<Book>) -> Self {
        Self::with_policy(books, CirculationPolicy::default())
    }

    /// Create a closed desk on day 0 with a custom policy.
    ///
    /// All books start on the shelf. A book whose id was already seen is
    /// dropped.
    #[must_use]
    pub fn with_policy(books: Vec<Book>, policy: CirculationPolicy) -> Self {
        let mut seen = HashSet::new();
        let available = books
            .into_iter()
            .filter_map(|mut book| {
                if !seen.insert(book.id()) {
                    warn!("event=catalog_duplicate book={}", book.id());
                    return None;
                }
                book.check_in();
                Some(book)
            })
            .collect();

        Self {
            state: DeskState::Closed,
            clock: Clock::new(),
            available,
            members: BTreeMap::new(),
            served: None,
            policy,
            history: VecDeque::new(),
            observers: Vec::new(),
        }
    }

    /// Register an observer to be notified of desk events
    pub fn register_observer(&mut self, observer: Box<dyn DeskObserver>) {
        self.observers.push(observer);
    }

    /// Open the desk for a new day.
    ///
    /// # Errors
    ///
    /// Returns `DeskError::AlreadyOpen` if the desk is open.
    pub fn open(&mut self) -> Result<Day, DeskError> {
        if self.is_open() {
            return Err(DeskError::AlreadyOpen);
        }
        let today = self.clock.advance();
        self.state = DeskState::Open;
        self.record(DeskEvent::Opened(today));
        Ok(today)
    }

    /// Close the desk. The served member is released.
    ///
    /// # Errors
    ///
    /// Returns `DeskError::NotOpen` if the desk is closed.
    pub fn close(&mut self) -> Result<(), DeskError> {
        self.ensure_open()?;
        self.state = DeskState::Closed;
        self.served = None;
        self.record(DeskEvent::Closed);
        Ok(())
    }

    /// Issue a library card. Issuing to an existing card holder changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `DeskError::NotOpen` if the desk is closed.
    pub fn issue_card(&mut self, name: &str) -> Result<CardOutcome, DeskError> {
        self.ensure_open()?;
        if self.members.contains_key(name) {
            return Ok(CardOutcome::AlreadyHasCard(name.to_string()));
        }
        self.members
            .insert(name.to_string(), Member::with_limit(name, self.policy.book_limit));
        self.record(DeskEvent::CardIssued(name.to_string()));
        Ok(CardOutcome::Issued(name.to_string()))
    }

    /// Start serving a card holder. Any previous selection is dropped first,
    /// even when the lookup fails.
    ///
    /// # Errors
    ///
    /// Returns `DeskError::NotOpen` if the desk is closed, or
    /// `DeskError::UnknownMember` if nobody holds a card under `name`.
    pub fn serve(&mut self, name: &str) -> Result<(), DeskError> {
        self.ensure_open()?;
        self.served = None;
        if !self.members.contains_key(name) {
            return Err(DeskError::UnknownMember { name: name.to_string() });
        }
        self.served = Some(name.to_string());
        self.record(DeskEvent::Serving(name.to_string()));
        Ok(())
    }

    /// Lend books from the shelf to the served member, in the given order.
    ///
    /// Each book is due `loan_days` after today. An id that is not on the
    /// shelf, or that would push the member over their limit, is reported
    /// and left where it is; the rest of the batch still runs.
    ///
    /// # Errors
    ///
    /// Returns `DeskError::NotOpen` or `DeskError::NoMemberServed`.
    pub fn check_out(
        &mut self,
        ids: &[BookId],
    ) -> Result<BatchReport<CheckOutOutcome>, DeskError> {
        let name = self.served_name()?;
        let due = self.due_date();
        let member = self
            .members
            .get_mut(&name)
            .ok_or_else(|| DeskError::UnknownMember { name: name.clone() })?;

        let mut outcomes = Vec::with_capacity(ids.len());
        let mut events = Vec::new();
        for &id in ids {
            let Some(pos) = self.available.iter().position(|book| book.id() == id) else {
                debug!("event=check_out_miss member={name} book={id}");
                outcomes.push(CheckOutOutcome::NotAvailable(id));
                continue;
            };
            let mut book = self.available.remove(pos);
            book.check_out(due);
            match member.check_out(book) {
                Ok(()) => {
                    outcomes.push(CheckOutOutcome::CheckedOut { book_id: id, due });
                    events.push(DeskEvent::CheckedOut { member: name.clone(), book_id: id, due });
                }
                Err(mut book) => {
                    book.check_in();
                    self.available.insert(pos, book);
                    outcomes.push(CheckOutOutcome::AtLimit(id));
                }
            }
        }

        self.record_all(events);
        Ok(BatchReport { member: name, outcomes })
    }

    /// Take books back from the served member and return them to the shelf.
    ///
    /// # Errors
    ///
    /// Returns `DeskError::NotOpen` or `DeskError::NoMemberServed`.
    pub fn check_in(&mut self, ids: &[BookId]) -> Result<BatchReport<CheckInOutcome>, DeskError> {
        let name = self.served_name()?;
        let member = self
            .members
            .get_mut(&name)
            .ok_or_else(|| DeskError::UnknownMember { name: name.clone() })?;

        let mut outcomes = Vec::with_capacity(ids.len());
        let mut events = Vec::new();
        for &id in ids {
            if let Some(mut book) = member.give_back(id) {
                book.check_in();
                self.available.push(book);
                outcomes.push(CheckInOutcome::Returned(id));
                events.push(DeskEvent::CheckedIn { member: name.clone(), book_id: id });
            } else {
                outcomes.push(CheckInOutcome::NotHeld(id));
            }
        }

        self.record_all(events);
        Ok(BatchReport { member: name, outcomes })
    }

    /// Extend loans held by the served member to `loan_days` after today.
    ///
    /// # Errors
    ///
    /// Returns `DeskError::NotOpen` or `DeskError::NoMemberServed`.
    pub fn renew(&mut self, ids: &[BookId]) -> Result<BatchReport<RenewOutcome>, DeskError> {
        let name = self.served_name()?;
        let due = self.due_date();
        let member = self
            .members
            .get_mut(&name)
            .ok_or_else(|| DeskError::UnknownMember { name: name.clone() })?;

        let mut outcomes = Vec::with_capacity(ids.len());
        let mut events = Vec::new();
        for &id in ids {
            if let Some(book) = member.held_book_mut(id) {
                book.check_out(due);
                outcomes.push(RenewOutcome::Renewed { book_id: id, due });
                events.push(DeskEvent::Renewed { member: name.clone(), book_id: id, due });
            } else {
                outcomes.push(RenewOutcome::NotHeld(id));
            }
        }

        self.record_all(events);
        Ok(BatchReport { member: name, outcomes })
    }

    /// Search the shelf.
    ///
    /// The query is a case-insensitive pattern matched against each
    /// available book rendered as `"id: title, by author"`. A query that is
    /// not a valid pattern is matched literally.
    ///
    /// # Errors
    ///
    /// Returns `DeskError::NotOpen` if the desk is closed.
    pub fn search(&self, query: &str) -> Result<SearchOutcome, DeskError> {
        self.ensure_open()?;
        let min_len = self.policy.min_search_len;
        if query.chars().count() < min_len {
            return Ok(SearchOutcome::TooShort { min_len });
        }

        let matcher = Matcher::new(query);
        let found: Vec<Book> = self
            .available
            .iter()
            .filter(|book| matcher.is_match(&book.to_string()))
            .cloned()
            .collect();
        debug!("event=search query={query:?} matches={}", found.len());

        if found.is_empty() { Ok(SearchOutcome::NoneFound) } else { Ok(SearchOutcome::Found(found)) }
    }

    /// Overdue books held by the served member
    ///
    /// # Errors
    ///
    /// Returns `DeskError::NotOpen` or `DeskError::NoMemberServed`.
    pub fn find_overdue_books(&self) -> Result<Vec<Book>, DeskError> {
        let name = self.served_name()?;
        let today = self.today();
        let member =
            self.members.get(&name).ok_or_else(|| DeskError::UnknownMember { name: name.clone() })?;

        self.notify_overdue(member);
        Ok(member.overdue_books(today).into_iter().cloned().collect())
    }

    /// Overdue books for every card holder, keyed by name. Members without
    /// overdue books map to an empty list.
    ///
    /// # Errors
    ///
    /// Returns `DeskError::NotOpen` if the desk is closed.
    pub fn find_all_overdue_books(&self) -> Result<BTreeMap<String, Vec<Book>>, DeskError> {
        self.ensure_open()?;
        let today = self.today();
        Ok(self
            .members
            .iter()
            .map(|(name, member)| {
                self.notify_overdue(member);
                let overdue: Vec<Book> = member.overdue_books(today).into_iter().cloned().collect();
                (name.clone(), overdue)
            })
            .collect())
    }

    /// Whether the desk is open
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == DeskState::Open
    }

    /// Open/closed state
    #[must_use]
    pub fn state(&self) -> &DeskState {
        &self.state
    }

    /// The current day
    #[must_use]
    pub fn today(&self) -> Day {
        self.clock.current()
    }

    /// The member currently being served
    #[must_use]
    pub fn served_member(&self) -> Option<&Member> {
        self.served.as_ref().and_then(|name| self.members.get(name))
    }

    /// Look up a card holder
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }

    /// All card holders, ordered by name
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    /// Books on the shelf, in shelf order
    #[must_use]
    pub fn available_books(&self) -> &[Book] {
        &self.available
    }

    /// Total books known to the desk, on the shelf or lent out
    #[must_use]
    pub fn book_count(&self) -> usize {
        self.members
            .values()
            .map(|member| member.books().len())
            .fold(self.available.len(), usize::saturating_add)
    }

    /// The circulation rules in force
    #[must_use]
    pub fn policy(&self) -> &CirculationPolicy {
        &self.policy
    }

    /// Recent transitions, oldest first
    #[must_use]
    pub fn history(&self) -> &VecDeque<CirculationRecord> {
        &self.history
    }

    /// Fail unless the desk is open
    fn ensure_open(&self) -> Result<(), DeskError> {
        if self.is_open() { Ok(()) } else { Err(DeskError::NotOpen) }
    }

    /// Name of the served member, requiring an open desk
    fn served_name(&self) -> Result<String, DeskError> {
        self.ensure_open()?;
        self.served.clone().ok_or(DeskError::NoMemberServed)
    }

    /// Due date for a loan starting today
    fn due_date(&self) -> Day {
        self.today().saturating_add(self.policy.loan_days)
    }

    /// Append to the bounded history and notify observers
    fn record(&mut self, event: DeskEvent) {
        let day = self.today();
        for observer in &self.observers {
            observer.on_event(day, &event);
        }
        if self.policy.history_limit == 0 {
            return;
        }
        self.history.push_back(CirculationRecord { day, event });
        while self.history.len() > self.policy.history_limit {
            self.history.pop_front();
        }
    }

    /// Record a batch of events in order
    fn record_all(&mut self, events: Vec<DeskEvent>) {
        for event in events {
            self.record(event);
        }
    }

    /// Pass a member's overdue notices to observers, if there are any
    fn notify_overdue(&self, member: &Member) {
        let notices = member.overdue_notices(self.today());
        if notices.is_empty() {
            return;
        }
        for observer in &self.observers {
            observer.on_overdue(self.today(), &notices);
        }
    }
}

/// How a search query is matched against a rendered book
#[derive(Debug)]
enum Matcher {
    /// Case-insensitive regular expression
    Pattern(Regex),
    /// Lowercased query matched as a plain substring
    Literal(String),
}

impl Matcher {
    /// Compile the query, falling back to a literal match when it is not a
    /// valid pattern
    fn new(query: &str) -> Self {
        match RegexBuilder::new(query).case_insensitive(true).build() {
            Ok(pattern) => Self::Pattern(pattern),
            Err(err) => {
                debug!("event=search_literal query={query:?} reason={err}");
                Self::Literal(query.to_lowercase())
            }
        }
    }

    /// Whether the rendered book matches
    fn is_match(&self, text: &str) -> bool {
        match self {
            Self::Pattern(pattern) => pattern.is_match(text),
            Self::Literal(needle) => text.to_lowercase().contains(needle.as_str()),
        }
    }
}
