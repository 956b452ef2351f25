//! Circulation desk for a single-branch lending library.
//!
//! This crate models the daily circulation workflow: opening the desk,
//! issuing cards, serving one member at a time, lending and taking back
//! books, renewals, catalog search and overdue lookups. Every book lives
//! either on the shelf or with exactly one member, and the [`Desk`] is the
//! only thing that moves it.

pub mod book;
pub mod catalog;
pub mod clock;
pub mod desk;
pub mod events;
pub mod member;
pub mod observers;
pub mod outcome;
pub mod policy;
pub mod report;

pub use book::{Book, BookId, BookStatus};
pub use catalog::{CatalogError, load_catalog, parse_catalog};
pub use clock::{Clock, Day};
pub use desk::{CirculationRecord, Desk, DeskError, DeskState};
pub use events::DeskEvent;
pub use member::{BOOK_LIMIT, Member, OverdueNotice};
pub use observers::{DeskObserver, NotificationService, TransitionLogger};
pub use outcome::{
    BatchOutcome, BatchReport, CardOutcome, CheckInOutcome, CheckOutOutcome, RenewOutcome,
    SearchOutcome,
};
pub use policy::CirculationPolicy;
