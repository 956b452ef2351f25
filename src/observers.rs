use log::{info, warn};

use crate::{clock::Day, events::DeskEvent, member::OverdueNotice};

/// Trait for desk event observation
pub trait DeskObserver {
    /// Called after every successful desk transition
    fn on_event(&self, day: Day, event: &DeskEvent);

    /// Called when an overdue lookup finds overdue books
    fn on_overdue(&self, _day: Day, _notices: &[OverdueNotice]) {}
}

/// Logs every transition at `info`
#[derive(Debug)]
pub struct TransitionLogger;

impl DeskObserver for TransitionLogger {
    fn on_event(&self, day: Day, event: &DeskEvent) {
        match event {
            DeskEvent::Opened(_) => info!("event=desk_open day={day}"),
            DeskEvent::Closed => info!("event=desk_close day={day}"),
            DeskEvent::CardIssued(name) => info!("event=card_issue day={day} member={name}"),
            DeskEvent::Serving(name) => info!("event=serve day={day} member={name}"),
            DeskEvent::CheckedOut { member, book_id, due } => {
                info!("event=check_out day={day} member={member} book={book_id} due={due}");
            }
            DeskEvent::CheckedIn { member, book_id } => {
                info!("event=check_in day={day} member={member} book={book_id}");
            }
            DeskEvent::Renewed { member, book_id, due } => {
                info!("event=renew day={day} member={member} book={book_id} due={due}");
            }
        }
    }
}

/// Sends reminders to members holding overdue books
#[derive(Debug)]
pub struct NotificationService;

impl DeskObserver for NotificationService {
    fn on_event(&self, _day: Day, event: &DeskEvent) {
        if let DeskEvent::CheckedIn { member, book_id } = event {
            info!("event=notify kind=returned member={member} book={book_id}");
        }
    }

    fn on_overdue(&self, day: Day, notices: &[OverdueNotice]) {
        for notice in notices {
            warn!("event=notify kind=overdue day={day} {notice}");
        }
    }
}
