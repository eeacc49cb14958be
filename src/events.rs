//! Page content change notifications.
//!
//! Observers are registered on a document's [`EventHub`] for the lifetime of a
//! session and removed explicitly. They receive only the page index, never a
//! handle on the document, so a notification cannot re-enter tree mutation.

use std::fmt;
use std::rc::Rc;

/// Receives page-content-changed notifications.
pub trait PageContentObserver {
    /// Called synchronously after content on `page` changed.
    fn on_page_content_changed(&self, page: u32);
}

/// Observer that logs every notification at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingObserver;

impl PageContentObserver for LoggingObserver {
    fn on_page_content_changed(&self, page: u32) {
        log::info!("Page content changed: page {}", page);
    }
}

/// Token returned by [`EventHub::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Registry of page content observers.
#[derive(Default)]
pub struct EventHub {
    observers: Vec<(SubscriptionId, Rc<dyn PageContentObserver>)>,
    next_id: u64,
}

impl fmt::Debug for EventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl EventHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer.
    pub fn subscribe(&mut self, observer: Rc<dyn PageContentObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether no observer is registered.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Notify every observer, in subscription order.
    pub fn page_content_changed(&self, page: u32) {
        for (_, observer) in &self.observers {
            observer.on_page_content_changed(page);
        }
    }
}
