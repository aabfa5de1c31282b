//! Host event subscriptions
//!
//! Handlers are registered explicitly and stay registered for as long as the
//! returned [`Subscription`] is alive.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

/// Notifications the host sends to the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// A different document (or none) became active
    FocusChanged,
    /// Content of some open document changed
    DocumentModified { path: String },
}

type Handler = Arc<dyn Fn(&HostEvent) + Send + Sync>;

#[derive(Default)]
struct Handlers {
    next_id: u64,
    entries: Vec<(u64, Handler)>,
}

/// Registry of host event handlers
#[derive(Clone, Default)]
pub struct EventBus {
    handlers: Arc<Mutex<Handlers>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler; dropping the returned handle unregisters it
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&HostEvent) + Send + Sync + 'static,
    {
        let mut handlers = self.handlers.lock();
        let id = handlers.next_id;
        handlers.next_id += 1;
        handlers.entries.push((id, Arc::new(handler)));

        Subscription {
            id,
            handlers: Arc::downgrade(&self.handlers),
        }
    }

    /// Deliver an event to every handler registered at the time of the call,
    /// in registration order. Handlers run without the registry locked, so they
    /// may subscribe or drop subscriptions themselves.
    pub fn publish(&self, event: HostEvent) {
        let snapshot: Vec<Handler> = self
            .handlers
            .lock()
            .entries
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();

        for handler in snapshot {
            handler(&event);
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.lock().entries.len()
    }
}

/// Unsubscribe handle returned by [`EventBus::subscribe`]
pub struct Subscription {
    id: u64,
    handlers: Weak<Mutex<Handlers>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        // Drop does the work
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(handlers) = self.handlers.upgrade() {
            handlers.lock().entries.retain(|(id, _)| *id != self.id);
        }
    }
}
