//! Publish/subscribe channel for view events
//!
//! One bus per session. Handlers are called synchronously, in the order
//! they were registered, and only for the event kind they subscribed to.
//! A handler cannot publish on the bus that is calling it; views hand the
//! events they produce back to the session instead.

use tracing::debug;

use crate::events::{EventKind, ViewEvent};

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&ViewEvent)>;

struct Subscription {
    id: SubscriptionId,
    kind: EventKind,
    handler: Handler,
}

#[derive(Default)]
pub struct EventBus {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one event kind
    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&ViewEvent) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            kind,
            handler: Box::new(handler),
        });
        id
    }

    /// Remove a handler. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Deliver an event to every matching handler; returns how many ran
    pub fn publish(&mut self, event: &ViewEvent) -> usize {
        let kind = event.kind();
        let mut delivered = 0;

        for subscription in self.subscriptions.iter_mut().filter(|s| s.kind == kind) {
            (subscription.handler)(event);
            delivered += 1;
        }

        debug!(%event, delivered, "Published view event");
        delivered
    }

    /// Number of handlers registered for a kind
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscriptions.iter().filter(|s| s.kind == kind).count()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}
