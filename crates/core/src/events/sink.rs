use std::sync::{Arc, Mutex};

use super::DomainEvent;

/// Receives [`DomainEvent`]s after a ledger, inventory or challenge change
/// has been committed.
///
/// `emit` runs while the caller still holds the per-user lock, so it must
/// not block. A sink failing to deliver never undoes the committed change.
pub trait DomainEventSink: Send + Sync {
    fn emit(&self, event: DomainEvent);
}

/// Discards every event.
#[derive(Clone, Copy, Default)]
pub struct NoOpDomainEventSink;

impl DomainEventSink for NoOpDomainEventSink {
    fn emit(&self, _event: DomainEvent) {}
}

/// Keeps emitted events in memory, in emission order.
#[derive(Clone, Default)]
pub struct MockDomainEventSink {
    recorded: Arc<Mutex<Vec<DomainEvent>>>,
}

impl MockDomainEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.recorded
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    /// Event names only, handy for asserting on sequences.
    pub fn names(&self) -> Vec<&'static str> {
        self.recorded
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .iter()
            .map(DomainEvent::name)
            .collect()
    }
}

impl DomainEventSink for MockDomainEventSink {
    fn emit(&self, event: DomainEvent) {
        self.recorded
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(event);
    }
}
