//! Web domain event sink implementation.

use ecopoints_core::events::{DomainEvent, DomainEventSink};

use crate::events::{EventBus, ServerEvent};

/// Domain event sink for the web server runtime.
///
/// Records every event as a structured log line and publishes it on the
/// [`EventBus`]. Both steps are non-blocking.
pub struct WebDomainEventSink {
    event_bus: EventBus,
}

impl WebDomainEventSink {
    pub fn new(event_bus: EventBus) -> Self {
        Self { event_bus }
    }
}

impl DomainEventSink for WebDomainEventSink {
    fn emit(&self, event: DomainEvent) {
        let name = event.name();
        match serde_json::to_value(&event) {
            Ok(payload) => {
                tracing::info!(event = name, payload = %payload, "domain event");
                self.event_bus
                    .publish(ServerEvent::with_payload(name, payload));
            }
            Err(err) => {
                tracing::warn!(event = name, "Failed to serialize domain event: {}", err);
                self.event_bus.publish(ServerEvent::new(name));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emitted_events_reach_the_bus() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();
        let sink = WebDomainEventSink::new(bus);

        sink.emit(DomainEvent::badge_unlocked("alice", "3"));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.name, "badge_unlocked");
        let payload = received.payload.unwrap();
        assert_eq!(payload["type"], "badge_unlocked");
        assert_eq!(payload["user_id"], "alice");
    }
}
