//! Web domain event handling.
//!
//! Domain events are logged and fanned out to SSE subscribers.

mod sink;

pub use sink::WebDomainEventSink;
