//! Domain events module.
//!
//! Provides domain event types and the sink trait for emitting events
//! after successful domain mutations. Runtime adapters (the HTTP server) implement
//! the sink to log or forward events.

mod domain_event;
mod sink;

pub use domain_event::*;
pub use sink::*;
