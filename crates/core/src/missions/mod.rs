//! Missions module - daily missions and their per-date completion state.

mod missions_errors;
mod missions_model;
mod missions_service;

pub use missions_errors::MissionError;
pub use missions_model::{MissionBoard, MissionOutcome, MissionProgress};
pub use missions_service::MissionTracker;
