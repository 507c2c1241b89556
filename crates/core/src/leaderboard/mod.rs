//! Leaderboard module - state rankings derived from account aggregates.

mod leaderboard_errors;
mod leaderboard_model;
mod leaderboard_service;

pub use leaderboard_errors::LeaderboardError;
pub use leaderboard_model::{
    LeaderboardEntry, LeaderboardMetric, LeaderboardScope, LeaderboardUser, MetricTotals,
};
pub use leaderboard_service::LeaderboardService;
