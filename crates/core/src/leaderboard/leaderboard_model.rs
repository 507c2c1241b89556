use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::leaderboard_errors::LeaderboardError;

/// Closed set of sortable leaderboard metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum LeaderboardMetric {
    #[default]
    EcoPoints,
    CarbonReduced,
    WaterSaved,
    TreesPlanted,
}

impl LeaderboardMetric {
    pub const ALL: [LeaderboardMetric; 4] = [
        LeaderboardMetric::EcoPoints,
        LeaderboardMetric::CarbonReduced,
        LeaderboardMetric::WaterSaved,
        LeaderboardMetric::TreesPlanted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeaderboardMetric::EcoPoints => "ecoPoints",
            LeaderboardMetric::CarbonReduced => "carbonReduced",
            LeaderboardMetric::WaterSaved => "waterSaved",
            LeaderboardMetric::TreesPlanted => "treesPlanted",
        }
    }
}

impl fmt::Display for LeaderboardMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaderboardMetric {
    type Err = LeaderboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| LeaderboardError::InvalidMetric(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardScope {
    AllStates,
    /// A single state, identified by its code.
    State(String),
}

/// Aggregates shared by state rows and user rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MetricTotals {
    pub eco_points: i64,
    pub carbon_reduced: Decimal,
    pub water_saved: u64,
    pub trees_planted: u64,
}

impl MetricTotals {
    pub fn value(&self, metric: LeaderboardMetric) -> Decimal {
        match metric {
            LeaderboardMetric::EcoPoints => Decimal::from(self.eco_points),
            LeaderboardMetric::CarbonReduced => self.carbon_reduced,
            LeaderboardMetric::WaterSaved => Decimal::from(self.water_saved),
            LeaderboardMetric::TreesPlanted => Decimal::from(self.trees_planted),
        }
    }

    pub fn add(&mut self, other: &MetricTotals) {
        self.eco_points = self.eco_points.saturating_add(other.eco_points);
        self.carbon_reduced = self.carbon_reduced.saturating_add(other.carbon_reduced);
        self.water_saved = self.water_saved.saturating_add(other.water_saved);
        self.trees_planted = self.trees_planted.saturating_add(other.trees_planted);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardUser {
    pub user_id: String,
    pub display_name: Option<String>,
    pub level: i64,
    #[serde(flatten)]
    pub totals: MetricTotals,
    pub rank: u32,
}

/// Derived ranking row for one state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub state: String,
    pub code: String,
    pub population: u64,
    #[serde(flatten)]
    pub totals: MetricTotals,
    pub rank: u32,
    pub top_users: Vec<LeaderboardUser>,
}
