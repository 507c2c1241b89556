//! Catalog domain models: badges, perks, missions, challenges and state baselines.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};

/// Badge rarity tier. Ordering follows the declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeRarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

/// A non-purchasable milestone marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub rarity: BadgeRarity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerkCategory {
    Discount,
    Experience,
    Product,
}

/// A reward redeemable for points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Perk {
    pub id: String,
    pub title: String,
    pub description: String,
    pub points_cost: i64,
    pub category: PerkCategory,
    pub brand: String,
    pub discount: String,
    /// Administrative switch. A disabled perk is unavailable whatever its stock.
    pub enabled: bool,
    /// Units available when the perk is first seeded. `None` means unlimited.
    pub initial_stock: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissionRecurrence {
    #[default]
    Daily,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub id: String,
    pub title: String,
    pub description: String,
    pub points: i64,
    pub icon: String,
    #[serde(default)]
    pub recurrence: MissionRecurrence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeType {
    Water,
    Carbon,
    Agriculture,
    Waste,
}

/// A time-windowed collective goal.
///
/// `start_date` and `end_date` are both inclusive calendar days; the window is
/// `[start_date 00:00, end_date + 1 day 00:00)` in the platform timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub challenge_type: ChallengeType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub target: u64,
    #[serde(default)]
    pub initial_progress: u64,
    pub reward: i64,
}

/// Baseline aggregates of a state before any tracked account contributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateBaseline {
    pub code: String,
    pub name: String,
    pub population: u64,
    #[serde(default)]
    pub eco_points: i64,
    #[serde(default)]
    pub carbon_reduced: Decimal,
    #[serde(default)]
    pub water_saved: u64,
    #[serde(default)]
    pub trees_planted: u64,
}

/// Static catalog loaded once at startup. Immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default)]
    pub badges: Vec<Badge>,
    #[serde(default)]
    pub perks: Vec<Perk>,
    #[serde(default)]
    pub missions: Vec<Mission>,
    #[serde(default)]
    pub challenges: Vec<Challenge>,
    #[serde(default)]
    pub states: Vec<StateBaseline>,
}

impl Catalog {
    /// Parses and validates a catalog from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Reads, parses and validates a catalog file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Catalog(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        ensure_unique("badge", self.badges.iter().map(|b| b.id.as_str()))?;
        ensure_unique("perk", self.perks.iter().map(|p| p.id.as_str()))?;
        ensure_unique("mission", self.missions.iter().map(|m| m.id.as_str()))?;
        ensure_unique("challenge", self.challenges.iter().map(|c| c.id.as_str()))?;
        ensure_unique("state", self.states.iter().map(|s| s.code.as_str()))?;

        for badge in &self.badges {
            non_empty("badge name", &badge.name)?;
        }
        for perk in &self.perks {
            non_empty("perk title", &perk.title)?;
            if perk.points_cost <= 0 {
                return Err(invalid(format!(
                    "Perk '{}' must have a positive points cost",
                    perk.id
                )));
            }
        }
        for mission in &self.missions {
            non_empty("mission title", &mission.title)?;
            if mission.points < 0 {
                return Err(invalid(format!(
                    "Mission '{}' cannot award negative points",
                    mission.id
                )));
            }
        }
        for challenge in &self.challenges {
            non_empty("challenge title", &challenge.title)?;
            if challenge.start_date > challenge.end_date {
                return Err(invalid(format!(
                    "Challenge '{}' ends before it starts",
                    challenge.id
                )));
            }
            if challenge.target == 0 {
                return Err(invalid(format!(
                    "Challenge '{}' must have a positive target",
                    challenge.id
                )));
            }
            if challenge.reward < 0 {
                return Err(invalid(format!(
                    "Challenge '{}' cannot award negative points",
                    challenge.id
                )));
            }
        }
        for state in &self.states {
            non_empty("state name", &state.name)?;
        }
        Ok(())
    }

    pub fn badge(&self, badge_id: &str) -> Option<&Badge> {
        self.badges.iter().find(|b| b.id == badge_id)
    }

    pub fn perk(&self, perk_id: &str) -> Option<&Perk> {
        self.perks.iter().find(|p| p.id == perk_id)
    }

    pub fn mission(&self, mission_id: &str) -> Option<&Mission> {
        self.missions.iter().find(|m| m.id == mission_id)
    }

    pub fn challenge(&self, challenge_id: &str) -> Option<&Challenge> {
        self.challenges.iter().find(|c| c.id == challenge_id)
    }

    /// Looks a state up by its code, case-insensitively.
    pub fn state(&self, code: &str) -> Option<&StateBaseline> {
        self.states
            .iter()
            .find(|s| s.code.eq_ignore_ascii_case(code))
    }
}

fn ensure_unique<'a>(what: &str, ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(format!(
                "{} id",
                what
            ))));
        }
        if !seen.insert(id) {
            return Err(invalid(format!("Duplicate {} id '{}'", what, id)));
        }
    }
    Ok(())
}

fn non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            field.to_string(),
        )));
    }
    Ok(())
}

fn invalid(message: String) -> Error {
    Error::Validation(ValidationError::InvalidInput(message))
}
