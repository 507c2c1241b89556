//! Catalog module - static badge, perk, mission, challenge and state definitions.

mod catalog_model;
mod catalog_seed;

pub use catalog_model::{
    Badge, BadgeRarity, Catalog, Challenge, ChallengeType, Mission, MissionRecurrence, Perk,
    PerkCategory, StateBaseline,
};
