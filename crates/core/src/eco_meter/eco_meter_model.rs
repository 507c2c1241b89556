use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Private,
    Public,
    Bicycle,
    Walking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodChoice {
    Meat,
    Vegetarian,
    Vegan,
    Local,
}

/// One day of self-reported activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FootprintInput {
    pub transport: TransportMode,
    /// Kilometres travelled.
    pub distance: Decimal,
    /// Kilowatt-hours consumed.
    pub electricity: Decimal,
    pub food_choice: FoodChoice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FootprintRating {
    Excellent,
    Good,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
}

/// Kilograms of CO₂ per source, rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FootprintBreakdown {
    pub transport: Decimal,
    pub electricity: Decimal,
    pub food: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FootprintAssessment {
    pub total_footprint: Decimal,
    pub breakdown: FootprintBreakdown,
    pub eco_points_earned: i64,
    /// Kilograms below the daily average, zero when above it.
    pub carbon_reduced: Decimal,
    pub rating: FootprintRating,
    pub suggestions: Vec<String>,
}

/// Assessment submitted for a user on a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FootprintSubmission {
    pub assessment: FootprintAssessment,
    /// Points credited by this call; 0 when the date was already submitted.
    pub points_credited: i64,
    pub balance: i64,
}
