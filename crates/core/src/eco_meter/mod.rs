//! Eco-meter module - daily carbon footprint assessment.

mod eco_meter_calculator;
mod eco_meter_model;

pub use eco_meter_calculator::{
    assess_footprint, food_emissions, rating_for, transport_factor, AVERAGE_DAILY_FOOTPRINT,
    ELECTRICITY_FACTOR, POINTS_PER_KG_SAVED,
};
pub use eco_meter_model::{
    FoodChoice, FootprintAssessment, FootprintBreakdown, FootprintInput, FootprintRating,
    FootprintSubmission, TransportMode,
};
