//! Daily carbon footprint assessment.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::eco_meter_model::{
    FoodChoice, FootprintAssessment, FootprintBreakdown, FootprintInput, FootprintRating,
    TransportMode,
};
use crate::errors::{Error, Result, ValidationError};

/// Average daily footprint, kg CO₂.
pub const AVERAGE_DAILY_FOOTPRINT: Decimal = dec!(4.5);
/// Points per kilogram below the average.
pub const POINTS_PER_KG_SAVED: Decimal = dec!(20);
/// kg CO₂ per kWh.
pub const ELECTRICITY_FACTOR: Decimal = dec!(0.82);
const HIGH_ELECTRICITY_KWH: Decimal = dec!(20);

/// kg CO₂ per km.
pub fn transport_factor(mode: TransportMode) -> Decimal {
    match mode {
        TransportMode::Private => dec!(0.2),
        TransportMode::Public => dec!(0.05),
        TransportMode::Bicycle | TransportMode::Walking => Decimal::ZERO,
    }
}

/// kg CO₂ per day.
pub fn food_emissions(choice: FoodChoice) -> Decimal {
    match choice {
        FoodChoice::Meat => dec!(3.5),
        FoodChoice::Vegetarian => dec!(1.5),
        FoodChoice::Vegan => dec!(0.8),
        FoodChoice::Local => dec!(1.0),
    }
}

pub fn rating_for(total: Decimal) -> FootprintRating {
    if total <= dec!(2) {
        FootprintRating::Excellent
    } else if total <= dec!(3.5) {
        FootprintRating::Good
    } else {
        FootprintRating::NeedsImprovement
    }
}

fn suggestions_for(total: Decimal, input: &FootprintInput) -> Vec<String> {
    let mut suggestions = Vec::new();
    if input.transport == TransportMode::Private {
        suggestions
            .push("Try using public transport or cycling to reduce emissions by up to 75%".into());
    }
    if input.electricity > HIGH_ELECTRICITY_KWH {
        suggestions.push("Consider using LED bulbs and unplugging devices to save energy".into());
    }
    if input.food_choice == FoodChoice::Meat {
        suggestions
            .push("Having one vegetarian day per week can reduce your food footprint by 15%".into());
    }
    if total > dec!(3) {
        suggestions.push(
            "Small changes like shorter showers and air-drying clothes can make a big difference"
                .into(),
        );
    }
    suggestions
}

/// Largest accepted daily distance, km.
pub const MAX_DAILY_DISTANCE_KM: Decimal = dec!(10000);
/// Largest accepted daily electricity use, kWh.
pub const MAX_DAILY_ELECTRICITY_KWH: Decimal = dec!(10000);

fn check_range(value: Decimal, max: Decimal, field: &str) -> Result<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(invalid_input(format!("{} cannot be negative", field)));
    }
    if value > max {
        return Err(invalid_input(format!("{} cannot exceed {}", field, max)));
    }
    Ok(())
}

fn invalid_input(message: String) -> Error {
    Error::Validation(ValidationError::InvalidInput(message))
}

pub fn assess_footprint(input: &FootprintInput) -> Result<FootprintAssessment> {
    check_range(input.distance, MAX_DAILY_DISTANCE_KM, "distance")?;
    check_range(input.electricity, MAX_DAILY_ELECTRICITY_KWH, "electricity")?;

    let overflow = || invalid_input("footprint out of range".to_string());
    let transport = transport_factor(input.transport)
        .checked_mul(input.distance)
        .ok_or_else(overflow)?;
    let electricity = input
        .electricity
        .checked_mul(ELECTRICITY_FACTOR)
        .ok_or_else(overflow)?;
    let food = food_emissions(input.food_choice);
    let total = transport
        .checked_add(electricity)
        .and_then(|t| t.checked_add(food))
        .ok_or_else(overflow)?;

    let below_average = (AVERAGE_DAILY_FOOTPRINT - total).max(Decimal::ZERO);
    let eco_points_earned = (below_average * POINTS_PER_KG_SAVED)
        .floor()
        .to_i64()
        .unwrap_or(0);

    Ok(FootprintAssessment {
        total_footprint: total.round_dp(2),
        breakdown: FootprintBreakdown {
            transport: transport.round_dp(2),
            electricity: electricity.round_dp(2),
            food: food.round_dp(2),
        },
        eco_points_earned,
        carbon_reduced: below_average.round_dp(2),
        rating: rating_for(total),
        suggestions: suggestions_for(total, input),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(
        transport: TransportMode,
        distance: Decimal,
        electricity: Decimal,
        food_choice: FoodChoice,
    ) -> FootprintInput {
        FootprintInput {
            transport,
            distance,
            electricity,
            food_choice,
        }
    }

    #[test]
    fn test_low_footprint_earns_points() {
        // 0 + 1 * 0.82 + 0.8 = 1.62 kg
        let a = assess_footprint(&input(
            TransportMode::Bicycle,
            dec!(10),
            dec!(1),
            FoodChoice::Vegan,
        ))
        .unwrap();
        assert_eq!(a.total_footprint, dec!(1.62));
        assert_eq!(a.eco_points_earned, 57);
        assert_eq!(a.carbon_reduced, dec!(2.88));
        assert_eq!(a.rating, FootprintRating::Excellent);
        assert!(a.suggestions.is_empty());
    }

    #[test]
    fn test_high_footprint_earns_nothing_and_gets_suggestions() {
        // 20 * 0.2 + 25 * 0.82 + 3.5 = 28 kg
        let a = assess_footprint(&input(
            TransportMode::Private,
            dec!(20),
            dec!(25),
            FoodChoice::Meat,
        ))
        .unwrap();
        assert_eq!(a.total_footprint, dec!(28.00));
        assert_eq!(a.eco_points_earned, 0);
        assert_eq!(a.carbon_reduced, Decimal::ZERO);
        assert_eq!(a.rating, FootprintRating::NeedsImprovement);
        assert_eq!(a.suggestions.len(), 4);
    }

    #[test]
    fn test_rating_boundaries() {
        assert_eq!(rating_for(dec!(2)), FootprintRating::Excellent);
        assert_eq!(rating_for(dec!(2.01)), FootprintRating::Good);
        assert_eq!(rating_for(dec!(3.5)), FootprintRating::Good);
        assert_eq!(rating_for(dec!(3.51)), FootprintRating::NeedsImprovement);
    }

    #[test]
    fn test_points_are_floored() {
        // 10 * 0.05 + 0 + 1.5 = 2.0 kg, (4.5 - 2.0) * 20 = 50
        let a = assess_footprint(&input(
            TransportMode::Public,
            dec!(10),
            dec!(0),
            FoodChoice::Vegetarian,
        ))
        .unwrap();
        assert_eq!(a.eco_points_earned, 50);
        // 0.3 * 0.82 + 1.0 = 1.246, (4.5 - 1.246) * 20 = 65.08
        let b = assess_footprint(&input(
            TransportMode::Walking,
            dec!(3),
            dec!(0.3),
            FoodChoice::Local,
        ))
        .unwrap();
        assert_eq!(b.eco_points_earned, 65);
    }

    #[test]
    fn test_negative_inputs_are_rejected() {
        assert!(assess_footprint(&input(
            TransportMode::Public,
            dec!(-1),
            dec!(0),
            FoodChoice::Vegan,
        ))
        .is_err());
    }

    #[test]
    fn test_out_of_range_inputs_are_rejected() {
        let err = assess_footprint(&input(
            TransportMode::Private,
            Decimal::MAX,
            Decimal::MAX,
            FoodChoice::Meat,
        ))
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        assert!(assess_footprint(&input(
            TransportMode::Private,
            dec!(10000.01),
            dec!(0),
            FoodChoice::Meat,
        ))
        .is_err());

        let at_limit = assess_footprint(&input(
            TransportMode::Private,
            MAX_DAILY_DISTANCE_KM,
            MAX_DAILY_ELECTRICITY_KWH,
            FoodChoice::Meat,
        ))
        .unwrap();
        // 10000 * 0.2 + 10000 * 0.82 + 3.5
        assert_eq!(at_limit.total_footprint, dec!(10203.50));
        assert_eq!(at_limit.eco_points_earned, 0);
    }

    #[test]
    fn test_rating_serializes_with_display_text() {
        assert_eq!(
            serde_json::to_string(&FootprintRating::NeedsImprovement).unwrap(),
            "\"Needs Improvement\""
        );
    }
}
