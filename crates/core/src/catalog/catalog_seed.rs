//! Built-in catalog used when no catalog file is configured.

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::catalog_model::{
    Badge, BadgeRarity, Catalog, Challenge, ChallengeType, Mission, MissionRecurrence, Perk,
    PerkCategory, StateBaseline,
};

impl Catalog {
    /// Returns the built-in catalog.
    pub fn seeded() -> Self {
        Catalog {
            badges: seeded_badges(),
            perks: seeded_perks(),
            missions: seeded_missions(),
            challenges: seeded_challenges(),
            states: seeded_states(),
        }
    }
}

fn badge(id: &str, name: &str, description: &str, icon: &str, rarity: BadgeRarity) -> Badge {
    Badge {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        rarity,
    }
}

fn seeded_badges() -> Vec<Badge> {
    vec![
        badge("1", "Water Warrior", "Saved 1000L of water", "💧", BadgeRarity::Rare),
        badge("2", "Carbon Crusher", "Reduced 100kg CO₂", "🌱", BadgeRarity::Epic),
        badge("3", "Tree Planter", "Planted 10 trees", "🌳", BadgeRarity::Common),
        badge("4", "Eco Explorer", "Complete 50 challenges", "🔍", BadgeRarity::Rare),
        badge("5", "Green Guardian", "Maintain 30-day streak", "🛡️", BadgeRarity::Legendary),
        badge("6", "Solar Supporter", "Use renewable energy", "☀️", BadgeRarity::Epic),
        badge("7", "Plastic-Free Pro", "Zero plastic week", "🚫", BadgeRarity::Rare),
        badge("8", "Compost King", "Create 10kg compost", "♻️", BadgeRarity::Common),
    ]
}

#[allow(clippy::too_many_arguments)]
fn perk(
    id: &str,
    title: &str,
    description: &str,
    points_cost: i64,
    category: PerkCategory,
    brand: &str,
    discount: &str,
    enabled: bool,
    initial_stock: Option<u32>,
) -> Perk {
    Perk {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        points_cost,
        category,
        brand: brand.to_string(),
        discount: discount.to_string(),
        enabled,
        initial_stock,
    }
}

fn seeded_perks() -> Vec<Perk> {
    vec![
        perk(
            "1",
            "20% Off Organic Groceries",
            "Get 20% discount on organic fruits, vegetables, and groceries",
            500,
            PerkCategory::Discount,
            "EcoMart",
            "20%",
            true,
            Some(100),
        ),
        perk(
            "2",
            "Electric Vehicle Test Drive",
            "Free test drive experience with premium electric vehicles",
            1000,
            PerkCategory::Experience,
            "GreenDrive",
            "Free",
            true,
            Some(50),
        ),
        perk(
            "3",
            "Solar Panel Consultation",
            "Free home visit and consultation for solar panel installation",
            1500,
            PerkCategory::Experience,
            "SunPower India",
            "Free",
            true,
            Some(25),
        ),
        perk(
            "4",
            "Eco-Friendly Phone Case",
            "Biodegradable phone case made from natural materials",
            800,
            PerkCategory::Product,
            "GreenTech",
            "100%",
            false,
            Some(0),
        ),
    ]
}

fn mission(id: &str, title: &str, description: &str, points: i64, icon: &str) -> Mission {
    Mission {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        points,
        icon: icon.to_string(),
        recurrence: MissionRecurrence::Daily,
    }
}

fn seeded_missions() -> Vec<Mission> {
    vec![
        mission("1", "Use Public Transport", "Take bus/metro instead of private vehicle", 50, "🚌"),
        mission("2", "Plastic-Free Shopping", "Shop without using plastic bags", 30, "🛍️"),
        mission("3", "Save Water", "Reduce shower time by 2 minutes", 40, "💧"),
        mission("4", "Eat Local", "Choose locally sourced food", 35, "🥬"),
        mission("5", "Digital Receipt", "Opt for digital receipts instead of paper", 20, "📱"),
        mission("6", "LED Switch", "Replace one bulb with LED", 60, "💡"),
        mission("7", "Compost Organic Waste", "Start composting kitchen waste", 45, "♻️"),
    ]
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn seeded_challenges() -> Vec<Challenge> {
    vec![
        Challenge {
            id: "1".to_string(),
            title: "Water Warrior Month".to_string(),
            description: "Collectively save 20 million liters of water across India".to_string(),
            challenge_type: ChallengeType::Water,
            start_date: date(2024, 1, 1),
            end_date: date(2024, 1, 31),
            target: 20_000_000,
            initial_progress: 15_234_567,
            reward: 1000,
        },
        Challenge {
            id: "2".to_string(),
            title: "Carbon Neutral February".to_string(),
            description: "Reduce carbon footprint by 50,000 tonnes nationwide".to_string(),
            challenge_type: ChallengeType::Carbon,
            start_date: date(2024, 2, 1),
            end_date: date(2024, 2, 29),
            target: 50_000,
            initial_progress: 0,
            reward: 1500,
        },
        Challenge {
            id: "3".to_string(),
            title: "Million Trees March".to_string(),
            description: "Plant 1 million trees across Indian cities".to_string(),
            challenge_type: ChallengeType::Agriculture,
            start_date: date(2024, 3, 1),
            end_date: date(2024, 3, 31),
            target: 1_000_000,
            initial_progress: 0,
            reward: 2000,
        },
    ]
}

fn seeded_states() -> Vec<StateBaseline> {
    vec![
        StateBaseline {
            code: "MH".to_string(),
            name: "Maharashtra".to_string(),
            population: 112_374_333,
            eco_points: 2_456_780,
            carbon_reduced: dec!(45600),
            water_saved: 1_245_000,
            trees_planted: 23_400,
        },
        StateBaseline {
            code: "TN".to_string(),
            name: "Tamil Nadu".to_string(),
            population: 72_147_030,
            eco_points: 2_234_560,
            carbon_reduced: dec!(42300),
            water_saved: 1_156_000,
            trees_planted: 21_800,
        },
        StateBaseline {
            code: "KA".to_string(),
            name: "Karnataka".to_string(),
            population: 61_095_297,
            eco_points: 2_098_750,
            carbon_reduced: dec!(39800),
            water_saved: 1_089_000,
            trees_planted: 20_500,
        },
        StateBaseline {
            code: "GJ".to_string(),
            name: "Gujarat".to_string(),
            population: 60_439_692,
            eco_points: 1_987_650,
            carbon_reduced: dec!(37200),
            water_saved: 1_023_000,
            trees_planted: 19_200,
        },
        StateBaseline {
            code: "UP".to_string(),
            name: "Uttar Pradesh".to_string(),
            population: 199_812_341,
            eco_points: 1_876_540,
            carbon_reduced: dec!(35100),
            water_saved: 967_000,
            trees_planted: 18_100,
        },
    ]
}
