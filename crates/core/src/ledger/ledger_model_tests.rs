use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;

use super::*;
use crate::errors::Error;

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

#[test]
fn test_level_is_floor_of_xp() {
    let mut account = UserAccount::new("u", 15_680, now());
    assert_eq!(account.level(), 0);
    account
        .apply(&AccountChangeset::new("u").credit(1_999, "bonus"), now())
        .unwrap();
    assert_eq!(account.level(), 1);
    account
        .apply(&AccountChangeset::new("u").credit(1, "bonus"), now())
        .unwrap();
    assert_eq!(account.level(), 2);
}

#[test]
fn test_debit_does_not_reduce_xp() {
    let mut account = UserAccount::new("u", 1_000, now());
    account
        .apply(&AccountChangeset::new("u").credit(300, "bonus"), now())
        .unwrap();
    account
        .apply(&AccountChangeset::new("u").debit(1_200, "perk:2"), now())
        .unwrap();
    assert_eq!(account.balance, 100);
    assert_eq!(account.xp, 300);
    assert_eq!(account.lifetime_earned, 1_300);
}

#[test]
fn test_rejected_changeset_leaves_account_untouched() {
    let mut account = UserAccount::new("u", 10, now());
    account.badges.insert("1".to_string());
    let before = account.clone();

    let err = account
        .apply(
            &AccountChangeset::new("u").credit(5, "bonus").grant_badge("1"),
            now(),
        )
        .unwrap_err();
    assert!(matches!(err, Error::Ledger(LedgerError::AlreadyUnlocked(_))));
    assert_eq!(account, before);
}

#[test]
fn test_balance_change_requires_reason() {
    let account = UserAccount::new("u", 10, now());
    let err = account
        .check(&AccountChangeset::new("u").credit(5, "  "))
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn test_streak_rules() {
    let mut account = UserAccount::new("u", 0, now());
    account.register_activity(day(1));
    assert_eq!(account.streak, 1);
    account.register_activity(day(2));
    account.register_activity(day(2));
    assert_eq!(account.streak, 2);
    // Backdated activity changes nothing.
    account.register_activity(day(1));
    assert_eq!(account.streak, 2);
    account.register_activity(day(5));
    assert_eq!(account.streak, 1);
    assert_eq!(account.last_active_on, Some(day(5)));
}

#[test]
fn test_impact_accumulates_and_rejects_negative_carbon() {
    let mut account = UserAccount::new("u", 0, now());
    let impact = ImpactTotals {
        carbon_reduced: dec!(1.25),
        water_saved: 40,
        trees_planted: 1,
    };
    account
        .apply(&AccountChangeset::new("u").impact(impact.clone()), now())
        .unwrap();
    account
        .apply(&AccountChangeset::new("u").impact(impact), now())
        .unwrap();
    assert_eq!(account.impact.carbon_reduced, dec!(2.50));
    assert_eq!(account.impact.water_saved, 80);

    let negative = ImpactTotals {
        carbon_reduced: dec!(-1),
        ..Default::default()
    };
    assert!(account
        .apply(&AccountChangeset::new("u").impact(negative), now())
        .is_err());
    assert_eq!(account.impact.trees_planted, 2);
}

#[test]
fn test_oversized_or_overflowing_impact_is_rejected() {
    let mut account = UserAccount::new("u", 100, now());
    let huge = ImpactTotals {
        carbon_reduced: rust_decimal::Decimal::MAX,
        ..Default::default()
    };
    let err = account
        .apply(&AccountChangeset::new("u").impact(huge), now())
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    account.impact.carbon_reduced = rust_decimal::Decimal::MAX;
    account.impact.water_saved = u64::MAX;
    let before = account.clone();
    let changeset = AccountChangeset::new("u")
        .credit(10, "bonus")
        .impact(ImpactTotals {
            carbon_reduced: dec!(1),
            water_saved: 1,
            trees_planted: 0,
        });
    assert!(matches!(
        account.apply(&changeset, now()).unwrap_err(),
        Error::Validation(_)
    ));
    assert_eq!(account, before);
}

#[test]
fn test_profile_update_only_sets_given_fields() {
    let mut account = UserAccount::new("u", 0, now());
    account
        .apply(
            &AccountChangeset::new("u").profile(ProfileUpdate {
                display_name: Some("Asha".to_string()),
                state_code: Some("MH".to_string()),
            }),
            now(),
        )
        .unwrap();
    account
        .apply(
            &AccountChangeset::new("u").profile(ProfileUpdate {
                display_name: None,
                state_code: Some("KA".to_string()),
            }),
            now(),
        )
        .unwrap();
    assert_eq!(account.display_name.as_deref(), Some("Asha"));
    assert_eq!(account.state_code.as_deref(), Some("KA"));
}
