#[cfg(test)]
mod tests {
    use crate::catalog::Catalog;
    use crate::challenges::ChallengeError;
    use crate::config::RewardsConfig;
    use crate::eco_meter::{FoodChoice, FootprintInput, TransportMode};
    use crate::errors::{DatabaseError, Error, ErrorClass, Result, ValidationError};
    use crate::events::{DomainEvent, MockDomainEventSink};
    use crate::inventory::{InventoryError, StockLevel, StockRepositoryTrait};
    use crate::leaderboard::{LeaderboardMetric, LeaderboardScope, LeaderboardService};
    use crate::ledger::{
        AccountChangeset, CommitOutcome, ImpactTotals, InMemoryLedgerStore, LedgerEntry,
        LedgerError, LedgerRepositoryTrait, MissionCompletion, ProfileUpdate, Redemption,
        UserAccount,
    };
    use crate::missions::MissionError;
    use crate::rewards::{RewardError, RewardService, RewardServiceTrait};
    use crate::utils::FixedClock;
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    struct Harness {
        service: Arc<RewardService>,
        store: Arc<InMemoryLedgerStore>,
        sink: MockDomainEventSink,
        clock: Arc<FixedClock>,
    }

    /// 2024-03-15 10:00 IST.
    fn mid_march() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 4, 30, 0).unwrap()
    }

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn harness_with(catalog: Catalog) -> Harness {
        let clock = Arc::new(FixedClock::new(mid_march()));
        let store = Arc::new(InMemoryLedgerStore::with_clock(15_680, clock.clone()));
        let sink = MockDomainEventSink::new();
        let service = RewardService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(catalog),
            Arc::new(sink.clone()),
            clock.clone(),
            RewardsConfig::default(),
        );
        service.initialize().unwrap();
        Harness {
            service: Arc::new(service),
            store,
            sink,
            clock,
        }
    }

    fn harness() -> Harness {
        harness_with(Catalog::seeded())
    }

    fn catalog_with_perk(perk_id: &str, cost: i64, stock: Option<u32>) -> Catalog {
        let mut catalog = Catalog::seeded();
        let perk = catalog
            .perks
            .iter_mut()
            .find(|p| p.id == perk_id)
            .unwrap();
        perk.points_cost = cost;
        perk.initial_stock = stock;
        catalog
    }

    fn balance(h: &Harness, user: &str) -> i64 {
        h.store.find_account(user).unwrap().unwrap().balance
    }

    // --- Accounts and points ---

    #[tokio::test]
    async fn test_new_account_gets_starting_grant() {
        let h = harness();
        let summary = h.service.get_account("asha").await.unwrap();
        assert_eq!(summary.account.balance, 15_680);
        assert_eq!(summary.level, 0);
        let history = h.service.ledger_history("asha").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].reason, "starting_grant");
    }

    #[tokio::test]
    async fn test_award_points_credits_balance_and_xp() {
        let h = harness();
        let update = h.service.award_points("asha", 1_200, "tree planting").await.unwrap();
        assert_eq!(update.balance, 16_880);
        assert_eq!(update.xp, 1_200);
        assert_eq!(update.level, 1);
        let history = h.service.ledger_history("asha").unwrap();
        assert_eq!(history.last().unwrap().reason, "tree planting");
        assert!(matches!(
            h.sink.events().last(),
            Some(DomainEvent::PointsAwarded { amount: 1_200, .. })
        ));
    }

    #[tokio::test]
    async fn test_negative_award_is_rejected_without_change() {
        let h = harness();
        h.service.get_account("asha").await.unwrap();
        let err = h.service.award_points("asha", -5, "bug").await.unwrap_err();
        assert!(matches!(err, Error::Ledger(LedgerError::InvalidAmount(-5))));
        assert_eq!(err.class(), ErrorClass::Validation);
        assert_eq!(balance(&h, "asha"), 15_680);
        assert_eq!(h.service.ledger_history("asha").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_award_requires_reason_and_user() {
        let h = harness();
        assert!(matches!(
            h.service.award_points("asha", 5, " ").await.unwrap_err(),
            Error::Validation(ValidationError::MissingField(_))
        ));
        assert!(matches!(
            h.service.award_points("", 5, "x").await.unwrap_err(),
            Error::Validation(ValidationError::MissingField(_))
        ));
    }

    #[tokio::test]
    async fn test_update_profile_validates_state() {
        let h = harness();
        let summary = h
            .service
            .update_profile(
                "asha",
                ProfileUpdate {
                    display_name: Some(" Asha ".to_string()),
                    state_code: Some("mh".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(summary.account.state_code.as_deref(), Some("MH"));
        assert_eq!(summary.account.display_name.as_deref(), Some("Asha"));

        let err = h
            .service
            .update_profile(
                "asha",
                ProfileUpdate {
                    display_name: None,
                    state_code: Some("ZZ".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::UnknownState(_))));
    }

    #[tokio::test]
    async fn test_record_impact_accumulates() {
        let h = harness();
        let impact = ImpactTotals {
            carbon_reduced: dec!(2.5),
            water_saved: 120,
            trees_planted: 1,
        };
        h.service.record_impact("asha", impact.clone()).await.unwrap();
        let summary = h.service.record_impact("asha", impact).await.unwrap();
        assert_eq!(summary.account.impact.carbon_reduced, dec!(5.0));
        assert_eq!(summary.account.impact.water_saved, 240);
        // Impact never moves the balance.
        assert_eq!(summary.account.balance, 15_680);
    }

    #[tokio::test]
    async fn test_oversized_impact_is_rejected_and_leaderboard_still_ranks() {
        let h = harness();
        h.service
            .update_profile(
                "asha",
                ProfileUpdate {
                    display_name: None,
                    state_code: Some("MH".to_string()),
                },
            )
            .await
            .unwrap();
        let err = h
            .service
            .record_impact(
                "asha",
                ImpactTotals {
                    carbon_reduced: rust_decimal::Decimal::MAX,
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::Validation);

        let summary = h
            .service
            .record_impact(
                "asha",
                ImpactTotals {
                    carbon_reduced: dec!(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(summary.account.impact.carbon_reduced, dec!(1));

        let leaderboard = LeaderboardService::new(h.store.clone(), Arc::new(Catalog::seeded()), 3);
        let entries = leaderboard
            .rank(LeaderboardMetric::CarbonReduced, &LeaderboardScope::AllStates)
            .unwrap();
        assert_eq!(entries.len(), 5);
    }

    // --- Redemption ---

    #[tokio::test]
    async fn test_redeem_perk_charges_once() {
        let h = harness();
        let receipt = h.service.redeem_perk("asha", "2").await.unwrap();
        assert_eq!(receipt.balance, 14_680);
        assert_eq!(receipt.remaining_stock, Some(49));
        assert!(receipt.code.starts_with("ECO-2-"));

        let err = h.service.redeem_perk("asha", "2").await.unwrap_err();
        assert!(matches!(err, Error::Ledger(LedgerError::AlreadyRedeemed(_))));
        assert_eq!(err.class(), ErrorClass::Conflict);
        assert_eq!(balance(&h, "asha"), 14_680);
        assert_eq!(h.store.get_stock("2").unwrap(), Some(StockLevel::Limited(49)));

        let redemptions = h.service.redemptions("asha").unwrap();
        assert_eq!(redemptions.len(), 1);
        assert_eq!(redemptions[0].code, receipt.code);
    }

    #[tokio::test]
    async fn test_redemption_codes_are_unique() {
        let h = harness();
        let a = h.service.redeem_perk("asha", "1").await.unwrap();
        let b = h.service.redeem_perk("ravi", "1").await.unwrap();
        let c = h.service.redeem_perk("asha", "2").await.unwrap();
        assert_ne!(a.code, b.code);
        assert_ne!(a.code, c.code);
        assert_ne!(b.code, c.code);
    }

    #[tokio::test]
    async fn test_redeem_error_cases() {
        let h = harness();
        assert!(matches!(
            h.service.redeem_perk("asha", "404").await.unwrap_err(),
            Error::Inventory(InventoryError::PerkNotFound(_))
        ));
        assert!(matches!(
            h.service.redeem_perk("asha", "4").await.unwrap_err(),
            Error::Inventory(InventoryError::PerkUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_insufficient_funds_leaves_stock_untouched() {
        let h = harness_with(catalog_with_perk("3", 20_000, Some(5)));
        let err = h.service.redeem_perk("asha", "3").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(LedgerError::InsufficientFunds {
                required: 20_000,
                available: 15_680
            })
        ));
        assert_eq!(balance(&h, "asha"), 15_680);
        assert_eq!(h.store.get_stock("3").unwrap(), Some(StockLevel::Limited(5)));
        assert!(h.service.redemptions("asha").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_exhausted_perk_is_out_of_stock() {
        let h = harness_with(catalog_with_perk("1", 500, Some(1)));
        h.service.redeem_perk("asha", "1").await.unwrap();
        let err = h.service.redeem_perk("ravi", "1").await.unwrap_err();
        assert!(matches!(err, Error::Inventory(InventoryError::OutOfStock(_))));
        assert_eq!(balance(&h, "ravi"), 15_680);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_same_user_concurrent_redemption_of_last_unit() {
        let h = harness_with(catalog_with_perk("2", 1_000, Some(1)));
        let (a, b) = tokio::join!(
            {
                let service = h.service.clone();
                tokio::spawn(async move { service.redeem_perk("asha", "2").await })
            },
            {
                let service = h.service.clone();
                tokio::spawn(async move { service.redeem_perk("asha", "2").await })
            }
        );
        let results = [a.unwrap(), b.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);
        let failure = results.iter().find_map(|r| r.as_ref().err()).unwrap();
        assert!(matches!(
            failure,
            Error::Ledger(LedgerError::AlreadyRedeemed(_))
                | Error::Inventory(InventoryError::OutOfStock(_))
        ));
        assert_eq!(balance(&h, "asha"), 14_680);
        assert_eq!(h.store.get_stock("2").unwrap(), Some(StockLevel::Limited(0)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_different_users_race_for_last_unit() {
        let h = harness_with(catalog_with_perk("1", 500, Some(1)));
        let (a, b) = tokio::join!(
            {
                let service = h.service.clone();
                tokio::spawn(async move { service.redeem_perk("asha", "1").await })
            },
            {
                let service = h.service.clone();
                tokio::spawn(async move { service.redeem_perk("ravi", "1").await })
            }
        );
        let results = [a.unwrap(), b.unwrap()];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let failure = results.iter().find_map(|r| r.as_ref().err()).unwrap();
        assert!(matches!(
            failure,
            Error::Inventory(InventoryError::OutOfStock(_))
        ));
        assert_eq!(h.store.get_stock("1").unwrap(), Some(StockLevel::Limited(0)));
        assert_eq!(balance(&h, "asha") + balance(&h, "ravi"), 2 * 15_680 - 500);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_many_users_never_oversell() {
        let h = harness_with(catalog_with_perk("3", 100, Some(5)));
        let handles: Vec<_> = (0..40)
            .map(|i| {
                let service = h.service.clone();
                tokio::spawn(async move { service.redeem_perk(&format!("user-{}", i), "3").await })
            })
            .collect();
        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 5);
        assert_eq!(h.store.get_stock("3").unwrap(), Some(StockLevel::Limited(0)));
    }

    /// Ledger whose commits fail whenever a redemption is attached.
    struct RejectingRedemptions(Arc<InMemoryLedgerStore>);

    impl LedgerRepositoryTrait for RejectingRedemptions {
        fn find_account(&self, user_id: &str) -> Result<Option<UserAccount>> {
            self.0.find_account(user_id)
        }
        fn get_or_create_account(&self, user_id: &str) -> Result<UserAccount> {
            self.0.get_or_create_account(user_id)
        }
        fn list_accounts(&self) -> Result<Vec<UserAccount>> {
            self.0.list_accounts()
        }
        fn commit(&self, changeset: AccountChangeset) -> Result<CommitOutcome> {
            if changeset.redemption.is_some() {
                return Err(DatabaseError::QueryFailed("disk full".to_string()).into());
            }
            self.0.commit(changeset)
        }
        fn ledger_entries(&self, user_id: &str) -> Result<Vec<LedgerEntry>> {
            self.0.ledger_entries(user_id)
        }
        fn has_ledger_reason(&self, user_id: &str, reason: &str) -> Result<bool> {
            self.0.has_ledger_reason(user_id, reason)
        }
        fn redemptions(&self, user_id: &str) -> Result<Vec<Redemption>> {
            self.0.redemptions(user_id)
        }
        fn next_redemption_sequence(&self) -> Result<u64> {
            self.0.next_redemption_sequence()
        }
        fn find_mission_completion(
            &self,
            user_id: &str,
            mission_id: &str,
            date: NaiveDate,
        ) -> Result<Option<MissionCompletion>> {
            self.0.find_mission_completion(user_id, mission_id, date)
        }
        fn mission_completions_on(
            &self,
            user_id: &str,
            date: NaiveDate,
        ) -> Result<Vec<MissionCompletion>> {
            self.0.mission_completions_on(user_id, date)
        }
        fn clear_mission_completions(&self, user_id: Option<&str>) -> Result<usize> {
            self.0.clear_mission_completions(user_id)
        }
    }

    #[tokio::test]
    async fn test_failed_debit_releases_reserved_unit() {
        let clock = Arc::new(FixedClock::new(mid_march()));
        let store = Arc::new(InMemoryLedgerStore::with_clock(15_680, clock.clone()));
        let service = RewardService::new(
            Arc::new(RejectingRedemptions(store.clone())),
            store.clone(),
            store.clone(),
            Arc::new(Catalog::seeded()),
            Arc::new(MockDomainEventSink::new()),
            clock,
            RewardsConfig::default(),
        );
        service.initialize().unwrap();

        let err = service.redeem_perk("asha", "3").await.unwrap_err();
        assert!(matches!(err, Error::Database(_)));
        assert_eq!(store.get_stock("3").unwrap(), Some(StockLevel::Limited(25)));
        assert_eq!(store.find_account("asha").unwrap().unwrap().balance, 15_680);
    }

    // --- Badges ---

    #[tokio::test]
    async fn test_unlock_badge_once() {
        let h = harness();
        let unlock = h.service.unlock_badge("asha", "5").await.unwrap();
        assert_eq!(unlock.badge.name, "Green Guardian");
        assert_eq!(unlock.unlocked_count, 1);

        let err = h.service.unlock_badge("asha", "5").await.unwrap_err();
        assert!(matches!(err, Error::Ledger(LedgerError::AlreadyUnlocked(_))));
        assert_eq!(balance(&h, "asha"), 15_680);

        assert!(matches!(
            h.service.unlock_badge("asha", "99").await.unwrap_err(),
            Error::Reward(RewardError::BadgeNotFound(_))
        ));

        let collection = h.service.list_badges("asha").unwrap();
        assert_eq!(collection.unlocked_count, 1);
        assert_eq!(collection.total_count, 8);
    }

    // --- Missions ---

    #[tokio::test]
    async fn test_complete_mission_is_idempotent_per_date() {
        let h = harness();
        let first = h
            .service
            .complete_mission("asha", "1", Some(day(3, 15)))
            .await
            .unwrap();
        assert_eq!(first.points_earned, 50);
        assert!(!first.already_completed);
        assert_eq!(first.balance, 15_730);

        let replay = h
            .service
            .complete_mission("asha", "1", Some(day(3, 15)))
            .await
            .unwrap();
        assert_eq!(replay.points_earned, 0);
        assert!(replay.already_completed);
        assert_eq!(replay.completion, first.completion);
        assert_eq!(balance(&h, "asha"), 15_730);

        h.clock.set(Utc.with_ymd_and_hms(2024, 3, 16, 4, 30, 0).unwrap());
        let next_day = h
            .service
            .complete_mission("asha", "1", Some(day(3, 16)))
            .await
            .unwrap();
        assert_eq!(next_day.points_earned, 50);
        assert_eq!(next_day.streak, 2);
    }

    #[tokio::test]
    async fn test_mission_dates_outside_window_are_rejected() {
        let h = harness();
        for date in [day(3, 16), day(12, 31), day(3, 7)] {
            let err = h
                .service
                .complete_mission("asha", "1", Some(date))
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                Error::Reward(RewardError::InvalidActivityDate { .. })
            ));
            assert_eq!(err.kind(), "INVALID_ACTIVITY_DATE");
        }
        assert!(h.store.find_account("asha").unwrap().is_none());

        // A week back is still accepted.
        let late = h
            .service
            .complete_mission("asha", "1", Some(day(3, 8)))
            .await
            .unwrap();
        assert_eq!(late.points_earned, 50);
    }

    #[tokio::test]
    async fn test_future_footprint_submission_is_rejected() {
        let h = harness();
        let input = FootprintInput {
            transport: TransportMode::Public,
            distance: dec!(10),
            electricity: dec!(2),
            food_choice: FoodChoice::Vegan,
        };
        let err = h
            .service
            .submit_footprint("asha", input, Some(day(3, 16)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Reward(RewardError::InvalidActivityDate { .. })
        ));
        assert!(h.store.find_account("asha").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mission_defaults_to_platform_today() {
        let h = harness();
        // 20:00 UTC on the 15th is already the 16th in IST.
        h.clock.set(Utc.with_ymd_and_hms(2024, 3, 15, 20, 0, 0).unwrap());
        let outcome = h.service.complete_mission("asha", "2", None).await.unwrap();
        assert_eq!(outcome.completion.date, day(3, 16));
        let board = h.service.mission_board("asha", None).unwrap();
        assert_eq!(board.completed_count, 1);
        assert_eq!(board.points_earned, 30);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_mission_replays_credit_once() {
        let h = harness();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = h.service.clone();
                tokio::spawn(async move {
                    service
                        .complete_mission("asha", "6", Some(day(3, 15)))
                        .await
                })
            })
            .collect();
        let mut earned = 0;
        for handle in handles {
            earned += handle.await.unwrap().unwrap().points_earned;
        }
        assert_eq!(earned, 60);
        assert_eq!(balance(&h, "asha"), 15_740);
    }

    #[tokio::test]
    async fn test_unknown_mission() {
        let h = harness();
        assert!(matches!(
            h.service.complete_mission("asha", "77", None).await.unwrap_err(),
            Error::Mission(MissionError::MissionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_reset_missions_keeps_points() {
        let h = harness();
        h.service
            .complete_mission("asha", "1", Some(day(3, 15)))
            .await
            .unwrap();
        h.service
            .complete_mission("ravi", "1", Some(day(3, 15)))
            .await
            .unwrap();
        assert_eq!(h.service.reset_missions(Some("asha")).await.unwrap(), 1);
        assert_eq!(balance(&h, "asha"), 15_730);
        assert_eq!(
            h.service
                .mission_board("ravi", Some(day(3, 15)))
                .unwrap()
                .completed_count,
            1
        );
        assert_eq!(h.service.reset_missions(None).await.unwrap(), 1);
        assert!(matches!(
            h.sink.events().last(),
            Some(DomainEvent::MissionsReset { user_id: None, removed: 1 })
        ));
    }

    // --- Challenges ---

    #[tokio::test]
    async fn test_join_challenge_counts_each_user_once() {
        let h = harness();
        let first = h.service.join_challenge("asha", "3").await.unwrap();
        let again = h.service.join_challenge("asha", "3").await.unwrap();
        assert_eq!(first.participants, 1);
        assert_eq!(again.participants, 1);
        assert!(!again.joined);
        let joined_events = h
            .sink
            .events()
            .iter()
            .filter(|e| matches!(e, DomainEvent::ChallengeJoined { .. }))
            .count();
        assert_eq!(joined_events, 1);
    }

    #[tokio::test]
    async fn test_join_inactive_challenge_fails() {
        let h = harness();
        let err = h.service.join_challenge("asha", "2").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Challenge(ChallengeError::ChallengeNotActive { .. })
        ));
        assert!(matches!(
            h.service.join_challenge("asha", "9").await.unwrap_err(),
            Error::Challenge(ChallengeError::ChallengeNotFound(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_contributions_clamp_at_target() {
        let h = harness();
        let (a, b) = tokio::join!(
            {
                let service = h.service.clone();
                tokio::spawn(async move { service.contribute_to_challenge("3", 600_000).await })
            },
            {
                let service = h.service.clone();
                tokio::spawn(async move { service.contribute_to_challenge("3", 600_000).await })
            }
        );
        a.unwrap().unwrap();
        b.unwrap().unwrap();
        let view = h
            .service
            .list_challenges(None)
            .unwrap()
            .into_iter()
            .find(|c| c.id == "3")
            .unwrap();
        assert_eq!(view.progress, 1_000_000);
    }

    #[tokio::test]
    async fn test_claim_challenge_reward_once() {
        let h = harness();
        h.service.join_challenge("asha", "3").await.unwrap();
        assert!(matches!(
            h.service.claim_challenge_reward("asha", "3").await.unwrap_err(),
            Error::Challenge(ChallengeError::ChallengeNotCompleted(_))
        ));
        h.service
            .contribute_to_challenge("3", 1_000_000)
            .await
            .unwrap();
        assert!(matches!(
            h.service.claim_challenge_reward("ravi", "3").await.unwrap_err(),
            Error::Challenge(ChallengeError::NotParticipant(_))
        ));

        let claim = h.service.claim_challenge_reward("asha", "3").await.unwrap();
        assert_eq!(claim.points_credited, 2_000);
        assert_eq!(claim.balance, 17_680);
        let repeat = h.service.claim_challenge_reward("asha", "3").await.unwrap();
        assert_eq!(repeat.points_credited, 0);
        assert_eq!(balance(&h, "asha"), 17_680);
    }

    // --- Eco-meter ---

    #[tokio::test]
    async fn test_footprint_credited_once_per_date() {
        let h = harness();
        let input = FootprintInput {
            transport: TransportMode::Bicycle,
            distance: dec!(10),
            electricity: dec!(1),
            food_choice: FoodChoice::Vegan,
        };
        let first = h
            .service
            .submit_footprint("asha", input.clone(), Some(day(3, 15)))
            .await
            .unwrap();
        assert_eq!(first.points_credited, 57);
        assert_eq!(first.balance, 15_737);

        let repeat = h
            .service
            .submit_footprint("asha", input.clone(), Some(day(3, 15)))
            .await
            .unwrap();
        assert_eq!(repeat.points_credited, 0);
        assert_eq!(repeat.assessment.eco_points_earned, 57);

        let account = h.store.find_account("asha").unwrap().unwrap();
        assert_eq!(account.balance, 15_737);
        assert_eq!(account.impact.carbon_reduced, dec!(2.88));
    }

    // --- Read models ---

    #[tokio::test]
    async fn test_perk_listing_flags() {
        let h = harness_with(catalog_with_perk("3", 16_000, Some(25)));
        h.service.redeem_perk("asha", "1").await.unwrap();
        let perks = h.service.list_perks("asha").unwrap();
        let by_id = |id: &str| perks.iter().find(|p| p.perk.id == id).unwrap();

        assert!(by_id("1").already_redeemed);
        assert!(!by_id("1").can_redeem);
        assert_eq!(by_id("1").remaining_stock, Some(99));
        assert!(by_id("2").can_redeem);
        assert!(by_id("3").available);
        assert!(!by_id("3").can_redeem);
        assert!(!by_id("4").available);
    }

    #[tokio::test]
    async fn test_successful_redemption_emits_event() {
        let h = harness();
        let receipt = h.service.redeem_perk("asha", "1").await.unwrap();
        match h.sink.events().last() {
            Some(DomainEvent::PerkRedeemed { code, balance, .. }) => {
                assert_eq!(code, &receipt.code);
                assert_eq!(*balance, 15_180);
            }
            other => panic!("Expected PerkRedeemed, got {:?}", other),
        }
    }
}
