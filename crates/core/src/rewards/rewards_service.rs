use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use log::{debug, info};

use super::rewards_errors::RewardError;
use super::rewards_model::{
    redemption_code, AccountSummary, BadgeCollection, BadgeListing, BadgeUnlock, BalanceUpdate,
    ChallengeClaim, PerkListing, RedemptionReceipt,
};
use super::rewards_traits::RewardServiceTrait;
use crate::catalog::Catalog;
use crate::challenges::{ChallengeRepositoryTrait, ChallengeTracker, ChallengeView, JoinOutcome};
use crate::config::RewardsConfig;
use crate::constants::{
    CHALLENGE_REASON_PREFIX, ECO_METER_REASON_PREFIX, MAX_BACKDATED_DAYS, PERK_REASON_PREFIX,
};
use crate::eco_meter::{assess_footprint, FootprintInput, FootprintSubmission};
use crate::errors::{Error, Result, ValidationError};
use crate::events::{DomainEvent, DomainEventSink};
use crate::inventory::{
    InventoryError, InventoryService, InventoryServiceTrait, StockRepositoryTrait,
};
use crate::ledger::{
    AccountChangeset, ImpactTotals, LedgerEntry, LedgerError, LedgerRepositoryTrait,
    ProfileUpdate, Redemption,
};
use crate::missions::{MissionBoard, MissionOutcome, MissionTracker};
use crate::utils::{platform_date_from_utc, Clock, KeyGuard, KeyedMutex};

/// The RewardEngine.
///
/// Lock order is fixed: the per-user lock is taken first, and perk stock is
/// only touched through the store's atomic compare-and-decrement while that
/// lock is held. No store call suspends, so no store state is held across an
/// await point.
pub struct RewardService {
    ledger: Arc<dyn LedgerRepositoryTrait>,
    inventory: Arc<dyn InventoryServiceTrait>,
    missions: MissionTracker,
    challenges: ChallengeTracker,
    catalog: Arc<Catalog>,
    event_sink: Arc<dyn DomainEventSink>,
    clock: Arc<dyn Clock>,
    user_locks: KeyedMutex,
    config: RewardsConfig,
}

fn require_user_id(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            "userId".to_string(),
        )));
    }
    Ok(())
}

impl RewardService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ledger: Arc<dyn LedgerRepositoryTrait>,
        stock: Arc<dyn StockRepositoryTrait>,
        challenge_store: Arc<dyn ChallengeRepositoryTrait>,
        catalog: Arc<Catalog>,
        event_sink: Arc<dyn DomainEventSink>,
        clock: Arc<dyn Clock>,
        config: RewardsConfig,
    ) -> Self {
        Self {
            inventory: Arc::new(InventoryService::new(stock, catalog.clone())),
            missions: MissionTracker::new(ledger.clone(), catalog.clone()),
            challenges: ChallengeTracker::new(
                challenge_store,
                catalog.clone(),
                clock.clone(),
                config.timezone,
            ),
            ledger,
            catalog,
            event_sink,
            clock,
            user_locks: KeyedMutex::new(),
            config,
        }
    }

    /// Seeds perk stock and challenge counters that do not exist yet.
    pub fn initialize(&self) -> Result<()> {
        let perks = self.inventory.seed_from_catalog()?;
        let challenges = self.challenges.seed_from_catalog()?;
        info!(
            "Rewards engine ready: seeded {} perks and {} challenges",
            perks, challenges
        );
        Ok(())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &RewardsConfig {
        &self.config
    }

    /// Today in the configured timezone.
    pub fn today(&self) -> NaiveDate {
        platform_date_from_utc(self.clock.now(), self.config.timezone)
    }

    /// Resolves the date an activity is credited to. Defaults to today and
    /// rejects future dates and dates older than [`MAX_BACKDATED_DAYS`].
    pub fn activity_date(&self, date: Option<NaiveDate>) -> Result<NaiveDate> {
        let today = self.today();
        let Some(date) = date else {
            return Ok(today);
        };
        let earliest = today - Duration::days(MAX_BACKDATED_DAYS);
        if date > today || date < earliest {
            return Err(RewardError::InvalidActivityDate { date, today }.into());
        }
        Ok(date)
    }

    async fn lock_user(&self, user_id: &str) -> Result<KeyGuard> {
        require_user_id(user_id)?;
        self.user_locks.lock(user_id, self.config.lock_timeout).await
    }
}

#[async_trait]
impl RewardServiceTrait for RewardService {
    async fn get_account(&self, user_id: &str) -> Result<AccountSummary> {
        require_user_id(user_id)?;
        Ok(self.ledger.get_or_create_account(user_id)?.into())
    }

    async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<AccountSummary> {
        let state_code = match update.state_code.as_deref() {
            Some(code) => Some(
                self.catalog
                    .state(code)
                    .map(|s| s.code.clone())
                    .ok_or_else(|| ValidationError::UnknownState(code.to_string()))?,
            ),
            None => None,
        };
        let display_name = match update.display_name.as_deref().map(str::trim) {
            Some("") => {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "displayName cannot be blank".to_string(),
                )))
            }
            other => other.map(str::to_string),
        };

        let _guard = self.lock_user(user_id).await?;
        let outcome = self.ledger.commit(AccountChangeset::new(user_id).profile(ProfileUpdate {
            display_name,
            state_code,
        }))?;
        Ok(outcome.account.into())
    }

    async fn award_points(&self, user_id: &str, amount: i64, reason: &str) -> Result<BalanceUpdate> {
        if amount < 0 {
            return Err(LedgerError::InvalidAmount(amount).into());
        }
        if reason.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "reason".to_string(),
            )));
        }

        let _guard = self.lock_user(user_id).await?;
        let outcome = self
            .ledger
            .commit(AccountChangeset::new(user_id).credit(amount, reason))?;
        debug!("Awarded {} points to {} for {}", amount, user_id, reason);
        if amount > 0 {
            self.event_sink.emit(DomainEvent::points_awarded(
                user_id,
                amount,
                reason,
                outcome.account.balance,
            ));
        }
        Ok(BalanceUpdate::from(&outcome.account))
    }

    async fn redeem_perk(&self, user_id: &str, perk_id: &str) -> Result<RedemptionReceipt> {
        let perk = self
            .catalog
            .perk(perk_id)
            .ok_or_else(|| InventoryError::PerkNotFound(perk_id.to_string()))?;

        let _guard = self.lock_user(user_id).await?;

        if !perk.enabled {
            return Err(InventoryError::PerkUnavailable(perk.id.clone()).into());
        }
        if self.inventory.stock(&perk.id)?.is_exhausted() {
            return Err(InventoryError::OutOfStock(perk.id.clone()).into());
        }
        let account = self.ledger.get_or_create_account(user_id)?;
        if account.redeemed_perks.contains(&perk.id) {
            return Err(LedgerError::AlreadyRedeemed(perk.id.clone()).into());
        }
        if account.balance < perk.points_cost {
            return Err(LedgerError::InsufficientFunds {
                required: perk.points_cost,
                available: account.balance,
            }
            .into());
        }

        // Another user may have taken the last unit since the check above.
        let reservation = self.inventory.reserve_unit(&perk.id)?;

        let sequence = self.ledger.next_redemption_sequence()?;
        let redemption = Redemption {
            code: redemption_code(user_id, &perk.id, sequence),
            user_id: user_id.to_string(),
            perk_id: perk.id.clone(),
            cost: perk.points_cost,
            sequence,
            redeemed_at: self.clock.now(),
        };
        let reason = format!("{}:{}", PERK_REASON_PREFIX, perk.id);
        let changeset = AccountChangeset::new(user_id)
            .debit(perk.points_cost, &reason)
            .redemption(redemption.clone());

        let outcome = match self.ledger.commit(changeset) {
            Ok(outcome) => outcome,
            Err(e) => {
                if let Err(release_err) = reservation.release() {
                    log::error!(
                        "Failed to release perk {} after rejected redemption: {}",
                        perk.id,
                        release_err
                    );
                }
                return Err(e);
            }
        };
        let remaining = reservation.commit();

        info!(
            "User {} redeemed perk {} for {} points (code {})",
            user_id, perk.id, perk.points_cost, redemption.code
        );
        self.event_sink.emit(DomainEvent::perk_redeemed(
            user_id,
            &perk.id,
            &redemption.code,
            perk.points_cost,
            outcome.account.balance,
        ));

        Ok(RedemptionReceipt {
            code: redemption.code,
            perk_id: perk.id.clone(),
            cost: perk.points_cost,
            balance: outcome.account.balance,
            remaining_stock: remaining.remaining(),
            redeemed_at: redemption.redeemed_at,
        })
    }

    async fn unlock_badge(&self, user_id: &str, badge_id: &str) -> Result<BadgeUnlock> {
        let badge = self
            .catalog
            .badge(badge_id)
            .ok_or_else(|| RewardError::BadgeNotFound(badge_id.to_string()))?;

        let _guard = self.lock_user(user_id).await?;
        let outcome = self
            .ledger
            .commit(AccountChangeset::new(user_id).grant_badge(&badge.id))?;
        debug!("User {} unlocked badge {}", user_id, badge.id);
        self.event_sink
            .emit(DomainEvent::badge_unlocked(user_id, &badge.id));
        Ok(BadgeUnlock {
            badge: badge.clone(),
            unlocked_count: outcome.account.badges.len(),
        })
    }

    async fn complete_mission(
        &self,
        user_id: &str,
        mission_id: &str,
        date: Option<NaiveDate>,
    ) -> Result<MissionOutcome> {
        let mission = self.missions.mission(mission_id)?.clone();
        let date = self.activity_date(date)?;

        let _guard = self.lock_user(user_id).await?;

        if let Some(existing) = self.missions.find_completion(user_id, &mission.id, date)? {
            let account = self.ledger.get_or_create_account(user_id)?;
            debug!(
                "Mission {} already completed by {} on {}",
                mission.id, user_id, date
            );
            return Ok(MissionOutcome {
                completion: existing,
                points_earned: 0,
                already_completed: true,
                balance: account.balance,
                streak: account.streak,
            });
        }

        let changeset =
            self.missions
                .completion_changeset(user_id, &mission, date, self.clock.now());
        let outcome = match self.ledger.commit(changeset) {
            Ok(outcome) => outcome,
            // Completed through another process sharing the store.
            Err(Error::Ledger(LedgerError::MissionAlreadyCompleted { .. })) => {
                let account = self.ledger.get_or_create_account(user_id)?;
                let existing = self
                    .missions
                    .find_completion(user_id, &mission.id, date)?
                    .ok_or_else(|| {
                        Error::Unexpected(format!(
                            "Completion of mission {} on {} vanished",
                            mission.id, date
                        ))
                    })?;
                return Ok(MissionOutcome {
                    completion: existing,
                    points_earned: 0,
                    already_completed: true,
                    balance: account.balance,
                    streak: account.streak,
                });
            }
            Err(e) => return Err(e),
        };

        let completion = self
            .missions
            .find_completion(user_id, &mission.id, date)?
            .ok_or_else(|| {
                Error::Unexpected(format!(
                    "Completion of mission {} on {} was not recorded",
                    mission.id, date
                ))
            })?;

        self.event_sink.emit(DomainEvent::mission_completed(
            user_id,
            &mission.id,
            date,
            mission.points,
        ));
        Ok(MissionOutcome {
            completion,
            points_earned: mission.points,
            already_completed: false,
            balance: outcome.account.balance,
            streak: outcome.account.streak,
        })
    }

    async fn reset_missions(&self, user_id: Option<&str>) -> Result<usize> {
        let removed = match user_id {
            Some(user_id) => {
                let _guard = self.lock_user(user_id).await?;
                self.missions.reset(Some(user_id))?
            }
            None => self.missions.reset(None)?,
        };
        self.event_sink
            .emit(DomainEvent::missions_reset(user_id, removed));
        Ok(removed)
    }

    async fn join_challenge(&self, user_id: &str, challenge_id: &str) -> Result<JoinOutcome> {
        require_user_id(user_id)?;
        let outcome = self.challenges.join(user_id, challenge_id)?;
        if outcome.joined {
            self.event_sink.emit(DomainEvent::challenge_joined(
                user_id,
                challenge_id,
                outcome.participants,
            ));
        }
        Ok(outcome)
    }

    async fn contribute_to_challenge(
        &self,
        challenge_id: &str,
        amount: i64,
    ) -> Result<ChallengeView> {
        let state = self.challenges.contribute(challenge_id, amount)?;
        let target = self.challenges.challenge(challenge_id)?.target;
        self.event_sink.emit(DomainEvent::challenge_progressed(
            challenge_id,
            state.progress,
            target,
        ));
        let mut view = self.challenges.view(challenge_id, None)?;
        // Report what this call observed, not a later contribution.
        view.progress = state.progress;
        Ok(view)
    }

    async fn claim_challenge_reward(
        &self,
        user_id: &str,
        challenge_id: &str,
    ) -> Result<ChallengeClaim> {
        require_user_id(user_id)?;
        let challenge = self.challenges.claimable(user_id, challenge_id)?;

        let _guard = self.lock_user(user_id).await?;
        let account = self.ledger.get_or_create_account(user_id)?;
        if account.claimed_challenges.contains(&challenge.id) {
            return Ok(ChallengeClaim {
                challenge_id: challenge.id.clone(),
                points_credited: 0,
                balance: account.balance,
            });
        }

        let reason = format!("{}:{}", CHALLENGE_REASON_PREFIX, challenge.id);
        let outcome = self.ledger.commit(
            AccountChangeset::new(user_id)
                .credit(challenge.reward, &reason)
                .challenge_claim(&challenge.id),
        )?;
        self.event_sink.emit(DomainEvent::challenge_reward_claimed(
            user_id,
            &challenge.id,
            challenge.reward,
        ));
        Ok(ChallengeClaim {
            challenge_id: challenge.id.clone(),
            points_credited: challenge.reward,
            balance: outcome.account.balance,
        })
    }

    async fn record_impact(&self, user_id: &str, impact: ImpactTotals) -> Result<AccountSummary> {
        impact.validate()?;
        let _guard = self.lock_user(user_id).await?;
        let outcome = self
            .ledger
            .commit(AccountChangeset::new(user_id).impact(impact))?;
        Ok(outcome.account.into())
    }

    async fn submit_footprint(
        &self,
        user_id: &str,
        input: FootprintInput,
        date: Option<NaiveDate>,
    ) -> Result<FootprintSubmission> {
        let assessment = assess_footprint(&input)?;
        let date = self.activity_date(date)?;
        let reason = format!("{}:{}", ECO_METER_REASON_PREFIX, date);

        let _guard = self.lock_user(user_id).await?;
        if self.ledger.has_ledger_reason(user_id, &reason)? {
            let account = self.ledger.get_or_create_account(user_id)?;
            return Ok(FootprintSubmission {
                assessment,
                points_credited: 0,
                balance: account.balance,
            });
        }

        let points = assessment.eco_points_earned;
        let outcome = self.ledger.commit(
            AccountChangeset::new(user_id)
                .credit(points, &reason)
                .once()
                .impact(ImpactTotals {
                    carbon_reduced: assessment.carbon_reduced,
                    ..Default::default()
                }),
        )?;
        if points > 0 {
            self.event_sink.emit(DomainEvent::points_awarded(
                user_id,
                points,
                &reason,
                outcome.account.balance,
            ));
        }
        Ok(FootprintSubmission {
            assessment,
            points_credited: points,
            balance: outcome.account.balance,
        })
    }

    fn list_perks(&self, user_id: &str) -> Result<Vec<PerkListing>> {
        require_user_id(user_id)?;
        let account = self.ledger.get_or_create_account(user_id)?;
        self.catalog
            .perks
            .iter()
            .map(|perk| {
                let stock = self.inventory.stock(&perk.id)?;
                let available = perk.enabled && !stock.is_exhausted();
                let already_redeemed = account.redeemed_perks.contains(&perk.id);
                Ok(PerkListing {
                    perk: perk.clone(),
                    remaining_stock: stock.remaining(),
                    available,
                    already_redeemed,
                    can_redeem: available
                        && !already_redeemed
                        && account.balance >= perk.points_cost,
                })
            })
            .collect()
    }

    fn list_badges(&self, user_id: &str) -> Result<BadgeCollection> {
        require_user_id(user_id)?;
        let account = self.ledger.get_or_create_account(user_id)?;
        let badges: Vec<BadgeListing> = self
            .catalog
            .badges
            .iter()
            .map(|badge| BadgeListing {
                badge: badge.clone(),
                unlocked: account.badges.contains(&badge.id),
            })
            .collect();
        Ok(BadgeCollection {
            unlocked_count: badges.iter().filter(|b| b.unlocked).count(),
            total_count: badges.len(),
            badges,
        })
    }

    fn mission_board(&self, user_id: &str, date: Option<NaiveDate>) -> Result<MissionBoard> {
        require_user_id(user_id)?;
        self.missions
            .board(user_id, date.unwrap_or_else(|| self.today()))
    }

    fn list_challenges(&self, user_id: Option<&str>) -> Result<Vec<ChallengeView>> {
        self.challenges.list(user_id)
    }

    fn ledger_history(&self, user_id: &str) -> Result<Vec<LedgerEntry>> {
        require_user_id(user_id)?;
        self.ledger.ledger_entries(user_id)
    }

    fn redemptions(&self, user_id: &str) -> Result<Vec<Redemption>> {
        require_user_id(user_id)?;
        self.ledger.redemptions(user_id)
    }
}
