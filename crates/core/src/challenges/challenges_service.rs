use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use super::challenges_errors::ChallengeError;
use super::challenges_model::{ChallengeState, ChallengeStatus, ChallengeView, JoinOutcome};
use super::challenges_traits::ChallengeRepositoryTrait;
use crate::catalog::{Catalog, Challenge};
use crate::errors::{Error, Result, ValidationError};
use crate::utils::{day_range_window, Clock};

/// Tracks challenge windows, participants and global progress.
pub struct ChallengeTracker {
    store: Arc<dyn ChallengeRepositoryTrait>,
    catalog: Arc<Catalog>,
    clock: Arc<dyn Clock>,
    tz: Tz,
}

impl ChallengeTracker {
    pub fn new(
        store: Arc<dyn ChallengeRepositoryTrait>,
        catalog: Arc<Catalog>,
        clock: Arc<dyn Clock>,
        tz: Tz,
    ) -> Self {
        Self {
            store,
            catalog,
            clock,
            tz,
        }
    }

    /// Seeds counters for every catalog challenge that has none yet.
    pub fn seed_from_catalog(&self) -> Result<usize> {
        let mut seeded = 0;
        for challenge in &self.catalog.challenges {
            if self
                .store
                .seed_challenge(&challenge.id, challenge.initial_progress.min(challenge.target))?
            {
                seeded += 1;
            }
        }
        Ok(seeded)
    }

    pub fn challenge(&self, challenge_id: &str) -> Result<&Challenge> {
        self.catalog
            .challenge(challenge_id)
            .ok_or_else(|| ChallengeError::ChallengeNotFound(challenge_id.to_string()).into())
    }

    /// `[start of start_date, start of end_date + 1 day)` in the platform timezone.
    pub fn window(&self, challenge: &Challenge) -> (DateTime<Utc>, DateTime<Utc>) {
        day_range_window(challenge.start_date, challenge.end_date, self.tz)
    }

    /// Read-only. A challenge missing from the store reports its catalog
    /// starting point until [`Self::seed_from_catalog`] has run.
    pub fn state(&self, challenge: &Challenge) -> Result<ChallengeState> {
        Ok(self
            .store
            .get_challenge_state(&challenge.id)?
            .unwrap_or(ChallengeState {
                progress: challenge.initial_progress.min(challenge.target),
                participants: 0,
            }))
    }

    /// Upcoming before the window opens, completed once the window has closed
    /// or the target is reached, active otherwise.
    pub fn status_at(
        &self,
        challenge: &Challenge,
        state: &ChallengeState,
        now: DateTime<Utc>,
    ) -> ChallengeStatus {
        let (starts_at, ends_at) = self.window(challenge);
        if now < starts_at {
            ChallengeStatus::Upcoming
        } else if now >= ends_at || state.progress >= challenge.target {
            ChallengeStatus::Completed
        } else {
            ChallengeStatus::Active
        }
    }

    pub fn view(&self, challenge_id: &str, user_id: Option<&str>) -> Result<ChallengeView> {
        let challenge = self.challenge(challenge_id)?;
        let state = self.state(challenge)?;
        let status = self.status_at(challenge, &state, self.clock.now());
        let mut view = ChallengeView::new(challenge, self.window(challenge), state, status);
        if let Some(user_id) = user_id {
            view.joined = Some(self.store.is_participant(&challenge.id, user_id)?);
        }
        Ok(view)
    }

    pub fn list(&self, user_id: Option<&str>) -> Result<Vec<ChallengeView>> {
        self.catalog
            .challenges
            .iter()
            .map(|c| self.view(&c.id, user_id))
            .collect()
    }

    fn ensure_active(&self, challenge: &Challenge) -> Result<ChallengeState> {
        let state = self.state(challenge)?;
        match self.status_at(challenge, &state, self.clock.now()) {
            ChallengeStatus::Active => Ok(state),
            status => Err(ChallengeError::ChallengeNotActive {
                id: challenge.id.clone(),
                status,
            }
            .into()),
        }
    }

    /// Adds the user to an active challenge. Idempotent.
    pub fn join(&self, user_id: &str, challenge_id: &str) -> Result<JoinOutcome> {
        let challenge = self.challenge(challenge_id)?;
        self.ensure_active(challenge)?;
        let outcome = self.store.add_participant(&challenge.id, user_id)?;
        log::debug!(
            "User {} join challenge {}: joined={} participants={}",
            user_id,
            challenge.id,
            outcome.joined,
            outcome.participants
        );
        Ok(outcome)
    }

    /// Increases global progress of an active challenge, clamped at its target.
    pub fn contribute(&self, challenge_id: &str, amount: i64) -> Result<ChallengeState> {
        if amount < 0 {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Contribution must not be negative, got {}",
                amount
            ))));
        }
        let challenge = self.challenge(challenge_id)?;
        self.ensure_active(challenge)?;
        let state = self
            .store
            .add_progress(&challenge.id, amount as u64, challenge.target)?;
        log::debug!(
            "Challenge {} progress {}/{}",
            challenge.id,
            state.progress,
            challenge.target
        );
        Ok(state)
    }

    /// Returns the challenge if `user_id` may claim its reward.
    pub fn claimable(&self, user_id: &str, challenge_id: &str) -> Result<&Challenge> {
        let challenge = self.challenge(challenge_id)?;
        if !self.store.is_participant(&challenge.id, user_id)? {
            return Err(ChallengeError::NotParticipant(challenge.id.clone()).into());
        }
        if self.state(challenge)?.progress < challenge.target {
            return Err(ChallengeError::ChallengeNotCompleted(challenge.id.clone()).into());
        }
        Ok(challenge)
    }
}
