//! Process-local store backing the ledger, inventory and challenge traits.
//!
//! All state of one account lives in a single map entry, so a commit is
//! atomic for that account and never observed half-applied.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;

use super::ledger_errors::LedgerError;
use super::ledger_model::{
    AccountChangeset, CommitOutcome, LedgerEntry, MissionCompletion, Redemption, UserAccount,
};
use super::ledger_traits::LedgerRepositoryTrait;
use crate::challenges::{ChallengeError, ChallengeRepositoryTrait, ChallengeState, JoinOutcome};
use crate::errors::Result;
use crate::inventory::{InventoryError, StockLevel, StockRepositoryTrait};
use crate::utils::{Clock, SystemClock};

struct AccountRecord {
    account: UserAccount,
    entries: Vec<LedgerEntry>,
    redemptions: Vec<Redemption>,
    completions: BTreeMap<(String, NaiveDate), MissionCompletion>,
}

#[derive(Default)]
struct ChallengeRecord {
    progress: u64,
    participants: BTreeSet<String>,
}

impl ChallengeRecord {
    fn state(&self) -> ChallengeState {
        ChallengeState {
            progress: self.progress,
            participants: self.participants.len() as u64,
        }
    }
}

pub struct InMemoryLedgerStore {
    starting_grant: i64,
    clock: Arc<dyn Clock>,
    accounts: DashMap<String, AccountRecord>,
    entry_seq: AtomicU64,
    redemption_seq: AtomicU64,
    stock: DashMap<String, StockLevel>,
    challenges: DashMap<String, ChallengeRecord>,
}

impl InMemoryLedgerStore {
    pub fn new(starting_grant: i64) -> Self {
        Self::with_clock(starting_grant, Arc::new(SystemClock))
    }

    pub fn with_clock(starting_grant: i64, clock: Arc<dyn Clock>) -> Self {
        Self {
            starting_grant,
            clock,
            accounts: DashMap::new(),
            entry_seq: AtomicU64::new(0),
            redemption_seq: AtomicU64::new(0),
            stock: DashMap::new(),
            challenges: DashMap::new(),
        }
    }

    fn next_entry_sequence(&self) -> u64 {
        self.entry_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn new_record(&self, user_id: &str, now: DateTime<Utc>) -> AccountRecord {
        let account = UserAccount::new(user_id, self.starting_grant, now);
        let entries = account
            .starting_grant_entry(self.next_entry_sequence())
            .into_iter()
            .collect();
        log::debug!("Created account {} with {} points", user_id, account.balance);
        AccountRecord {
            account,
            entries,
            redemptions: Vec::new(),
            completions: BTreeMap::new(),
        }
    }
}

impl LedgerRepositoryTrait for InMemoryLedgerStore {
    fn find_account(&self, user_id: &str) -> Result<Option<UserAccount>> {
        Ok(self.accounts.get(user_id).map(|r| r.account.clone()))
    }

    fn get_or_create_account(&self, user_id: &str) -> Result<UserAccount> {
        let now = self.clock.now();
        let record = self
            .accounts
            .entry(user_id.to_string())
            .or_insert_with(|| self.new_record(user_id, now));
        Ok(record.account.clone())
    }

    fn list_accounts(&self) -> Result<Vec<UserAccount>> {
        let mut accounts: Vec<UserAccount> =
            self.accounts.iter().map(|r| r.account.clone()).collect();
        accounts.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(accounts)
    }

    fn commit(&self, changeset: AccountChangeset) -> Result<CommitOutcome> {
        let now = self.clock.now();
        let mut guard = self
            .accounts
            .entry(changeset.user_id.clone())
            .or_insert_with(|| self.new_record(&changeset.user_id, now));
        let record = guard.value_mut();

        if changeset.unique_reason && record.entries.iter().any(|e| e.reason == changeset.reason)
        {
            return Err(LedgerError::DuplicateCredit(changeset.reason.clone()).into());
        }
        if let Some(completion) = &changeset.mission_completion {
            if record
                .completions
                .contains_key(&(completion.mission_id.clone(), completion.date))
            {
                return Err(LedgerError::MissionAlreadyCompleted {
                    mission_id: completion.mission_id.clone(),
                    date: completion.date,
                }
                .into());
            }
        }

        let mut next = record.account.clone();
        next.apply(&changeset, now)?;

        let entry = (changeset.point_delta != 0 || changeset.unique_reason).then(|| LedgerEntry {
            sequence: self.next_entry_sequence(),
            user_id: next.id.clone(),
            delta: changeset.point_delta,
            balance_after: next.balance,
            reason: changeset.reason.clone(),
            created_at: now,
        });

        record.account = next;
        if let Some(entry) = &entry {
            record.entries.push(entry.clone());
        }
        if let Some(redemption) = changeset.redemption {
            record.redemptions.push(redemption);
        }
        if let Some(completion) = changeset.mission_completion {
            record
                .completions
                .insert((completion.mission_id.clone(), completion.date), completion);
        }

        Ok(CommitOutcome {
            account: record.account.clone(),
            entry,
        })
    }

    fn ledger_entries(&self, user_id: &str) -> Result<Vec<LedgerEntry>> {
        Ok(self
            .accounts
            .get(user_id)
            .map(|r| r.entries.clone())
            .unwrap_or_default())
    }

    fn has_ledger_reason(&self, user_id: &str, reason: &str) -> Result<bool> {
        Ok(self
            .accounts
            .get(user_id)
            .is_some_and(|r| r.entries.iter().any(|e| e.reason == reason)))
    }

    fn redemptions(&self, user_id: &str) -> Result<Vec<Redemption>> {
        Ok(self
            .accounts
            .get(user_id)
            .map(|r| r.redemptions.clone())
            .unwrap_or_default())
    }

    fn next_redemption_sequence(&self) -> Result<u64> {
        Ok(self.redemption_seq.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn find_mission_completion(
        &self,
        user_id: &str,
        mission_id: &str,
        date: NaiveDate,
    ) -> Result<Option<MissionCompletion>> {
        Ok(self.accounts.get(user_id).and_then(|r| {
            r.completions
                .get(&(mission_id.to_string(), date))
                .cloned()
        }))
    }

    fn mission_completions_on(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<MissionCompletion>> {
        Ok(self
            .accounts
            .get(user_id)
            .map(|r| {
                r.completions
                    .values()
                    .filter(|c| c.date == date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn clear_mission_completions(&self, user_id: Option<&str>) -> Result<usize> {
        let mut removed = 0;
        match user_id {
            Some(user_id) => {
                if let Some(mut record) = self.accounts.get_mut(user_id) {
                    removed = record.completions.len();
                    record.completions.clear();
                }
            }
            None => {
                for mut record in self.accounts.iter_mut() {
                    removed += record.completions.len();
                    record.completions.clear();
                }
            }
        }
        Ok(removed)
    }
}

impl StockRepositoryTrait for InMemoryLedgerStore {
    fn get_stock(&self, perk_id: &str) -> Result<Option<StockLevel>> {
        Ok(self.stock.get(perk_id).map(|s| *s))
    }

    fn seed_stock(&self, perk_id: &str, level: StockLevel) -> Result<bool> {
        let mut inserted = false;
        self.stock.entry(perk_id.to_string()).or_insert_with(|| {
            inserted = true;
            level
        });
        Ok(inserted)
    }

    fn try_take_unit(&self, perk_id: &str) -> Result<StockLevel> {
        let mut level = self
            .stock
            .get_mut(perk_id)
            .ok_or_else(|| InventoryError::PerkNotFound(perk_id.to_string()))?;
        match *level {
            StockLevel::Unlimited => Ok(StockLevel::Unlimited),
            StockLevel::Limited(0) => Err(InventoryError::OutOfStock(perk_id.to_string()).into()),
            StockLevel::Limited(units) => {
                *level = StockLevel::Limited(units - 1);
                Ok(*level)
            }
        }
    }

    fn return_unit(&self, perk_id: &str) -> Result<StockLevel> {
        let mut level = self
            .stock
            .get_mut(perk_id)
            .ok_or_else(|| InventoryError::PerkNotFound(perk_id.to_string()))?;
        if let StockLevel::Limited(units) = *level {
            *level = StockLevel::Limited(units.saturating_add(1));
        }
        Ok(*level)
    }
}

impl ChallengeRepositoryTrait for InMemoryLedgerStore {
    fn seed_challenge(&self, challenge_id: &str, initial_progress: u64) -> Result<bool> {
        let mut inserted = false;
        self.challenges
            .entry(challenge_id.to_string())
            .or_insert_with(|| {
                inserted = true;
                ChallengeRecord {
                    progress: initial_progress,
                    participants: BTreeSet::new(),
                }
            });
        Ok(inserted)
    }

    fn get_challenge_state(&self, challenge_id: &str) -> Result<Option<ChallengeState>> {
        Ok(self.challenges.get(challenge_id).map(|c| c.state()))
    }

    fn add_participant(&self, challenge_id: &str, user_id: &str) -> Result<JoinOutcome> {
        let mut record = self
            .challenges
            .get_mut(challenge_id)
            .ok_or_else(|| ChallengeError::ChallengeNotFound(challenge_id.to_string()))?;
        let joined = record.participants.insert(user_id.to_string());
        Ok(JoinOutcome {
            joined,
            participants: record.participants.len() as u64,
        })
    }

    fn is_participant(&self, challenge_id: &str, user_id: &str) -> Result<bool> {
        Ok(self
            .challenges
            .get(challenge_id)
            .is_some_and(|c| c.participants.contains(user_id)))
    }

    fn add_progress(&self, challenge_id: &str, amount: u64, cap: u64) -> Result<ChallengeState> {
        let mut record = self
            .challenges
            .get_mut(challenge_id)
            .ok_or_else(|| ChallengeError::ChallengeNotFound(challenge_id.to_string()))?;
        record.progress = record.progress.saturating_add(amount).min(cap);
        Ok(record.state())
    }
}
