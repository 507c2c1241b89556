//! Engine configuration.

use std::time::Duration;

use chrono_tz::Tz;

use crate::constants::{
    DEFAULT_LEADERBOARD_TOP_USERS, DEFAULT_LOCK_TIMEOUT_MS, DEFAULT_STARTING_GRANT,
};
use crate::utils::PLATFORM_TZ;

#[derive(Debug, Clone, PartialEq)]
pub struct RewardsConfig {
    /// Balance of a newly created account.
    pub starting_grant: i64,
    /// Upper bound on waiting for a per-user lock before failing with
    /// `Error::LockTimeout`.
    pub lock_timeout: Duration,
    pub leaderboard_top_users: usize,
    /// Timezone used to turn instants into mission dates and challenge windows.
    pub timezone: Tz,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            starting_grant: DEFAULT_STARTING_GRANT,
            lock_timeout: Duration::from_millis(DEFAULT_LOCK_TIMEOUT_MS),
            leaderboard_top_users: DEFAULT_LEADERBOARD_TOP_USERS,
            timezone: PLATFORM_TZ,
        }
    }
}
