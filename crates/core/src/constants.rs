/// EcoPoints credited to an account when it is first created.
pub const DEFAULT_STARTING_GRANT: i64 = 15_680;

/// Ledger reason recorded for the starting grant.
pub const STARTING_GRANT_REASON: &str = "starting_grant";

/// Experience points per level.
pub const XP_PER_LEVEL: i64 = 1_000;

/// Default bound on waiting for a per-user lock, in milliseconds.
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5_000;

/// Users listed under each state on the leaderboard.
pub const DEFAULT_LEADERBOARD_TOP_USERS: usize = 3;

/// Upper bound on each field of a single recorded impact (kg CO₂, litres
/// of water, trees).
pub const MAX_IMPACT_PER_RECORD: u64 = 1_000_000_000;

/// How many days back a mission completion or eco-meter submission may be
/// dated. Future dates are never accepted.
pub const MAX_BACKDATED_DAYS: i64 = 7;

/// Prefix of generated redemption codes.
pub const REDEMPTION_CODE_PREFIX: &str = "ECO";

/// Ledger reason prefixes. The full reason embeds the natural key of the
/// operation so that repeated requests can be recognized.
pub const MISSION_REASON_PREFIX: &str = "mission";
pub const PERK_REASON_PREFIX: &str = "perk";
pub const CHALLENGE_REASON_PREFIX: &str = "challenge";
pub const ECO_METER_REASON_PREFIX: &str = "eco_meter";
