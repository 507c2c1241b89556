use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::Context;
use ecopoints_core::RewardsConfig;

/// Database path that selects the process-local store instead of SQLite.
pub const IN_MEMORY_DB: &str = ":memory:";

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub starting_grant: i64,
    pub lock_timeout: Duration,
    pub catalog_path: Option<PathBuf>,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = env_or(key, default);
    raw.trim()
        .parse()
        .with_context(|| format!("Invalid {key}: '{raw}'"))
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = RewardsConfig::default();

        let listen_addr = parse_env("ECO_LISTEN_ADDR", "0.0.0.0:8080")?;
        let db_path = env_or("ECO_DB_PATH", "./db/ecopoints.db");
        let cors_allow = env_or("ECO_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = parse_env("ECO_REQUEST_TIMEOUT_MS", "30000")?;
        let starting_grant: i64 =
            parse_env("ECO_STARTING_GRANT", &defaults.starting_grant.to_string())?;
        if starting_grant < 0 {
            anyhow::bail!("Invalid ECO_STARTING_GRANT: must not be negative");
        }
        let lock_timeout_ms: u64 = parse_env(
            "ECO_LOCK_TIMEOUT_MS",
            &defaults.lock_timeout.as_millis().to_string(),
        )?;
        let catalog_path = std::env::var("ECO_CATALOG_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            starting_grant,
            lock_timeout: Duration::from_millis(lock_timeout_ms),
            catalog_path,
        })
    }

    pub fn rewards_config(&self) -> RewardsConfig {
        RewardsConfig {
            starting_grant: self.starting_grant,
            lock_timeout: self.lock_timeout,
            ..RewardsConfig::default()
        }
    }

    pub fn uses_in_memory_store(&self) -> bool {
        self.db_path == IN_MEMORY_DB
    }
}
