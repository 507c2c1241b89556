use std::sync::Arc;

use anyhow::Context;
use ecopoints_core::{
    challenges::ChallengeRepositoryTrait,
    events::DomainEventSink,
    inventory::StockRepositoryTrait,
    leaderboard::LeaderboardService,
    ledger::{InMemoryLedgerStore, LedgerRepositoryTrait},
    rewards::{RewardService, RewardServiceTrait},
    utils::SystemClock,
    Catalog,
};
use ecopoints_storage_sqlite::{db, ChallengeRepository, LedgerRepository, StockRepository};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{config::Config, domain_events::WebDomainEventSink, events::EventBus};

pub struct AppState {
    pub reward_service: Arc<dyn RewardServiceTrait>,
    pub leaderboard_service: Arc<LeaderboardService>,
    pub catalog: Arc<Catalog>,
    pub event_bus: EventBus,
}

pub fn init_tracing() {
    let log_format = std::env::var("ECO_LOG_FORMAT").unwrap_or_else(|_| "json".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

fn load_catalog(config: &Config) -> anyhow::Result<Catalog> {
    let catalog = match &config.catalog_path {
        Some(path) => {
            tracing::info!("Loading catalog from {}", path.display());
            Catalog::from_json_file(path)?
        }
        None => Catalog::seeded(),
    };
    catalog.validate().context("Catalog failed validation")?;
    Ok(catalog)
}

struct Stores {
    ledger: Arc<dyn LedgerRepositoryTrait>,
    stock: Arc<dyn StockRepositoryTrait>,
    challenges: Arc<dyn ChallengeRepositoryTrait>,
}

fn open_stores(config: &Config) -> anyhow::Result<Stores> {
    if config.uses_in_memory_store() {
        tracing::warn!("Using the in-memory store; state is lost on restart");
        let store = Arc::new(InMemoryLedgerStore::new(config.starting_grant));
        return Ok(Stores {
            ledger: store.clone(),
            stock: store.clone(),
            challenges: store,
        });
    }

    let pool = db::open(&config.db_path)?;
    tracing::info!("Database path in use: {}", config.db_path);
    Ok(Stores {
        ledger: Arc::new(LedgerRepository::new(pool.clone(), config.starting_grant)),
        stock: Arc::new(StockRepository::new(pool.clone())),
        challenges: Arc::new(ChallengeRepository::new(pool)),
    })
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let catalog = Arc::new(load_catalog(config)?);
    let stores = open_stores(config)?;
    let rewards_config = config.rewards_config();

    let event_bus = EventBus::new(256);
    let domain_event_sink: Arc<dyn DomainEventSink> =
        Arc::new(WebDomainEventSink::new(event_bus.clone()));

    let reward_service = Arc::new(RewardService::new(
        stores.ledger.clone(),
        stores.stock,
        stores.challenges,
        catalog.clone(),
        domain_event_sink,
        Arc::new(SystemClock),
        rewards_config.clone(),
    ));
    reward_service.initialize()?;

    let leaderboard_service = Arc::new(LeaderboardService::new(
        stores.ledger,
        catalog.clone(),
        rewards_config.leaderboard_top_users,
    ));

    Ok(Arc::new(AppState {
        reward_service,
        leaderboard_service,
        catalog,
        event_bus,
    }))
}
