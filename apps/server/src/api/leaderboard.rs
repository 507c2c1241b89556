use std::sync::Arc;

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use ecopoints_core::{
    leaderboard::{LeaderboardEntry, LeaderboardMetric, LeaderboardScope},
    Error as CoreError,
};

use crate::{
    error::ApiResult, extract::AppQuery, main_lib::AppState, models::LeaderboardQuery,
};

/// `sortBy` defaults to `ecoPoints`; unknown metrics are rejected.
async fn get_leaderboard(
    AppQuery(query): AppQuery<LeaderboardQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<LeaderboardEntry>>> {
    let metric = match query.sort_by.as_deref() {
        Some(raw) => raw.parse::<LeaderboardMetric>().map_err(CoreError::from)?,
        None => LeaderboardMetric::default(),
    };
    let scope = match query.state {
        Some(code) if !code.trim().is_empty() => LeaderboardScope::State(code),
        _ => LeaderboardScope::AllStates,
    };
    Ok(Json(state.leaderboard_service.rank(metric, &scope)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/leaderboard", get(get_leaderboard))
}
