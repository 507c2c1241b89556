use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use ecopoints_core::{
    ledger::{ImpactTotals, LedgerEntry, ProfileUpdate, Redemption},
    rewards::{AccountSummary, BalanceUpdate},
};

use crate::{
    error::ApiResult, extract::AppJson, main_lib::AppState, models::AwardPointsRequest,
};

async fn get_account(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<AccountSummary>> {
    let account = state.reward_service.get_account(&user_id).await?;
    Ok(Json(account))
}

async fn update_profile(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
    AppJson(update): AppJson<ProfileUpdate>,
) -> ApiResult<Json<AccountSummary>> {
    let account = state
        .reward_service
        .update_profile(&user_id, update)
        .await?;
    Ok(Json(account))
}

async fn award_points(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<AwardPointsRequest>,
) -> ApiResult<Json<BalanceUpdate>> {
    let update = state
        .reward_service
        .award_points(&user_id, body.amount, &body.reason)
        .await?;
    Ok(Json(update))
}

async fn record_impact(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
    AppJson(impact): AppJson<ImpactTotals>,
) -> ApiResult<Json<AccountSummary>> {
    let account = state
        .reward_service
        .record_impact(&user_id, impact)
        .await?;
    Ok(Json(account))
}

async fn ledger_history(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<LedgerEntry>>> {
    Ok(Json(state.reward_service.ledger_history(&user_id)?))
}

async fn list_redemptions(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Redemption>>> {
    Ok(Json(state.reward_service.redemptions(&user_id)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/{id}", get(get_account))
        .route("/users/{id}/profile", put(update_profile))
        .route("/users/{id}/points", post(award_points))
        .route("/users/{id}/impact", post(record_impact))
        .route("/users/{id}/ledger", get(ledger_history))
        .route("/users/{id}/redemptions", get(list_redemptions))
}
