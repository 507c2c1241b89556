use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use ecopoints_core::rewards::{PerkListing, RedemptionReceipt};

use crate::{error::ApiResult, main_lib::AppState};

async fn list_perks(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<PerkListing>>> {
    Ok(Json(state.reward_service.list_perks(&user_id)?))
}

async fn redeem_perk(
    Path((user_id, perk_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<RedemptionReceipt>> {
    let receipt = state.reward_service.redeem_perk(&user_id, &perk_id).await?;
    Ok(Json(receipt))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/{id}/perks", get(list_perks))
        .route("/users/{id}/perks/{perk_id}/redeem", post(redeem_perk))
}
