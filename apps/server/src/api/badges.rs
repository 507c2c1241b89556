use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use ecopoints_core::rewards::{BadgeCollection, BadgeUnlock};

use crate::{error::ApiResult, main_lib::AppState};

async fn list_badges(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<BadgeCollection>> {
    Ok(Json(state.reward_service.list_badges(&user_id)?))
}

async fn unlock_badge(
    Path((user_id, badge_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<BadgeUnlock>> {
    let unlock = state
        .reward_service
        .unlock_badge(&user_id, &badge_id)
        .await?;
    Ok(Json(unlock))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/{id}/badges", get(list_badges))
        .route("/users/{id}/badges/{badge_id}/unlock", post(unlock_badge))
}
