use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use ecopoints_core::missions::{MissionBoard, MissionOutcome};

use crate::{
    error::ApiResult,
    extract::AppQuery,
    main_lib::AppState,
    models::{DateQuery, MissionsResetResponse, UserQuery},
};

async fn mission_board(
    Path(user_id): Path<String>,
    AppQuery(query): AppQuery<DateQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<MissionBoard>> {
    Ok(Json(state.reward_service.mission_board(&user_id, query.date)?))
}

/// Completing a mission twice on the same date returns the existing record
/// with zero points earned.
async fn complete_mission(
    Path((user_id, mission_id)): Path<(String, String)>,
    AppQuery(query): AppQuery<DateQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<MissionOutcome>> {
    let outcome = state
        .reward_service
        .complete_mission(&user_id, &mission_id, query.date)
        .await?;
    Ok(Json(outcome))
}

async fn reset_missions(
    AppQuery(query): AppQuery<UserQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<MissionsResetResponse>> {
    let removed = state
        .reward_service
        .reset_missions(query.user_id.as_deref())
        .await?;
    Ok(Json(MissionsResetResponse { removed }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/{id}/missions", get(mission_board))
        .route(
            "/users/{id}/missions/{mission_id}/complete",
            post(complete_mission),
        )
        .route("/missions/completions", delete(reset_missions))
}
