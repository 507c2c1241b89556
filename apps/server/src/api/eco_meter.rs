use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use ecopoints_core::eco_meter::{
    assess_footprint, FootprintAssessment, FootprintInput, FootprintSubmission,
};

use crate::{
    error::ApiResult, extract::AppJson, main_lib::AppState, models::FootprintSubmissionRequest,
};

/// Pure calculation. Nothing is credited.
async fn assess(
    AppJson(input): AppJson<FootprintInput>,
) -> ApiResult<Json<FootprintAssessment>> {
    Ok(Json(assess_footprint(&input)?))
}

async fn submit_footprint(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<FootprintSubmissionRequest>,
) -> ApiResult<Json<FootprintSubmission>> {
    let submission = state
        .reward_service
        .submit_footprint(&user_id, body.input, body.date)
        .await?;
    Ok(Json(submission))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/eco-meter/assess", post(assess))
        .route("/users/{id}/eco-meter", post(submit_footprint))
}
