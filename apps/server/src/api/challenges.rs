use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use ecopoints_core::{
    challenges::{ChallengeView, JoinOutcome},
    rewards::ChallengeClaim,
};

use crate::{
    error::ApiResult,
    extract::{AppJson, AppQuery},
    main_lib::AppState,
    models::{ContributionRequest, UserQuery},
};

async fn list_challenges(
    AppQuery(query): AppQuery<UserQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ChallengeView>>> {
    let challenges = state
        .reward_service
        .list_challenges(query.user_id.as_deref())?;
    Ok(Json(challenges))
}

async fn join_challenge(
    Path((user_id, challenge_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<JoinOutcome>> {
    let outcome = state
        .reward_service
        .join_challenge(&user_id, &challenge_id)
        .await?;
    Ok(Json(outcome))
}

async fn contribute(
    Path(challenge_id): Path<String>,
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<ContributionRequest>,
) -> ApiResult<Json<ChallengeView>> {
    let view = state
        .reward_service
        .contribute_to_challenge(&challenge_id, body.amount)
        .await?;
    Ok(Json(view))
}

async fn claim_reward(
    Path((user_id, challenge_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ChallengeClaim>> {
    let claim = state
        .reward_service
        .claim_challenge_reward(&user_id, &challenge_id)
        .await?;
    Ok(Json(claim))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/challenges", get(list_challenges))
        .route("/challenges/{id}/contributions", post(contribute))
        .route(
            "/users/{id}/challenges/{challenge_id}/join",
            post(join_challenge),
        )
        .route(
            "/users/{id}/challenges/{challenge_id}/claim",
            post(claim_reward),
        )
}
