use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::{
    error::Result,
    models::{ApiResponse, LeaderboardResponse, SubmitScoreRequest, SubmitScoreResponse},
    services::LeaderboardService,
};

use super::AppState;

/// GET /api/leaderboard
pub async fn get_leaderboard(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<LeaderboardResponse>>> {
    let service = LeaderboardService::new(state.store.clone(), state.config.clone());
    let response = service.leaderboard().await?;

    Ok(Json(ApiResponse::success(response)))
}

/// POST /api/leaderboard
pub async fn submit_score(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SubmitScoreRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<SubmitScoreResponse>>> {
    let Json(req) = payload?;

    let service = LeaderboardService::new(state.store.clone(), state.config.clone());
    let response = service.submit_score(req).await?;

    Ok(Json(ApiResponse::success(response)))
}
