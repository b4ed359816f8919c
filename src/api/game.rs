use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::{
    error::Result,
    game::GameParams,
    models::{ApiResponse, StartSessionRequest, StartSessionResponse},
    services::SessionService,
};

use super::AppState;

/// GET /api/game/params
///
/// Physics the server replays submissions with; clients should render with
/// the same values.
pub async fn get_params() -> Json<GameParams> {
    Json(GameParams::default())
}

/// POST /api/game/session
pub async fn start_session(
    State(state): State<AppState>,
    payload: std::result::Result<Json<StartSessionRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<StartSessionResponse>>> {
    let Json(req) = payload?;

    let service = SessionService::new(state.store.clone(), state.config.clone());
    let response = service.start(req).await?;

    Ok(Json(ApiResponse::success(response)))
}
