use rand::Rng;

use crate::{
    config::Config,
    constants::{VIEWPORT_MAX_HEIGHT, VIEWPORT_MAX_WIDTH, VIEWPORT_MIN_HEIGHT, VIEWPORT_MIN_WIDTH},
    db::SharedStore,
    error::{AppError, Result},
    game::{obstacle_heights, GameParams},
    models::{GameSession, StartSessionRequest, StartSessionResponse},
    utils::now_millis,
};

fn clamp_dimension(value: Option<f64>, min: f64, max: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v.clamp(min, max),
        _ => max,
    }
}

/// Physics for a run; the viewport is clamped to what the browser client can
/// produce.
pub fn viewport_params(width: Option<f64>, height: Option<f64>) -> GameParams {
    GameParams::with_viewport(
        clamp_dimension(width, VIEWPORT_MIN_WIDTH, VIEWPORT_MAX_WIDTH),
        clamp_dimension(height, VIEWPORT_MIN_HEIGHT, VIEWPORT_MAX_HEIGHT),
    )
}

/// Session Service - issues the seeded runs that replays are checked against
pub struct SessionService {
    store: SharedStore,
    config: Config,
}

impl SessionService {
    pub fn new(store: SharedStore, config: Config) -> Self {
        Self { store, config }
    }

    pub async fn start(&self, req: StartSessionRequest) -> Result<StartSessionResponse> {
        let params = viewport_params(req.width, req.height);
        let seed: u64 = rand::rng().random();
        let session_id = format!("{:032x}", rand::rng().random::<u128>());
        let issued_at = now_millis();
        let ttl_ms = self.config.session_ttl_ms();

        let session = GameSession {
            session_id: session_id.clone(),
            seed,
            width: params.width,
            height: params.height,
            issued_at,
        };

        self.store
            .create_session(&session, issued_at.saturating_sub(ttl_ms))
            .await
            .map_err(|e| {
                tracing::error!("Error creating game session: {}", e);
                AppError::Internal("Failed to start game session".to_string())
            })?;

        let count = params.max_pairs_within(self.config.max_replay_ticks);
        let heights = obstacle_heights(&params, seed, count);
        tracing::debug!(
            "Issued session {} ({}x{}, {} heights)",
            session_id,
            params.width,
            params.height,
            heights.len()
        );

        Ok(StartSessionResponse {
            session_id,
            params,
            obstacle_heights: heights,
            expires_at: issued_at.saturating_add(ttl_ms),
        })
    }
}
