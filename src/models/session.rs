use serde::{Deserialize, Serialize};

use crate::game::GameParams;

// ==================== GAME SESSION ====================
/// A server-issued run. The seed never leaves the server; the client gets the
/// obstacle heights it produces instead.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    pub session_id: String,
    pub seed: u64,
    /// Viewport after clamping to the client's range.
    pub width: f64,
    pub height: f64,
    /// Epoch millis.
    pub issued_at: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct StartSessionRequest {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionResponse {
    pub session_id: String,
    pub params: GameParams,
    /// Top-segment height of each pair, in spawn order.
    pub obstacle_heights: Vec<f64>,
    pub expires_at: i64,
}
