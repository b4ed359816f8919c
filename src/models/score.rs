use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ==================== SCORE RECORD ====================
/// One best score per wallet address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ScoreRecord {
    pub wallet_address: String,
    pub score: i64,
    /// Epoch millis of the last accepted update.
    pub timestamp: i64,
}

/// What a store did with a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created { score: i64 },
    Improved { previous: i64, score: i64 },
    Unchanged { current_high: i64 },
}

impl SubmitOutcome {
    pub fn is_new_high_score(&self) -> bool {
        !matches!(self, SubmitOutcome::Unchanged { .. })
    }

    /// Stored score after the submission was applied.
    pub fn stored_score(&self) -> i64 {
        match *self {
            SubmitOutcome::Created { score } | SubmitOutcome::Improved { score, .. } => score,
            SubmitOutcome::Unchanged { current_high } => current_high,
        }
    }
}

// ==================== SUBMISSION ====================
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreRequest {
    pub wallet_address: Option<String>,
    pub score: Option<f64>,
    pub replay: Option<ReplayInput>,
}

/// The session a run was played in and the ticks on which the player jumped.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayInput {
    pub session_id: String,
    #[serde(default)]
    pub jumps: Vec<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreResponse {
    pub message: String,
    pub is_new_high_score: bool,
    pub score: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_high_score: Option<i64>,
}

// ==================== LEADERBOARD ====================
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub address: String,
    pub score: i64,
    pub reward: String,
    /// Relative age, e.g. "3 hours ago".
    pub timestamp: String,
    pub raw_timestamp: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub leaderboard: Vec<LeaderboardEntry>,
    pub total_players: usize,
    pub total_rewards: String,
}

// ==================== API RESPONSE ====================
/// Success envelope; the payload fields sit next to `success`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
