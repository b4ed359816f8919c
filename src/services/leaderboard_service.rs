use rust_decimal::Decimal;

use crate::{
    config::Config,
    constants::{FIXED_REWARD, LEADERBOARD_LIMIT, MAX_SCORE},
    db::SharedStore,
    error::{AppError, Result},
    models::{
        LeaderboardEntry, LeaderboardResponse, ScoreRecord, SubmitOutcome, SubmitScoreRequest,
        SubmitScoreResponse,
    },
    utils::{format_relative_age, now_millis},
};

use super::ReplayVerifier;

fn fixed_reward() -> Decimal {
    Decimal::new(1, 9)
}

/// `count × reward` with exactly two decimals.
fn total_rewards(count: usize) -> String {
    let total = fixed_reward() * Decimal::from(count as u64);
    format!("{:.2}", total.round_dp(2))
}

fn validate_wallet(wallet_address: Option<String>) -> Result<String> {
    match wallet_address {
        Some(address) if !address.trim().is_empty() => Ok(address),
        _ => Err(AppError::BadRequest("Invalid data".to_string())),
    }
}

/// Scores arrive as JSON numbers; only whole, non-negative, exactly
/// representable values are accepted.
fn validate_score(score: Option<f64>) -> Result<i64> {
    match score {
        Some(s) if s.is_finite() && s >= 0.0 && s.fract() == 0.0 && s <= MAX_SCORE => {
            Ok(s as i64)
        }
        _ => Err(AppError::BadRequest("Invalid data".to_string())),
    }
}

fn to_entry(record: ScoreRecord, now: i64) -> LeaderboardEntry {
    LeaderboardEntry {
        timestamp: format_relative_age(now, record.timestamp),
        address: record.wallet_address,
        score: record.score,
        reward: FIXED_REWARD.to_string(),
        raw_timestamp: record.timestamp,
    }
}

fn to_response(outcome: SubmitOutcome, submitted: i64) -> SubmitScoreResponse {
    match outcome {
        SubmitOutcome::Created { score } => SubmitScoreResponse {
            message: "Score recorded!".to_string(),
            is_new_high_score: true,
            score,
            reward: Some(FIXED_REWARD.to_string()),
            current_high_score: None,
        },
        SubmitOutcome::Improved { score, .. } => SubmitScoreResponse {
            message: "New high score recorded!".to_string(),
            is_new_high_score: true,
            score,
            reward: Some(FIXED_REWARD.to_string()),
            current_high_score: None,
        },
        SubmitOutcome::Unchanged { current_high } => SubmitScoreResponse {
            message: "Score submitted but not a new high score".to_string(),
            is_new_high_score: false,
            score: submitted,
            reward: None,
            current_high_score: Some(current_high),
        },
    }
}

/// Leaderboard Service - keeps one best score per wallet and ranks them
pub struct LeaderboardService {
    store: SharedStore,
    config: Config,
}

impl LeaderboardService {
    pub fn new(store: SharedStore, config: Config) -> Self {
        Self { store, config }
    }

    /// Validate, optionally replay, then upsert-with-max.
    pub async fn submit_score(&self, req: SubmitScoreRequest) -> Result<SubmitScoreResponse> {
        let wallet_address = validate_wallet(req.wallet_address)?;
        let score = validate_score(req.score)?;

        ReplayVerifier::new(self.store.clone(), &self.config)
            .verify(score, req.replay)
            .await?;

        let outcome = self
            .store
            .submit(&wallet_address, score, now_millis())
            .await
            .map_err(|e| {
                tracing::error!("Error submitting score: {}", e);
                AppError::Internal("Failed to submit score".to_string())
            })?;

        match outcome {
            SubmitOutcome::Created { score } => {
                tracing::info!("New player {} scored {}", wallet_address, score)
            }
            SubmitOutcome::Improved { previous, score } => tracing::info!(
                "Player {} improved high score {} -> {}",
                wallet_address,
                previous,
                score
            ),
            SubmitOutcome::Unchanged { current_high } => tracing::debug!(
                "Player {} submitted {} below high score {}",
                wallet_address,
                score,
                current_high
            ),
        }

        Ok(to_response(outcome, score))
    }

    /// Top scores with relative ages computed against the current time.
    pub async fn leaderboard(&self) -> Result<LeaderboardResponse> {
        let records = self.store.top(LEADERBOARD_LIMIT).await.map_err(|e| {
            tracing::error!("Error fetching leaderboard: {}", e);
            AppError::Internal("Failed to fetch leaderboard".to_string())
        })?;

        let now = now_millis();
        let leaderboard: Vec<LeaderboardEntry> =
            records.into_iter().map(|r| to_entry(r, now)).collect();
        let total_players = leaderboard.len();

        Ok(LeaderboardResponse {
            leaderboard,
            total_players,
            total_rewards: total_rewards(total_players),
        })
    }
}
