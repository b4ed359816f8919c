use crate::{
    config::Config,
    constants::REPLAY_CLOCK_SLACK_MS,
    db::SharedStore,
    error::{AppError, Result},
    game::{self, GameParams, ReplayOutcome},
    models::ReplayInput,
    utils::now_millis,
};

/// Re-runs submitted games against the session they were played in.
pub struct ReplayVerifier {
    store: SharedStore,
    required: bool,
    max_ticks: u64,
    session_ttl_ms: i64,
}

impl ReplayVerifier {
    pub fn new(store: SharedStore, config: &Config) -> Self {
        Self {
            store,
            required: config.require_score_replay,
            max_ticks: config.max_replay_ticks,
            session_ttl_ms: config.session_ttl_ms(),
        }
    }

    /// Consumes the replay's session, so each session backs at most one
    /// submission.
    pub async fn verify(&self, claimed_score: i64, replay: Option<ReplayInput>) -> Result<()> {
        let Some(replay) = replay else {
            if self.required {
                return Err(AppError::BadRequest("Replay required".to_string()));
            }
            return Ok(());
        };

        if replay.jumps.len() as u64 > self.max_ticks {
            return Err(AppError::ReplayRejected(
                "More jumps than replayable ticks".to_string(),
            ));
        }

        let now = now_millis();
        let session = self
            .store
            .take_session(&replay.session_id, now.saturating_sub(self.session_ttl_ms))
            .await
            .map_err(|e| {
                tracing::error!("Error loading game session: {}", e);
                AppError::Internal("Failed to verify replay".to_string())
            })?
            .ok_or_else(|| {
                AppError::ReplayRejected("Unknown, used or expired game session".to_string())
            })?;

        let params = GameParams::with_viewport(session.width, session.height);
        let max_ticks = self.max_ticks;
        let seed = session.seed;
        let jumps = replay.jumps;
        let replay_params = params.clone();
        let outcome: ReplayOutcome = tokio::task::spawn_blocking(move || {
            game::replay(replay_params, seed, &jumps, max_ticks)
        })
        .await
        .map_err(|e| {
            tracing::error!("Replay task failed: {}", e);
            AppError::Internal("Failed to verify replay".to_string())
        })?;

        let Some(cause) = outcome.cause else {
            return Err(AppError::ReplayRejected(format!(
                "Run did not end within {} ticks",
                self.max_ticks
            )));
        };

        let run_ms = params.ticks_to_millis(outcome.ticks);
        let session_age_ms = now - session.issued_at;
        if run_ms > session_age_ms + REPLAY_CLOCK_SLACK_MS {
            tracing::warn!(
                "Replay of session {} lasts {} ms but the session is {} ms old",
                session.session_id,
                run_ms,
                session_age_ms
            );
            return Err(AppError::ReplayRejected(
                "Run is longer than its session".to_string(),
            ));
        }

        if outcome.score as i64 != claimed_score {
            tracing::warn!(
                "Replay mismatch: claimed {}, replayed {} over {} ticks",
                claimed_score,
                outcome.score,
                outcome.ticks
            );
            return Err(AppError::ReplayRejected(format!(
                "Replayed score {} does not match submitted score {}",
                outcome.score, claimed_score
            )));
        }

        tracing::debug!(
            "Replay verified: score {} in {} ticks, {} jumps, {}",
            outcome.score,
            outcome.ticks,
            outcome.jumps_applied,
            cause
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::test_config,
        db::{MemoryStore, ScoreStore},
        models::GameSession,
    };
    use std::sync::Arc;

    async fn store_with_session(id: &str, issued_at: i64) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        let session = GameSession {
            session_id: id.to_string(),
            seed: 3,
            width: 800.0,
            height: 600.0,
            issued_at,
        };
        store.create_session(&session, 0).await.unwrap();
        store
    }

    fn idle_replay(id: &str) -> Option<ReplayInput> {
        Some(ReplayInput {
            session_id: id.to_string(),
            jumps: vec![],
        })
    }

    /// Issued a minute ago, so any short run fits its wall-clock age.
    fn a_minute_ago() -> i64 {
        now_millis() - 60_000
    }

    #[tokio::test]
    async fn missing_replay_allowed_unless_required() {
        let store = Arc::new(MemoryStore::new());
        let mut config = test_config();
        assert!(ReplayVerifier::new(store.clone(), &config)
            .verify(10, None)
            .await
            .is_ok());

        config.require_score_replay = true;
        let err = ReplayVerifier::new(store, &config)
            .verify(10, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn matching_replay_is_accepted() {
        let store = store_with_session("s1", a_minute_ago()).await;
        let verifier = ReplayVerifier::new(store, &test_config());
        // An idle run falls to the floor before the first obstacle.
        assert!(verifier.verify(0, idle_replay("s1")).await.is_ok());
    }

    #[tokio::test]
    async fn forged_score_is_rejected() {
        let store = store_with_session("s1", a_minute_ago()).await;
        let verifier = ReplayVerifier::new(store, &test_config());
        let err = verifier.verify(50, idle_replay("s1")).await.unwrap_err();
        assert!(matches!(err, AppError::ReplayRejected(_)));
    }

    #[tokio::test]
    async fn session_backs_a_single_submission() {
        let store = store_with_session("s1", a_minute_ago()).await;
        let verifier = ReplayVerifier::new(store, &test_config());
        assert!(verifier.verify(0, idle_replay("s1")).await.is_ok());

        let err = verifier.verify(0, idle_replay("s1")).await.unwrap_err();
        assert!(matches!(err, AppError::ReplayRejected(_)));
    }

    #[tokio::test]
    async fn unknown_or_expired_session_is_rejected() {
        let config = test_config();
        let expired = now_millis() - config.session_ttl_ms() - 1_000;
        let store = store_with_session("old", expired).await;
        let verifier = ReplayVerifier::new(store, &config);

        for id in ["old", "never-issued"] {
            let err = verifier.verify(0, idle_replay(id)).await.unwrap_err();
            assert!(matches!(err, AppError::ReplayRejected(_)), "{id}");
        }
    }

    #[tokio::test]
    async fn unfinished_run_is_rejected() {
        let store = store_with_session("s1", a_minute_ago()).await;
        let mut config = test_config();
        config.max_replay_ticks = 10;
        let err = ReplayVerifier::new(store, &config)
            .verify(0, idle_replay("s1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ReplayRejected(_)));
    }

    #[tokio::test]
    async fn run_cannot_outlast_its_session() {
        // Issued 10 s in the future: not even an idle run fits.
        let store = store_with_session("s1", now_millis() + 10_000).await;
        let verifier = ReplayVerifier::new(store, &test_config());
        let err = verifier.verify(0, idle_replay("s1")).await.unwrap_err();
        assert!(matches!(err, AppError::ReplayRejected(msg) if msg.contains("longer")));
    }
}
