use std::collections::{hash_map::Entry, HashMap};

use tokio::sync::RwLock;

use super::{rank_order, ScoreStore};
use crate::{
    config::StoreKind,
    error::Result,
    models::{GameSession, ScoreRecord, SubmitOutcome},
};

/// Map-backed store for local development; contents die with the process.
#[derive(Default)]
pub struct MemoryStore {
    scores: RwLock<HashMap<String, ScoreRecord>>,
    sessions: RwLock<HashMap<String, GameSession>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ScoreStore for MemoryStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Memory
    }

    async fn submit(
        &self,
        wallet_address: &str,
        score: i64,
        timestamp: i64,
    ) -> Result<SubmitOutcome> {
        let mut scores = self.scores.write().await;

        let outcome = match scores.entry(wallet_address.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(ScoreRecord {
                    wallet_address: wallet_address.to_string(),
                    score,
                    timestamp,
                });
                SubmitOutcome::Created { score }
            }
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                if score > existing.score {
                    let previous = existing.score;
                    existing.score = score;
                    existing.timestamp = timestamp;
                    SubmitOutcome::Improved { previous, score }
                } else {
                    SubmitOutcome::Unchanged {
                        current_high: existing.score,
                    }
                }
            }
        };

        Ok(outcome)
    }

    async fn top(&self, limit: i64) -> Result<Vec<ScoreRecord>> {
        let scores = self.scores.read().await;
        let mut records: Vec<ScoreRecord> = scores.values().cloned().collect();
        records.sort_by(rank_order);
        records.truncate(limit.max(0) as usize);
        Ok(records)
    }

    async fn create_session(&self, session: &GameSession, purge_before: i64) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| s.issued_at >= purge_before);
        sessions.insert(session.session_id.clone(), session.clone());
        Ok(())
    }

    async fn take_session(
        &self,
        session_id: &str,
        issued_after: i64,
    ) -> Result<Option<GameSession>> {
        let session = self.sessions.write().await.remove(session_id);
        Ok(session.filter(|s| s.issued_at >= issued_after))
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_submission_creates_record() {
        let store = MemoryStore::new();
        let outcome = store.submit("0xA", 10, 1_000).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Created { score: 10 });

        let top = store.top(100).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].score, 10);
        assert_eq!(top[0].timestamp, 1_000);
    }

    #[tokio::test]
    async fn stored_score_is_max_of_submissions() {
        for (first, second) in [(3, 7), (7, 3), (0, 0), (12, 12)] {
            let store = MemoryStore::new();
            store.submit("0xA", first, 1).await.unwrap();
            let outcome = store.submit("0xA", second, 2).await.unwrap();

            let stored = store.top(1).await.unwrap()[0].score;
            assert_eq!(stored, first.max(second));
            assert_eq!(outcome.is_new_high_score(), second > first);
        }
    }

    #[tokio::test]
    async fn lower_submission_keeps_timestamp() {
        let store = MemoryStore::new();
        store.submit("0xA", 10, 1_000).await.unwrap();
        let outcome = store.submit("0xA", 5, 2_000).await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Unchanged { current_high: 10 });
        assert_eq!(store.top(1).await.unwrap()[0].timestamp, 1_000);
    }

    #[tokio::test]
    async fn higher_submission_updates_in_place() {
        let store = MemoryStore::new();
        store.submit("0xA", 10, 1_000).await.unwrap();
        let outcome = store.submit("0xA", 20, 3_000).await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Improved { previous: 10, score: 20 });
        let top = store.top(100).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].timestamp, 3_000);
    }

    fn session(id: &str, issued_at: i64) -> GameSession {
        GameSession {
            session_id: id.to_string(),
            seed: u64::MAX - 7,
            width: 800.0,
            height: 600.0,
            issued_at,
        }
    }

    #[tokio::test]
    async fn session_can_be_taken_once() {
        let store = MemoryStore::new();
        store.create_session(&session("s1", 1_000), 0).await.unwrap();

        let taken = store.take_session("s1", 0).await.unwrap();
        assert_eq!(taken, Some(session("s1", 1_000)));
        assert_eq!(store.take_session("s1", 0).await.unwrap(), None);
        assert_eq!(store.take_session("missing", 0).await.unwrap(), None);
    }

    #[tokio::test]
    async fn expired_sessions_are_not_returned_or_kept() {
        let store = MemoryStore::new();
        store.create_session(&session("old", 1_000), 0).await.unwrap();
        assert_eq!(store.take_session("old", 2_000).await.unwrap(), None);

        store.create_session(&session("stale", 1_000), 0).await.unwrap();
        store.create_session(&session("new", 5_000), 2_000).await.unwrap();
        assert_eq!(store.sessions.read().await.len(), 1);
        assert!(store.take_session("new", 2_000).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn top_is_capped_and_ordered() {
        let store = MemoryStore::new();
        for i in 0..150_i64 {
            store
                .submit(&format!("0x{i:04}"), i % 40, 10_000 + i)
                .await
                .unwrap();
        }

        let top = store.top(100).await.unwrap();
        assert_eq!(top.len(), 100);
        for pair in top.windows(2) {
            assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                assert!(pair[0].timestamp >= pair[1].timestamp);
            }
        }
    }
}
