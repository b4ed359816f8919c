//! Score and session persistence behind one trait, selected once at process start.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::Database;

use std::sync::Arc;

use crate::{
    config::{Config, StoreKind},
    error::Result,
    models::{GameSession, ScoreRecord, SubmitOutcome},
};

#[async_trait::async_trait]
pub trait ScoreStore: Send + Sync {
    fn kind(&self) -> StoreKind;

    /// Keep the higher of the stored and submitted score for `wallet_address`.
    ///
    /// The read-compare-write must be atomic with respect to other calls for
    /// the same wallet.
    async fn submit(&self, wallet_address: &str, score: i64, timestamp: i64)
        -> Result<SubmitOutcome>;

    /// Best records, score descending then most recent first.
    async fn top(&self, limit: i64) -> Result<Vec<ScoreRecord>>;

    /// Store a freshly issued session and drop sessions issued before
    /// `purge_before`.
    async fn create_session(&self, session: &GameSession, purge_before: i64) -> Result<()>;

    /// Remove and return a session issued at or after `issued_after`.
    ///
    /// A session can be taken once; concurrent takes of the same id must see
    /// at most one `Some`.
    async fn take_session(&self, session_id: &str, issued_after: i64)
        -> Result<Option<GameSession>>;

    async fn is_healthy(&self) -> bool;
}

pub type SharedStore = Arc<dyn ScoreStore>;

pub async fn connect(config: &Config) -> anyhow::Result<SharedStore> {
    match config.store_kind {
        StoreKind::Postgres => {
            let db = Database::new(config).await?;

            tracing::info!("Running database migrations...");
            db.run_migrations().await?;

            Ok(Arc::new(db))
        }
        StoreKind::Memory => {
            tracing::info!("Using in-memory score store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Shared ordering for stores that sort in process.
pub(crate) fn rank_order(a: &ScoreRecord, b: &ScoreRecord) -> std::cmp::Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.timestamp.cmp(&a.timestamp))
}
