use sqlx::{postgres::PgPoolOptions, PgPool};

use super::ScoreStore;
use crate::{
    config::{Config, StoreKind},
    error::Result,
    models::{GameSession, ScoreRecord, SubmitOutcome},
};

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct UpsertResult {
    inserted: Option<bool>,
    previous: Option<i64>,
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: String,
    seed: i64,
    width: f64,
    height: f64,
    issued_at: i64,
}

// Seeds are stored bit-for-bit in a signed BIGINT.
impl From<SessionRow> for GameSession {
    fn from(row: SessionRow) -> Self {
        GameSession {
            session_id: row.session_id,
            seed: row.seed as u64,
            width: row.width,
            height: row.height,
            issued_at: row.issued_at,
        }
    }
}

impl Database {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let url = config
            .database_url
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is not set"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn current_score(&self, wallet_address: &str) -> Result<Option<i64>> {
        let score = sqlx::query_scalar("SELECT score FROM scores WHERE wallet_address = $1")
            .bind(wallet_address)
            .fetch_optional(&self.pool)
            .await?;
        Ok(score)
    }
}

// ==================== SCORE QUERIES ====================
#[async_trait::async_trait]
impl ScoreStore for Database {
    fn kind(&self) -> StoreKind {
        StoreKind::Postgres
    }

    async fn submit(
        &self,
        wallet_address: &str,
        score: i64,
        timestamp: i64,
    ) -> Result<SubmitOutcome> {
        // `previous` reads the statement snapshot, i.e. the row before the upsert.
        let row: UpsertResult = sqlx::query_as(
            r#"
            WITH upsert AS (
                INSERT INTO scores (wallet_address, score, timestamp)
                VALUES ($1, $2, $3)
                ON CONFLICT (wallet_address) DO UPDATE
                SET score      = EXCLUDED.score,
                    timestamp  = EXCLUDED.timestamp,
                    updated_at = NOW()
                WHERE scores.score < EXCLUDED.score
                RETURNING (xmax = 0) AS inserted
            ),
            previous AS (
                SELECT score FROM scores WHERE wallet_address = $1
            )
            SELECT
                (SELECT inserted FROM upsert) AS inserted,
                (SELECT score FROM previous) AS previous
            "#,
        )
        .bind(wallet_address)
        .bind(score)
        .bind(timestamp)
        .fetch_one(&self.pool)
        .await?;

        let outcome = match (row.inserted, row.previous) {
            (Some(true), _) => SubmitOutcome::Created { score },
            (Some(false), previous) => SubmitOutcome::Improved {
                previous: previous.unwrap_or_default(),
                score,
            },
            (None, Some(current_high)) => SubmitOutcome::Unchanged { current_high },
            (None, None) => {
                // Row committed by a concurrent insert after our snapshot was taken
                let current_high = self.current_score(wallet_address).await?.unwrap_or(score);
                SubmitOutcome::Unchanged { current_high }
            }
        };

        Ok(outcome)
    }

    async fn top(&self, limit: i64) -> Result<Vec<ScoreRecord>> {
        let records = sqlx::query_as::<_, ScoreRecord>(
            "SELECT wallet_address, score, timestamp
             FROM scores
             ORDER BY score DESC, timestamp DESC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn create_session(&self, session: &GameSession, purge_before: i64) -> Result<()> {
        sqlx::query("DELETE FROM game_sessions WHERE issued_at < $1")
            .bind(purge_before)
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "INSERT INTO game_sessions (session_id, seed, width, height, issued_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&session.session_id)
        .bind(session.seed as i64)
        .bind(session.width)
        .bind(session.height)
        .bind(session.issued_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn take_session(
        &self,
        session_id: &str,
        issued_after: i64,
    ) -> Result<Option<GameSession>> {
        // DELETE ... RETURNING hands the row to exactly one caller
        let row: Option<SessionRow> = sqlx::query_as(
            "DELETE FROM game_sessions
             WHERE session_id = $1
             RETURNING session_id, seed, width, height, issued_at",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row
            .map(GameSession::from)
            .filter(|s| s.issued_at >= issued_after))
    }

    async fn is_healthy(&self) -> bool {
        self.pool.acquire().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use rand::Rng;
    use sqlx::postgres::PgConnectOptions;

    /// A migrated, throwaway database on the server named by `DATABASE_URL`.
    struct ScratchDatabase {
        admin: PgPool,
        name: String,
        db: Database,
    }

    impl ScratchDatabase {
        async fn create() -> Option<Self> {
            let Ok(url) = std::env::var("DATABASE_URL") else {
                eprintln!("DATABASE_URL not set; skipping Postgres store test");
                return None;
            };
            let options: PgConnectOptions =
                url.parse().expect("DATABASE_URL is not a Postgres URL");
            let admin = PgPool::connect_with(options.clone())
                .await
                .expect("connect to DATABASE_URL");

            let name = format!("flappy_test_{:016x}", rand::rng().random::<u64>());
            sqlx::query(&format!("CREATE DATABASE {name}"))
                .execute(&admin)
                .await
                .expect("create scratch database");

            let pool = PgPoolOptions::new()
                .max_connections(4)
                .connect_with(options.database(&name))
                .await
                .expect("connect to scratch database");
            let db = Database { pool };
            db.run_migrations().await.expect("run migrations");

            Some(Self { admin, name, db })
        }

        async fn drop_database(self) {
            self.db.pool.close().await;
            sqlx::query(&format!("DROP DATABASE IF EXISTS {}", self.name))
                .execute(&self.admin)
                .await
                .expect("drop scratch database");
        }
    }

    #[tokio::test]
    async fn database_new_returns_error_on_invalid_url() {
        let mut config = test_config();
        config.store_kind = StoreKind::Postgres;
        config.database_url = Some("not-a-url".to_string());
        let result = Database::new(&config).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn database_new_requires_url() {
        let mut config = test_config();
        config.store_kind = StoreKind::Postgres;
        assert!(Database::new(&config).await.is_err());
    }

    #[tokio::test]
    async fn upsert_keeps_the_highest_score() {
        let Some(scratch) = ScratchDatabase::create().await else {
            return;
        };
        let db = &scratch.db;

        let created = db.submit("0xA", 10, 1_000).await.unwrap();
        assert_eq!(created, SubmitOutcome::Created { score: 10 });

        let lower = db.submit("0xA", 5, 2_000).await.unwrap();
        assert_eq!(lower, SubmitOutcome::Unchanged { current_high: 10 });

        let higher = db.submit("0xA", 20, 3_000).await.unwrap();
        assert_eq!(higher, SubmitOutcome::Improved { previous: 10, score: 20 });

        let same = db.submit("0xA", 20, 4_000).await.unwrap();
        assert_eq!(same, SubmitOutcome::Unchanged { current_high: 20 });

        let top = db.top(100).await.unwrap();
        assert_eq!(
            top,
            vec![ScoreRecord {
                wallet_address: "0xA".to_string(),
                score: 20,
                timestamp: 3_000,
            }]
        );

        scratch.drop_database().await;
    }

    #[tokio::test]
    async fn concurrent_submissions_store_the_maximum() {
        let Some(scratch) = ScratchDatabase::create().await else {
            return;
        };
        let db = scratch.db.clone();

        let tasks: Vec<_> = (0..20_i64)
            .map(|score| {
                let db = db.clone();
                tokio::spawn(async move { db.submit("0xRACE", score, 1_000 + score).await })
            })
            .collect();
        let mut created = 0;
        for task in tasks {
            if let SubmitOutcome::Created { .. } = task.await.unwrap().unwrap() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(db.top(1).await.unwrap()[0].score, 19);

        scratch.drop_database().await;
    }

    #[tokio::test]
    async fn top_is_capped_and_ordered() {
        let Some(scratch) = ScratchDatabase::create().await else {
            return;
        };
        let db = &scratch.db;

        for i in 0..150_i64 {
            db.submit(&format!("0x{i:04}"), i % 40, 10_000 + i)
                .await
                .unwrap();
        }

        let top = db.top(100).await.unwrap();
        assert_eq!(top.len(), 100);
        for pair in top.windows(2) {
            assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                assert!(pair[0].timestamp > pair[1].timestamp);
            }
        }
        assert_eq!(top[0].score, 39);
        assert_eq!(top[0].timestamp, 10_000 + 119);

        scratch.drop_database().await;
    }

    #[tokio::test]
    async fn sessions_round_trip_once() {
        let Some(scratch) = ScratchDatabase::create().await else {
            return;
        };
        let db = &scratch.db;

        let session = GameSession {
            session_id: "s1".to_string(),
            seed: u64::MAX - 3,
            width: 640.0,
            height: 480.0,
            issued_at: 5_000,
        };
        db.create_session(&session, 0).await.unwrap();

        assert_eq!(db.take_session("s1", 0).await.unwrap(), Some(session.clone()));
        assert_eq!(db.take_session("s1", 0).await.unwrap(), None);

        db.create_session(&session, 0).await.unwrap();
        assert_eq!(db.take_session("s1", 6_000).await.unwrap(), None);

        scratch.drop_database().await;
    }
}
