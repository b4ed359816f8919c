use serde::Deserialize;
use std::env;

use crate::constants::{
    DEFAULT_MAX_REPLAY_TICKS, DEFAULT_SESSION_TTL_SECS, STORE_MEMORY, STORE_POSTGRES,
};

/// Which `ScoreStore` implementation the process runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Postgres => STORE_POSTGRES,
            StoreKind::Memory => STORE_MEMORY,
        }
    }
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,
    pub environment: String,

    // Storage
    pub store_kind: StoreKind,
    pub database_url: Option<String>,
    pub database_max_connections: u32,

    // Anti-cheat
    pub require_score_replay: bool,
    pub max_replay_ticks: u64,
    pub session_ttl_secs: u64,

    // CORS
    pub cors_allowed_origins: String,
}

fn is_flag_enabled(value: &str) -> bool {
    let normalized = value.trim().to_ascii_lowercase();
    normalized == "1" || normalized == "true" || normalized == "yes" || normalized == "on"
}

/// Explicit override wins; otherwise Postgres iff a database URL is configured.
fn select_store_kind(
    override_kind: Option<&str>,
    database_url: Option<&str>,
) -> anyhow::Result<StoreKind> {
    if let Some(raw) = override_kind {
        return match raw.trim().to_ascii_lowercase().as_str() {
            STORE_POSTGRES => Ok(StoreKind::Postgres),
            STORE_MEMORY => Ok(StoreKind::Memory),
            other => anyhow::bail!("Unknown SCORE_STORE value: {}", other),
        };
    }

    match database_url {
        Some(url) if !url.trim().is_empty() => Ok(StoreKind::Postgres),
        _ => Ok(StoreKind::Memory),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());
        let store_kind = select_store_kind(
            env::var("SCORE_STORE").ok().as_deref(),
            database_url.as_deref(),
        )?;

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            store_kind,
            database_url,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,

            require_score_replay: env::var("REQUIRE_SCORE_REPLAY")
                .map(|v| is_flag_enabled(&v))
                .unwrap_or(false),
            max_replay_ticks: env::var("MAX_REPLAY_TICKS")
                .ok()
                .map(|v| v.parse())
                .transpose()?
                .unwrap_or(DEFAULT_MAX_REPLAY_TICKS),
            session_ttl_secs: env::var("SESSION_TTL_SECS")
                .ok()
                .map(|v| v.parse())
                .transpose()?
                .unwrap_or(DEFAULT_SESSION_TTL_SECS),

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string()),
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.store_kind == StoreKind::Postgres && self.database_url.is_none() {
            anyhow::bail!("SCORE_STORE=postgres requires DATABASE_URL");
        }
        if self.database_max_connections == 0 {
            anyhow::bail!("DATABASE_MAX_CONNECTIONS must be > 0");
        }
        if self.max_replay_ticks == 0 {
            anyhow::bail!("MAX_REPLAY_TICKS must be > 0");
        }
        if self.session_ttl_secs == 0 {
            anyhow::bail!("SESSION_TTL_SECS must be > 0");
        }

        if self.store_kind == StoreKind::Memory && !self.is_development() {
            tracing::warn!("In-memory score store outside development; scores are lost on restart");
        }
        if !self.require_score_replay {
            tracing::warn!("Score replay not required; any caller can post any score for any wallet");
        }
        if self.cors_allowed_origins.trim().is_empty() {
            tracing::warn!("CORS_ALLOWED_ORIGINS is empty; requests may be blocked");
        }

        Ok(())
    }

    pub fn session_ttl_ms(&self) -> i64 {
        self.session_ttl_secs.saturating_mul(1000).min(i64::MAX as u64) as i64
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development" || self.environment == "local"
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 3000,
        environment: "development".to_string(),
        store_kind: StoreKind::Memory,
        database_url: None,
        database_max_connections: 1,
        require_score_replay: false,
        max_replay_ticks: DEFAULT_MAX_REPLAY_TICKS,
        session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
        cors_allowed_origins: "*".to_string(),
    }
}
