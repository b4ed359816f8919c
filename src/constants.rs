/// Application constants

// Leaderboard
pub const LEADERBOARD_LIMIT: i64 = 100;
pub const FIXED_REWARD: &str = "0.000000001"; // per entry, in MON

// Largest integer a JSON client can send without losing precision (2^53 - 1)
pub const MAX_SCORE: f64 = 9_007_199_254_740_991.0;

// Replay verification
pub const DEFAULT_MAX_REPLAY_TICKS: u64 = 108_000; // 30 minutes at 60 Hz
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3_600;
// A replayed run may outlast its session's wall-clock age by this much
pub const REPLAY_CLOCK_SLACK_MS: i64 = 5_000;

// Viewport bounds of the browser client
pub const VIEWPORT_MAX_WIDTH: f64 = 800.0;
pub const VIEWPORT_MAX_HEIGHT: f64 = 600.0;
pub const VIEWPORT_MIN_WIDTH: f64 = 320.0;
pub const VIEWPORT_MIN_HEIGHT: f64 = 480.0;

// Store backends
pub const STORE_POSTGRES: &str = "postgres";
pub const STORE_MEMORY: &str = "memory";
