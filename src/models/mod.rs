// src/models/mod.rs
pub mod score;
pub mod session;

pub use score::{
    ApiResponse,
    LeaderboardEntry,
    LeaderboardResponse,
    ReplayInput,
    ScoreRecord,
    SubmitOutcome,
    SubmitScoreRequest,
    SubmitScoreResponse,
};
pub use session::{GameSession, StartSessionRequest, StartSessionResponse};
