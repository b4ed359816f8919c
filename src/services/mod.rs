pub mod leaderboard_service;
pub mod replay_verifier;
pub mod session_service;

pub use leaderboard_service::LeaderboardService;
pub use replay_verifier::ReplayVerifier;
pub use session_service::SessionService;
