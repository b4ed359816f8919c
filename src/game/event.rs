use std::fmt;

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCause {
    HitFloor,
    HitObstacle { pair_id: u64 },
}

impl fmt::Display for EndCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndCause::HitFloor => f.write_str("hit the floor"),
            EndCause::HitObstacle { pair_id } => write!(f, "hit obstacle pair {}", pair_id),
        }
    }
}

/// Events emitted during a simulation step, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Jumped,
    PairSpawned { pair_id: u64 },
    ScoreChanged { pair_id: u64, score: u64 },
    PairDiscarded { pair_id: u64 },
    GameOver { score: u64, cause: EndCause },
}
