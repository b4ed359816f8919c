use super::event::{EndCause, GameEvent};
use super::params::GameParams;
use super::step::{step, FrameInput};
use super::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayOutcome {
    /// Score carried by the game-over event, or the running score if the
    /// budget ran out first.
    pub score: u64,
    pub ticks: u64,
    /// Set once the run ended; `None` when `max_ticks` ran out first.
    pub cause: Option<EndCause>,
    /// Jump inputs that landed on a running tick.
    pub jumps_applied: u64,
}

impl ReplayOutcome {
    pub fn finished(&self) -> bool {
        self.cause.is_some()
    }
}

/// Re-run a game headlessly.
///
/// `jumps` lists the ticks (1-based, as counted by [`World::tick`]) on which a
/// jump input was registered. Order and duplicates do not matter.
pub fn replay(params: GameParams, seed: u64, jumps: &[u64], max_ticks: u64) -> ReplayOutcome {
    let mut schedule = jumps.to_vec();
    schedule.sort_unstable();
    schedule.dedup();

    let mut world = World::new(params, seed);
    world.start();

    let mut score = 0;
    let mut cause = None;
    let mut jumps_applied = 0;

    while !world.is_over() && world.tick < max_ticks {
        let next_tick = world.tick + 1;
        let input = FrameInput {
            jump: schedule.binary_search(&next_tick).is_ok(),
        };

        for event in step(&mut world, input) {
            match event {
                GameEvent::Jumped => jumps_applied += 1,
                GameEvent::PairSpawned { pair_id } => {
                    tracing::trace!(tick = world.tick, pair_id, "Pair spawned")
                }
                GameEvent::ScoreChanged { pair_id, score: now } => {
                    tracing::trace!(tick = world.tick, pair_id, score = now, "Pair passed");
                    score = now;
                }
                GameEvent::PairDiscarded { pair_id } => {
                    tracing::trace!(tick = world.tick, pair_id, "Pair discarded")
                }
                GameEvent::GameOver { score: last, cause: end } => {
                    score = last;
                    cause = Some(end);
                }
            }
        }
    }

    ReplayOutcome {
        score,
        ticks: world.tick,
        cause,
        jumps_applied,
    }
}
