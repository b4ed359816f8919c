use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::params::GameParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    Over,
}

/// Axis-aligned box in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Aabb {
    pub fn centered(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            left: x - width / 2.0,
            top: y - height / 2.0,
            right: x + width / 2.0,
            bottom: y + height / 2.0,
        }
    }

    /// Touching edges do not count as overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    pub y: f64,
    pub vy: f64,
}

/// Top and bottom segment around one gap; scored at most once.
#[derive(Debug, Clone, PartialEq)]
pub struct ObstaclePair {
    pub id: u64,
    /// Center x of both segments.
    pub x: f64,
    pub top_height: f64,
    pub scored: bool,
}

impl ObstaclePair {
    pub fn right_edge(&self, params: &GameParams) -> f64 {
        self.x + params.obstacle_width / 2.0
    }

    pub fn top_segment(&self, params: &GameParams) -> Aabb {
        let half = params.obstacle_width / 2.0;
        Aabb {
            left: self.x - half,
            top: 0.0,
            right: self.x + half,
            bottom: self.top_height,
        }
    }

    pub fn bottom_segment(&self, params: &GameParams) -> Aabb {
        let half = params.obstacle_width / 2.0;
        Aabb {
            left: self.x - half,
            top: self.top_height + params.gap_height,
            right: self.x + half,
            bottom: params.ground_y(),
        }
    }
}

/// Top-segment heights of successive pairs for one seed.
///
/// ChaCha8 output is fixed for a given seed across crate versions and
/// platforms. Each height is `lo + next_u32() % (hi - lo + 1)` in whole pixels,
/// where `lo..=hi` is [`GameParams::top_height_range`] rounded inward.
#[derive(Debug, Clone)]
pub struct HeightStream {
    rng: ChaCha8Rng,
}

impl HeightStream {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn next_height(&mut self, params: &GameParams) -> f64 {
        let (min, max) = params.top_height_range();
        let lo = min.ceil() as u32;
        let hi = (max.floor() as u32).max(lo);
        let span = hi - lo + 1;
        (lo + self.rng.next_u32() % span) as f64
    }
}

/// The first `count` heights a run seeded with `seed` will spawn.
pub fn obstacle_heights(params: &GameParams, seed: u64, count: usize) -> Vec<f64> {
    let mut stream = HeightStream::new(seed);
    (0..count).map(|_| stream.next_height(params)).collect()
}

/// Full simulation state. Advanced only through [`super::step`].
#[derive(Debug, Clone)]
pub struct World {
    pub params: GameParams,
    pub phase: Phase,
    pub tick: u64,
    pub score: u64,
    pub character: Character,
    /// Live pairs in spawn order.
    pub pairs: Vec<ObstaclePair>,
    next_pair_id: u64,
    first_spawn_tick: Option<u64>,
    next_spawn_tick: u64,
    spawn_interval_ticks: u64,
    heights: HeightStream,
}

impl World {
    pub fn new(params: GameParams, seed: u64) -> Self {
        let first_spawn_tick = params.ticks_for(params.first_spawn_secs);
        let spawn_interval_ticks = params.ticks_for(params.spawn_interval_secs);

        Self {
            character: Character {
                y: params.character_start_y,
                vy: 0.0,
            },
            phase: Phase::NotStarted,
            tick: 0,
            score: 0,
            pairs: Vec::new(),
            next_pair_id: 0,
            first_spawn_tick: Some(first_spawn_tick),
            next_spawn_tick: spawn_interval_ticks,
            spawn_interval_ticks,
            heights: HeightStream::new(seed),
            params,
        }
    }

    /// NotStarted -> Running. No effect in any other phase.
    pub fn start(&mut self) {
        if self.phase == Phase::NotStarted {
            self.phase = Phase::Running;
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::Over
    }

    pub fn character_box(&self) -> Aabb {
        Aabb::centered(
            self.params.character_x,
            self.character.y,
            self.params.character_width,
            self.params.character_height,
        )
    }

    /// Number of pairs whose timers fire on the current tick.
    pub(super) fn spawns_due(&mut self) -> usize {
        let mut due = 0;
        if self.first_spawn_tick == Some(self.tick) {
            self.first_spawn_tick = None;
            due += 1;
        }
        if self.tick == self.next_spawn_tick {
            self.next_spawn_tick += self.spawn_interval_ticks;
            due += 1;
        }
        due
    }

    pub(super) fn spawn_pair(&mut self) -> u64 {
        let top_height = self.heights.next_height(&self.params);

        let id = self.next_pair_id;
        self.next_pair_id += 1;
        self.pairs.push(ObstaclePair {
            id,
            x: self.params.spawn_x(),
            top_height,
            scored: false,
        });
        id
    }

    #[cfg(test)]
    pub(super) fn push_pair(&mut self, x: f64, top_height: f64) -> u64 {
        let id = self.next_pair_id;
        self.next_pair_id += 1;
        self.pairs.push(ObstaclePair {
            id,
            x,
            top_height,
            scored: false,
        });
        id
    }
}
