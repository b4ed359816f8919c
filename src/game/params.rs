use serde::Serialize;

/// Physics and layout constants of one run, in pixels and seconds.
///
/// Positions follow screen coordinates: y grows downward, bodies are
/// addressed by their center.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameParams {
    pub width: f64,
    pub height: f64,
    /// Height of the ground strip at the bottom of the viewport.
    pub ground_height: f64,

    pub character_x: f64,
    pub character_start_y: f64,
    pub character_width: f64,
    pub character_height: f64,
    /// Downward acceleration, px/s².
    pub gravity: f64,
    /// Vertical velocity set by a jump, px/s (negative is up).
    pub jump_velocity: f64,
    /// The run ends once the character's y reaches `height - floor_margin`.
    pub floor_margin: f64,

    pub obstacle_width: f64,
    pub gap_height: f64,
    pub min_segment_height: f64,
    /// Leftward obstacle speed, px/s.
    pub obstacle_speed: f64,
    pub first_spawn_secs: f64,
    pub spawn_interval_secs: f64,
    /// Pairs whose center x drops below this are discarded.
    pub despawn_x: f64,

    pub timestep_secs: f64,
}

impl Default for GameParams {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            ground_height: 80.0,

            character_x: 100.0,
            character_start_y: 200.0,
            character_width: 32.0,
            character_height: 40.0,
            gravity: 1000.0,
            jump_velocity: -400.0,
            floor_margin: 120.0,

            obstacle_width: 50.0,
            gap_height: 180.0,
            min_segment_height: 50.0,
            obstacle_speed: 200.0,
            first_spawn_secs: 1.5,
            spawn_interval_secs: 2.0,
            despawn_x: -50.0,

            timestep_secs: 1.0 / 60.0,
        }
    }
}

impl GameParams {
    pub fn with_viewport(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// y of the ground line; bodies cannot sink below it.
    pub fn ground_y(&self) -> f64 {
        self.height - self.ground_height
    }

    pub fn floor_threshold(&self) -> f64 {
        self.height - self.floor_margin
    }

    /// Center x at which new pairs appear, just past the right edge.
    pub fn spawn_x(&self) -> f64 {
        self.width + self.obstacle_width / 2.0
    }

    /// Whole ticks closest to `secs`, at least one.
    pub fn ticks_for(&self, secs: f64) -> u64 {
        (secs / self.timestep_secs).round().max(1.0) as u64
    }

    /// Upper bound on pairs spawned within `ticks`.
    pub fn max_pairs_within(&self, ticks: u64) -> usize {
        let first = self.ticks_for(self.first_spawn_secs);
        let interval = self.ticks_for(self.spawn_interval_secs);
        let first_count = u64::from(ticks >= first);
        (first_count + ticks / interval) as usize
    }

    pub fn ticks_to_millis(&self, ticks: u64) -> i64 {
        (ticks as f64 * self.timestep_secs * 1000.0).round() as i64
    }

    /// Inclusive range for the top segment height.
    pub fn top_height_range(&self) -> (f64, f64) {
        let min = self.min_segment_height;
        let max = self.ground_y() - self.gap_height - self.min_segment_height;
        (min, max.max(min))
    }
}
