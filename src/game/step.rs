//! The step function: advances the world by one fixed timestep.
//!
//! Processing order:
//!   1. Jump input
//!   2. Gravity and world bounds
//!   3. Spawn timers
//!   4. Obstacle scroll
//!   5. Obstacle collision (a hit ends the tick)
//!   6. Scoring (once per pair)
//!   7. Off-screen cleanup
//!   8. Floor check

use super::event::{EndCause, GameEvent};
use super::world::{Phase, World};

/// Input sampled for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Key press or pointer tap since the previous tick.
    pub jump: bool,
}

pub fn step(world: &mut World, input: FrameInput) -> Vec<GameEvent> {
    if world.phase != Phase::Running {
        return vec![];
    }

    let mut events = Vec::new();
    world.tick += 1;

    resolve_jump(world, input, &mut events);
    resolve_gravity(world);
    resolve_spawns(world, &mut events);
    resolve_scroll(world);
    if resolve_collision(world, &mut events) {
        return events;
    }
    resolve_scoring(world, &mut events);
    resolve_cleanup(world, &mut events);
    resolve_floor(world, &mut events);

    events
}

fn resolve_jump(world: &mut World, input: FrameInput, events: &mut Vec<GameEvent>) {
    if input.jump {
        world.character.vy = world.params.jump_velocity;
        events.push(GameEvent::Jumped);
    }
}

fn resolve_gravity(world: &mut World) {
    let dt = world.params.timestep_secs;
    let half_height = world.params.character_height / 2.0;
    let min_y = half_height;
    let max_y = world.params.ground_y() - half_height;

    world.character.vy += world.params.gravity * dt;
    world.character.y += world.character.vy * dt;

    if world.character.y < min_y {
        world.character.y = min_y;
        world.character.vy = world.character.vy.max(0.0);
    } else if world.character.y > max_y {
        world.character.y = max_y;
        world.character.vy = world.character.vy.min(0.0);
    }
}

fn resolve_spawns(world: &mut World, events: &mut Vec<GameEvent>) {
    for _ in 0..world.spawns_due() {
        let pair_id = world.spawn_pair();
        events.push(GameEvent::PairSpawned { pair_id });
    }
}

fn resolve_scroll(world: &mut World) {
    let dx = world.params.obstacle_speed * world.params.timestep_secs;
    for pair in &mut world.pairs {
        pair.x -= dx;
    }
}

fn resolve_scoring(world: &mut World, events: &mut Vec<GameEvent>) {
    let character_x = world.params.character_x;
    for pair in &mut world.pairs {
        if !pair.scored && pair.right_edge(&world.params) < character_x {
            pair.scored = true;
            world.score += 1;
            events.push(GameEvent::ScoreChanged {
                pair_id: pair.id,
                score: world.score,
            });
        }
    }
}

fn resolve_cleanup(world: &mut World, events: &mut Vec<GameEvent>) {
    let despawn_x = world.params.despawn_x;
    world.pairs.retain(|pair| {
        let keep = pair.x >= despawn_x;
        if !keep {
            events.push(GameEvent::PairDiscarded { pair_id: pair.id });
        }
        keep
    });
}

fn resolve_floor(world: &mut World, events: &mut Vec<GameEvent>) {
    if world.character.y >= world.params.floor_threshold() {
        end_run(world, EndCause::HitFloor, events);
    }
}

fn resolve_collision(world: &mut World, events: &mut Vec<GameEvent>) -> bool {
    let body = world.character_box();
    let hit = world.pairs.iter().find(|pair| {
        body.overlaps(&pair.top_segment(&world.params))
            || body.overlaps(&pair.bottom_segment(&world.params))
    });

    match hit {
        Some(pair) => {
            let pair_id = pair.id;
            end_run(world, EndCause::HitObstacle { pair_id }, events);
            true
        }
        None => false,
    }
}

/// Running -> Over, exactly once.
fn end_run(world: &mut World, cause: EndCause, events: &mut Vec<GameEvent>) {
    if world.phase == Phase::Over {
        return;
    }
    world.phase = Phase::Over;
    tracing::debug!(tick = world.tick, score = world.score, ?cause, "Run ended");
    events.push(GameEvent::GameOver {
        score: world.score,
        cause,
    });
}
