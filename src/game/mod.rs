//! Headless simulation of the flap-past-obstacles game.
//!
//! The loop is engine-free: a renderer feeds one `FrameInput` per fixed
//! timestep into `step` and draws the `World` afterwards. The server uses the
//! same code to replay a submitted run.

mod event;
mod params;
mod replay;
mod step;
mod world;

pub use params::GameParams;
pub use replay::{replay, ReplayOutcome};
pub use world::obstacle_heights;
