// src/api/mod.rs

pub mod game;
pub mod health;
pub mod leaderboard;

use crate::config::Config;
use crate::db::SharedStore;

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub config: Config,
}
