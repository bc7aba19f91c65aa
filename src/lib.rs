//! Pixel Rusher - A falling-block dodging arcade game
//!
//! Core modules:
//! - `sim`: Per-frame simulation (motion, spawning, collisions, score)
//! - `session`: Menu / playing / game-over state machine and loop lifecycle
//! - `platform`: Input tracking, frame scheduling, key-value storage
//! - `persistence`: Leaderboard gateways (remote, local fallback, in-memory)
//! - `tuning`: Data-driven game balance
//! - `app`: Cooperative driver tying the session to a leaderboard

pub mod app;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use app::App;
pub use highscores::{HighScoreEntry, HighScores};
pub use settings::{Backend, Settings};
pub use tuning::SimConfig;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (pixels)
    pub const GAME_WIDTH: f32 = 384.0;
    pub const GAME_HEIGHT: f32 = 640.0;

    /// Player avatar size and fixed vertical offset
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    pub const PLAYER_INITIAL_Y: f32 = GAME_HEIGHT - PLAYER_HEIGHT - 20.0;

    /// Obstacle size
    pub const OBSTACLE_WIDTH: f32 = 50.0;
    pub const OBSTACLE_HEIGHT: f32 = 20.0;

    /// Obstacle fall speed (pixels per tick)
    pub const INITIAL_OBSTACLE_SPEED: f32 = 2.0;
    /// Added to the fall speed every tick (linear, unbounded)
    pub const OBSTACLE_SPEED_INCREASE: f32 = 0.0005;
    /// Minimum time between spawns (ms)
    pub const OBSTACLE_SPAWN_INTERVAL_MS: f64 = 600.0;

    /// Local fallback storage key
    pub const HIGH_SCORES_KEY: &str = "pixelRusherHighScores";
    /// Leaderboard size
    pub const MAX_HIGH_SCORES: usize = 5;
    /// Longest accepted player name (characters)
    pub const MAX_NAME_LEN: usize = 10;
}

/// Uppercased form used when showing a player name
#[inline]
pub fn display_name(name: &str) -> String {
    name.to_uppercase()
}

/// Case-insensitive player identity comparison
#[inline]
pub fn same_player(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
