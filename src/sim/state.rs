//! Session state and entity types
//!
//! A [`SessionState`] is everything one play-through mutates. It is owned by
//! whoever drives [`super::tick`] and is passed in explicitly every frame.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::rect::Rect;
use crate::tuning::SimConfig;

/// A falling obstacle
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    /// Unique within a session, increasing in spawn order
    pub id: u32,
    pub rect: Rect,
}

/// Build the player rectangle for a given horizontal position
#[inline]
pub fn player_rect(config: &SimConfig, x: f32) -> Rect {
    Rect::new(x, config.player_y, config.player_width, config.player_height)
}

/// Per-session simulation state
#[derive(Debug, Clone)]
pub struct SessionState {
    pub config: SimConfig,
    /// Ticks survived
    pub score: u64,
    /// Current fall speed (pixels per tick)
    pub speed: f32,
    /// Timestamp (ms) of the last spawn; set on the first tick
    pub last_spawn: Option<f64>,
    /// Active obstacles (iteration order is spawn order)
    pub obstacles: Vec<Obstacle>,
    /// Set once a collision ends the session
    pub terminal: bool,
    /// Spawn column RNG
    pub rng: Pcg32,
    next_id: u32,
}

impl SessionState {
    /// Create a fresh session with the given spawn seed
    pub fn new(config: SimConfig, seed: u64) -> Self {
        Self {
            speed: config.initial_speed,
            config,
            score: 0,
            last_spawn: None,
            obstacles: Vec::new(),
            terminal: false,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new obstacle ID
    pub fn next_obstacle_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place an obstacle directly (scenario setup, replays)
    pub fn push_obstacle(&mut self, x: f32, y: f32) -> u32 {
        let id = self.next_obstacle_id();
        self.obstacles.push(Obstacle {
            id,
            rect: Rect::new(x, y, self.config.obstacle_width, self.config.obstacle_height),
        });
        id
    }

    /// Player rectangle at the start position
    pub fn start_player(&self) -> Rect {
        player_rect(&self.config, self.config.player_start_x())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let state = SessionState::new(SimConfig::default(), 7);
        assert_eq!(state.score, 0);
        assert_eq!(state.speed, 2.0);
        assert!(state.last_spawn.is_none());
        assert!(state.obstacles.is_empty());
        assert!(!state.terminal);
        assert_eq!(state.start_player(), Rect::new(172.0, 580.0, 40.0, 40.0));
    }

    #[test]
    fn test_obstacle_ids_are_monotonic() {
        let mut state = SessionState::new(SimConfig::default(), 7);
        let a = state.push_obstacle(0.0, -20.0);
        let b = state.push_obstacle(10.0, -20.0);
        assert!(b > a);
        assert_eq!(state.obstacles[1].rect.size.x, 50.0);
    }
}
