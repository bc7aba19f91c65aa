//! Data-driven game balance
//!
//! Every difficulty knob lives in [`SimConfig`]. The defaults are the
//! constants in [`crate::consts`]; tests override individual fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rejected tuning values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} ({value}) does not fit inside the playfield width ({width})")]
    TooWide {
        field: &'static str,
        value: f32,
        width: f32,
    },
}

/// Simulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub playfield_width: f32,
    pub playfield_height: f32,
    pub player_width: f32,
    pub player_height: f32,
    /// Top edge of the player avatar
    pub player_y: f32,
    pub obstacle_width: f32,
    pub obstacle_height: f32,
    /// Fall speed on the first tick, before the first increment
    pub initial_speed: f32,
    /// Added to the fall speed once per tick
    pub speed_increment: f32,
    /// Spawn gate (ms); a spawn needs strictly more than this since the last one
    pub spawn_interval_ms: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            playfield_width: GAME_WIDTH,
            playfield_height: GAME_HEIGHT,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_y: PLAYER_INITIAL_Y,
            obstacle_width: OBSTACLE_WIDTH,
            obstacle_height: OBSTACLE_HEIGHT,
            initial_speed: INITIAL_OBSTACLE_SPEED,
            speed_increment: OBSTACLE_SPEED_INCREASE,
            spawn_interval_ms: OBSTACLE_SPAWN_INTERVAL_MS,
        }
    }
}

impl SimConfig {
    /// Rightmost x the player's left edge may take
    #[inline]
    pub fn max_player_x(&self) -> f32 {
        (self.playfield_width - self.player_width).max(0.0)
    }

    /// Rightmost x an obstacle's left edge may spawn at
    #[inline]
    pub fn max_obstacle_x(&self) -> f32 {
        (self.playfield_width - self.obstacle_width).max(0.0)
    }

    /// Player x when a session starts (horizontally centred)
    #[inline]
    pub fn player_start_x(&self) -> f32 {
        self.max_player_x() / 2.0
    }

    /// Check sizes are positive and entities fit the playfield
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("playfield_width", self.playfield_width),
            ("playfield_height", self.playfield_height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("obstacle_width", self.obstacle_width),
            ("obstacle_height", self.obstacle_height),
        ];
        for (field, value) in positive {
            if value <= 0.0 || !value.is_finite() {
                return Err(ConfigError::NotPositive {
                    field,
                    value: value as f64,
                });
            }
        }
        if self.spawn_interval_ms <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "spawn_interval_ms",
                value: self.spawn_interval_ms,
            });
        }
        for (field, value) in [
            ("player_width", self.player_width),
            ("obstacle_width", self.obstacle_width),
        ] {
            if value > self.playfield_width {
                return Err(ConfigError::TooWide {
                    field,
                    value,
                    width: self.playfield_width,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = SimConfig::default();
        assert_eq!(config.player_y, 580.0);
        assert_eq!(config.player_start_x(), 172.0);
        assert_eq!(config.max_obstacle_x(), 334.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_sizes() {
        let config = SimConfig {
            obstacle_height: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "obstacle_height",
                ..
            })
        ));

        let config = SimConfig {
            player_width: 500.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::TooWide { .. })));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimConfig = serde_json::from_str(r#"{"initial_speed": 400.0}"#).unwrap();
        assert_eq!(config.initial_speed, 400.0);
        assert_eq!(config.playfield_width, GAME_WIDTH);
    }
}
