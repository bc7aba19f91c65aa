//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of timing and
//! platform dependencies:
//! - One tick per call, driven by the caller's frame timestamps
//! - Spawn randomness comes from a seeded RNG inside the session state
//! - Stable iteration order (spawn order)

pub mod collision;
pub mod rect;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{first_overlap, overlaps};
pub use rect::Rect;
pub use spawner::{maybe_spawn, spawn_column, spawn_due};
pub use state::{Obstacle, SessionState, player_rect};
pub use tick::{TickOutcome, tick};
