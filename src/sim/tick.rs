//! Per-frame simulation tick
//!
//! One call advances the session by exactly one frame. Score is a frame
//! counter, so the game runs faster on faster displays.

use super::collision::first_overlap;
use super::rect::Rect;
use super::spawner::maybe_spawn;
use super::state::SessionState;

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// No collision; schedule the next frame
    Continue,
    /// The player hit an obstacle. Reported once per session.
    GameOver { score: u64, obstacle_id: u32 },
    /// Session was already over; nothing changed
    Halted,
}

/// Advance the session by one frame.
///
/// `player` is the avatar rectangle sampled at the start of the frame and
/// `now` the frame timestamp in milliseconds.
pub fn tick(state: &mut SessionState, player: &Rect, now: f64) -> TickOutcome {
    if state.terminal {
        return TickOutcome::Halted;
    }

    state.score += 1;
    state.speed += state.config.speed_increment;

    let speed = state.speed;
    for obstacle in &mut state.obstacles {
        obstacle.rect.pos.y += speed;
    }

    // Drop obstacles whose top edge has left the playfield
    let bottom = state.config.playfield_height;
    state.obstacles.retain(|o| o.rect.pos.y < bottom);

    maybe_spawn(state, now);

    let hit = first_overlap(player, state.obstacles.iter().map(|o| &o.rect));
    if let Some(hit) = hit.map(|index| &state.obstacles[index]) {
        state.terminal = true;
        log::info!(
            "collision with obstacle {} after {} ticks (speed {:.4})",
            hit.id,
            state.score,
            state.speed
        );
        return TickOutcome::GameOver {
            score: state.score,
            obstacle_id: hit.id,
        };
    }

    TickOutcome::Continue
}
