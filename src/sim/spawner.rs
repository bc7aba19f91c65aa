//! Time-gated obstacle spawning

use rand::Rng;

use super::state::SessionState;

/// True once strictly more than `interval_ms` has passed since the last spawn
#[inline]
pub fn spawn_due(elapsed_ms: f64, interval_ms: f64) -> bool {
    elapsed_ms > interval_ms
}

/// Uniform column in `[0, max_x)`
#[inline]
pub fn spawn_column<R: Rng + ?Sized>(rng: &mut R, max_x: f32) -> f32 {
    rng.random::<f32>() * max_x
}

/// Spawn at most one obstacle for this tick.
///
/// The first call only starts the spawn timer. Returns the new obstacle's ID.
pub fn maybe_spawn(state: &mut SessionState, now: f64) -> Option<u32> {
    let last = *state.last_spawn.get_or_insert(now);
    if !spawn_due(now - last, state.config.spawn_interval_ms) {
        return None;
    }
    state.last_spawn = Some(now);

    let x = spawn_column(&mut state.rng, state.config.max_obstacle_x());
    // One obstacle height above the visible top edge
    let y = -state.config.obstacle_height;
    let id = state.push_obstacle(x, y);
    log::debug!("spawned obstacle {id} at x={x:.1} (t={now:.0})");
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::SimConfig;

    #[test]
    fn test_first_call_starts_timer() {
        let mut state = SessionState::new(SimConfig::default(), 1);
        assert_eq!(maybe_spawn(&mut state, 5000.0), None);
        assert_eq!(state.last_spawn, Some(5000.0));
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_interval_is_strict() {
        let mut state = SessionState::new(SimConfig::default(), 1);
        maybe_spawn(&mut state, 0.0);
        assert_eq!(maybe_spawn(&mut state, 600.0), None);
        assert!(maybe_spawn(&mut state, 600.5).is_some());
        assert_eq!(state.last_spawn, Some(600.5));
        assert_eq!(state.obstacles.len(), 1);

        // Timer was reset to the spawn time
        assert_eq!(maybe_spawn(&mut state, 1000.0), None);
        assert!(maybe_spawn(&mut state, 1201.0).is_some());
        assert_eq!(state.obstacles.len(), 2);
    }

    #[test]
    fn test_spawn_placement() {
        let mut state = SessionState::new(SimConfig::default(), 42);
        maybe_spawn(&mut state, 0.0);
        for i in 1..=200 {
            maybe_spawn(&mut state, i as f64 * 601.0);
        }
        assert_eq!(state.obstacles.len(), 200);
        for obstacle in &state.obstacles {
            assert!(obstacle.rect.pos.x >= 0.0);
            assert!(obstacle.rect.pos.x < 334.0);
            assert_eq!(obstacle.rect.pos.y, -20.0);
            assert_eq!(obstacle.rect.size.x, 50.0);
        }
    }

    #[test]
    fn test_same_seed_same_columns() {
        let mut a = SessionState::new(SimConfig::default(), 99);
        let mut b = SessionState::new(SimConfig::default(), 99);
        for t in [0.0, 700.0, 1400.0, 2100.0] {
            maybe_spawn(&mut a, t);
            maybe_spawn(&mut b, t);
        }
        assert_eq!(a.obstacles, b.obstacles);
    }
}
