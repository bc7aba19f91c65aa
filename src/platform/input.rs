//! Pointer and touch input tracking
//!
//! Input events and simulation frames arrive at unrelated rates. The tracker
//! keeps only the latest clamped player x in a single atomic slot; the
//! simulation samples it once at the start of each tick. Last write wins.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::sim::{Rect, player_rect};
use crate::tuning::SimConfig;

/// Create a writer/reader pair with the player centred
pub fn tracker(config: &SimConfig) -> (PointerTracker, PlayerReader) {
    let slot = Arc::new(AtomicU32::new(config.player_start_x().to_bits()));
    (
        PointerTracker {
            slot: Arc::clone(&slot),
            player_width: config.player_width,
            max_x: config.max_player_x(),
        },
        PlayerReader {
            slot,
            config: config.clone(),
        },
    )
}

/// The only writer of the player position (not `Clone`)
#[derive(Debug)]
pub struct PointerTracker {
    slot: Arc<AtomicU32>,
    player_width: f32,
    max_x: f32,
}

impl PointerTracker {
    /// Pointer moved to `client_x`; `area_left` is the playfield's left edge
    /// in the same coordinate space. Returns the stored player x.
    pub fn pointer_moved(&self, client_x: f32, area_left: f32) -> f32 {
        let local_x = client_x - area_left;
        let x = (local_x - self.player_width / 2.0).min(self.max_x).max(0.0);
        self.slot.store(x.to_bits(), Ordering::Release);
        x
    }

    /// Touch moved; only the first touch point steers
    pub fn touch_moved(&self, touches: &[f32], area_left: f32) -> Option<f32> {
        touches
            .first()
            .map(|&client_x| self.pointer_moved(client_x, area_left))
    }
}

/// Read side of the player position slot
#[derive(Debug, Clone)]
pub struct PlayerReader {
    slot: Arc<AtomicU32>,
    config: SimConfig,
}

impl PlayerReader {
    /// Latest committed player x
    pub fn x(&self) -> f32 {
        f32::from_bits(self.slot.load(Ordering::Acquire))
    }

    /// Player rectangle as of now
    pub fn sample(&self) -> Rect {
        player_rect(&self.config, self.x())
    }
}
