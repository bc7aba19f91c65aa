//! Game loop lifecycle
//!
//! Couples one [`SessionState`] to a frame scheduler. Exactly one frame is
//! outstanding while the loop runs; a frame whose handle is not the
//! outstanding one (cancelled or stale) is ignored. Stopping or dropping the
//! loop cancels the outstanding frame.

use crate::platform::{FrameHandle, FrameScheduler, PlayerReader};
use crate::sim::{SessionState, TickOutcome, tick};

pub struct GameLoop<S: FrameScheduler> {
    state: SessionState,
    player: PlayerReader,
    scheduler: S,
    pending: Option<FrameHandle>,
}

impl<S: FrameScheduler> GameLoop<S> {
    /// Take ownership of a fresh session and request the first frame
    pub fn start(state: SessionState, player: PlayerReader, mut scheduler: S) -> Self {
        let pending = Some(scheduler.request_frame());
        Self {
            state,
            player,
            scheduler,
            pending,
        }
    }

    /// Deliver a frame. Returns the final score on the frame that ends the game.
    pub fn on_frame(&mut self, handle: FrameHandle, timestamp: f64) -> Option<u64> {
        if self.pending != Some(handle) {
            log::debug!("ignoring frame {} (not outstanding)", handle.id());
            return None;
        }
        self.pending = None;

        let player = self.player.sample();
        match tick(&mut self.state, &player, timestamp) {
            TickOutcome::Continue => {
                self.pending = Some(self.scheduler.request_frame());
                None
            }
            TickOutcome::GameOver { score, .. } => Some(score),
            TickOutcome::Halted => None,
        }
    }

    /// Cancel the outstanding frame; no tick runs after this
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }
}

impl<S: FrameScheduler> Drop for GameLoop<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
