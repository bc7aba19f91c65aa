//! Cooperative app driver
//!
//! Ties a [`SessionController`] to a [`LeaderboardGateway`] on one thread.
//! Frames run synchronously. Score submissions are futures owned by the app
//! and polled without blocking at the start of every frame, so a tick never
//! waits on the network and no task spawner is needed. The remote backend
//! still needs a tokio runtime context for its I/O.

use std::rc::Rc;

use futures::FutureExt;
use futures::StreamExt;
use futures::future::LocalBoxFuture;
use futures::stream::FuturesUnordered;

use crate::highscores::HighScoreEntry;
use crate::persistence::{LeaderboardError, LeaderboardGateway};
use crate::platform::{FrameQueue, PointerTracker, Storage};
use crate::session::{ActionRejected, Phase, ScoreSubmission, SessionController};
use crate::settings::Settings;
use crate::tuning::SimConfig;

/// Session number and the board fetched after its write
type SubmissionResult = (u64, Result<Vec<HighScoreEntry>, LeaderboardError>);

/// Remembers the selected player across runs
struct Preferences {
    settings: Settings,
    storage: Box<dyn Storage>,
}

pub struct App<G: LeaderboardGateway + 'static> {
    controller: SessionController<FrameQueue>,
    frames: FrameQueue,
    gateway: Rc<G>,
    input: Option<PointerTracker>,
    submissions: FuturesUnordered<LocalBoxFuture<'static, SubmissionResult>>,
    preferences: Option<Preferences>,
}

impl<G: LeaderboardGateway + 'static> App<G> {
    pub fn new(gateway: G, config: SimConfig, seed: u64) -> Self {
        let frames = FrameQueue::new();
        Self {
            controller: SessionController::new(config, frames.clone(), seed),
            frames,
            gateway: Rc::new(gateway),
            input: None,
            submissions: FuturesUnordered::new(),
            preferences: None,
        }
    }

    /// Restore the last player from `settings` and persist later choices
    pub fn with_preferences(mut self, settings: Settings, storage: Box<dyn Storage>) -> Self {
        if let Some(name) = settings.last_player.as_deref() {
            if let Err(e) = self.controller.select_player(name) {
                log::warn!("Ignoring saved player {name:?}: {e}");
            }
        }
        self.preferences = Some(Preferences { settings, storage });
        self
    }

    pub fn controller(&self) -> &SessionController<FrameQueue> {
        &self.controller
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    /// Fetch top scores and player names concurrently; each result is
    /// applied on its own
    pub async fn load(&mut self) {
        let limit = self.controller.high_scores().capacity();
        let (scores, players) = futures::join!(
            self.gateway.fetch_top_scores(limit),
            self.gateway.fetch_all_player_names()
        );
        self.controller.leaderboard_loaded(scores, players);
    }

    pub fn select_player(&mut self, name: &str) -> Result<(), ActionRejected> {
        let name = self.controller.select_player(name)?.to_string();
        if let Some(prefs) = self.preferences.as_mut() {
            prefs.settings.last_player = Some(name);
            prefs.settings.save(prefs.storage.as_ref());
        }
        Ok(())
    }

    pub fn start_game(&mut self) -> Result<(), ActionRejected> {
        self.input = Some(self.controller.start_game()?);
        Ok(())
    }

    /// Pointer moved over the playfield (ignored outside a session)
    pub fn pointer_moved(&self, client_x: f32, area_left: f32) {
        if let Some(input) = &self.input {
            input.pointer_moved(client_x, area_left);
        }
    }

    /// Touch moved over the playfield (ignored outside a session)
    pub fn touch_moved(&self, touches: &[f32], area_left: f32) {
        if let Some(input) = &self.input {
            input.touch_moved(touches, area_left);
        }
    }

    /// One display frame at `timestamp` (ms)
    pub fn frame(&mut self, timestamp: f64) {
        self.poll_submissions();
        for handle in self.frames.take_due() {
            if let Some(submission) = self.controller.frame(handle, timestamp) {
                self.input = None;
                self.spawn_submission(submission);
            }
        }
    }

    pub fn back_to_menu(&mut self) -> Result<(), ActionRejected> {
        self.controller.back_to_menu()
    }

    /// Submissions not yet finished, including ones from earlier sessions
    pub fn pending_submissions(&self) -> usize {
        self.submissions.len()
    }

    /// Wait until the latest session's submission (if any) reports back.
    /// Results from earlier sessions arriving meanwhile are applied too.
    pub async fn wait_for_submission(&mut self) {
        while self.controller.is_submitting() {
            match self.submissions.next().await {
                Some((session, result)) => self.controller.submission_finished(session, result),
                None => break,
            }
        }
    }

    /// Apply every submission that can finish without waiting
    fn poll_submissions(&mut self) {
        while let Some(Some((session, result))) = self.submissions.next().now_or_never() {
            self.controller.submission_finished(session, result);
        }
    }

    fn spawn_submission(&mut self, submission: ScoreSubmission) {
        let gateway = Rc::clone(&self.gateway);
        let limit = self.controller.high_scores().capacity();
        let ScoreSubmission {
            session,
            player_name,
            score,
        } = submission;
        let task = async move {
            let result = match gateway.submit_score(&player_name, score).await {
                Ok(()) => {
                    log::info!("saved score {score} for {player_name}");
                    gateway.fetch_top_scores(limit).await
                }
                Err(e) => Err(e),
            };
            (session, result)
        };
        self.submissions.push(task.boxed_local());
    }
}
