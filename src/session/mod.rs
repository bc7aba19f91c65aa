//! Session controller
//!
//! The phase machine `MainMenu -> Playing -> GameOver -> MainMenu` plus
//! everything the screens show: selected player, cached leaderboard,
//! submission status and the last error. It owns the game loop while a
//! session is in progress and never talks to the network itself; leaderboard
//! work leaves as a [`ScoreSubmission`] and comes back as a result.

pub mod game_loop;

pub use game_loop::GameLoop;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MAX_HIGH_SCORES, MAX_NAME_LEN};
use crate::highscores::{HighScoreEntry, HighScores};
use crate::persistence::LeaderboardError;
use crate::platform::{FrameHandle, FrameScheduler, PointerTracker, tracker};
use crate::sim::SessionState;
use crate::tuning::SimConfig;

/// Which screen is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    MainMenu,
    Playing,
    GameOver,
}

impl Phase {
    /// Transition table
    pub fn can_transition_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::MainMenu, Phase::Playing)
                | (Phase::Playing, Phase::GameOver)
                | (Phase::GameOver, Phase::MainMenu)
        )
    }
}

/// A player action that is not allowed right now
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionRejected {
    #[error("no player selected")]
    NoPlayer,
    #[error("player name is empty")]
    EmptyName,
    #[error("cannot {action} from {phase:?}")]
    WrongPhase { action: &'static str, phase: Phase },
}

/// Score to record once a session ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSubmission {
    /// Which session produced the score (increasing from 1)
    pub session: u64,
    pub player_name: String,
    pub score: u64,
}

/// Trim and shorten a typed name; `None` if nothing is left
pub fn normalize_name(raw: &str) -> Option<String> {
    let name: String = raw.trim().chars().take(MAX_NAME_LEN).collect();
    let name = name.trim_end();
    (!name.is_empty()).then(|| name.to_string())
}

pub struct SessionController<S: FrameScheduler + Clone> {
    phase: Phase,
    config: SimConfig,
    scheduler: S,
    /// Seeds each session's spawn RNG
    rng: Pcg32,
    player_name: Option<String>,
    game: Option<GameLoop<S>>,
    final_score: u64,
    high_scores: HighScores,
    known_players: Vec<String>,
    /// Number of the last session that reached game over
    sessions_ended: u64,
    /// Session whose submission the game-over screen is waiting on
    awaiting: Option<u64>,
    /// Session that wrote the cached board (0 = initial load)
    board_session: u64,
    error: Option<String>,
}

impl<S: FrameScheduler + Clone> SessionController<S> {
    pub fn new(config: SimConfig, scheduler: S, seed: u64) -> Self {
        Self {
            phase: Phase::MainMenu,
            config,
            scheduler,
            rng: Pcg32::seed_from_u64(seed),
            player_name: None,
            game: None,
            final_score: 0,
            high_scores: HighScores::with_capacity(MAX_HIGH_SCORES),
            known_players: Vec::new(),
            sessions_ended: 0,
            awaiting: None,
            board_session: 0,
            error: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn player_name(&self) -> Option<&str> {
        self.player_name.as_deref()
    }

    /// Score of the last finished session
    pub fn final_score(&self) -> u64 {
        self.final_score
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn known_players(&self) -> &[String] {
        &self.known_players
    }

    /// The last session's score is still being saved ("saving score...")
    pub fn is_submitting(&self) -> bool {
        self.awaiting.is_some()
    }

    /// Inline error banner text
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Live session, while playing
    pub fn session(&self) -> Option<&SessionState> {
        self.game.as_ref().map(|game| game.state())
    }

    /// Whether the cached board shows the just-finished score for this player.
    ///
    /// Any cached entry with the same score and name matches, including an
    /// older one. Always false while the score is still being saved.
    pub fn is_new_high_score(&self) -> bool {
        if self.is_submitting() {
            return false;
        }
        match &self.player_name {
            Some(name) => self.high_scores.is_new_high_score(name, self.final_score),
            None => false,
        }
    }

    fn transition(&mut self, next: Phase) {
        debug_assert!(self.phase.can_transition_to(next));
        log::info!("{:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    fn require(&self, phase: Phase, action: &'static str) -> Result<(), ActionRejected> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(ActionRejected::WrongPhase {
                action,
                phase: self.phase,
            })
        }
    }

    /// Pick (or add) the current player from the main menu
    pub fn select_player(&mut self, name: &str) -> Result<&str, ActionRejected> {
        self.require(Phase::MainMenu, "change player")?;
        let name = normalize_name(name).ok_or(ActionRejected::EmptyName)?;
        Ok(self.player_name.insert(name).as_str())
    }

    /// MainMenu -> Playing. Returns the input tracker for the new session.
    pub fn start_game(&mut self) -> Result<PointerTracker, ActionRejected> {
        self.require(Phase::MainMenu, "start a game")?;
        if self.player_name.is_none() {
            return Err(ActionRejected::NoPlayer);
        }

        let (input, reader) = tracker(&self.config);
        let state = SessionState::new(self.config.clone(), self.rng.random());
        self.game = Some(GameLoop::start(state, reader, self.scheduler.clone()));
        self.final_score = 0;
        self.error = None;
        self.transition(Phase::Playing);
        log::info!(
            "session started for {}",
            self.player_name.as_deref().unwrap_or_default()
        );
        Ok(input)
    }

    /// Deliver a display frame to the running session.
    ///
    /// On the frame that ends the game this moves to GameOver and returns the
    /// score to submit. The submission runs elsewhere; report its outcome
    /// through [`Self::submission_finished`].
    pub fn frame(&mut self, handle: FrameHandle, timestamp: f64) -> Option<ScoreSubmission> {
        if self.phase != Phase::Playing {
            return None;
        }
        let score = self.game.as_mut()?.on_frame(handle, timestamp)?;
        Some(self.game_over(score))
    }

    fn game_over(&mut self, score: u64) -> ScoreSubmission {
        // Dropping the loop cancels anything still scheduled
        self.game = None;
        self.final_score = score;
        self.sessions_ended += 1;
        let session = self.sessions_ended;
        self.awaiting = Some(session);
        self.transition(Phase::GameOver);
        log::info!("game over, final score {score}");
        ScoreSubmission {
            session,
            player_name: self.player_name.clone().unwrap_or_default(),
            score,
        }
    }

    /// GameOver -> MainMenu. Does not wait for a pending submission.
    pub fn back_to_menu(&mut self) -> Result<(), ActionRejected> {
        self.require(Phase::GameOver, "return to the menu")?;
        self.transition(Phase::MainMenu);
        Ok(())
    }

    /// Outcome of the submission for `session`: the top scores fetched after
    /// the write, or why it failed.
    ///
    /// Results may arrive in any order. Only the latest session's result ends
    /// the "submitting" status or touches the error banner, and a board
    /// fetched for an older session never replaces one from a newer session.
    pub fn submission_finished(
        &mut self,
        session: u64,
        result: Result<Vec<HighScoreEntry>, LeaderboardError>,
    ) {
        let current = self.awaiting == Some(session);
        if current {
            self.awaiting = None;
        }
        match result {
            Ok(entries) if session >= self.board_session => {
                self.high_scores.replace(entries);
                self.board_session = session;
                if current {
                    self.error = None;
                }
            }
            Ok(_) => log::debug!(
                "dropping board from session {session}, cache is from {}",
                self.board_session
            ),
            Err(e) => {
                log::warn!("score submission for session {session} failed: {e}");
                if current {
                    self.error = Some(format!("Could not save score. {}", e.user_message()));
                }
            }
        }
    }

    /// Results of the initial leaderboard load, applied independently
    pub fn leaderboard_loaded(
        &mut self,
        scores: Result<Vec<HighScoreEntry>, LeaderboardError>,
        players: Result<Vec<String>, LeaderboardError>,
    ) {
        let mut failures = Vec::new();
        match scores {
            Ok(entries) => {
                log::info!("loaded {} high scores", entries.len());
                self.high_scores.replace(entries);
                self.board_session = self.sessions_ended;
            }
            Err(e) => {
                log::warn!("could not load high scores: {e}");
                failures.push(e);
            }
        }
        match players {
            Ok(names) => self.known_players = names,
            Err(e) => {
                log::warn!("could not load player list: {e}");
                failures.push(e);
            }
        }
        self.error = failures
            .first()
            .map(|e| format!("Could not load the leaderboard. {}", e.user_message()));
    }
}
