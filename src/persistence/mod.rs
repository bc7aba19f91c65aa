//! Leaderboard persistence
//!
//! One interface, several backends:
//! - `remote`: PostgREST (Supabase) over HTTP, players + scores tables
//! - `local`: single JSON list in a key-value store (offline fallback)
//! - `memory`: in-process relational store with the remote schema
//!
//! The session layer only ever talks to [`LeaderboardGateway`].

pub mod local;
pub mod memory;
pub mod remote;

pub use local::LocalLeaderboard;
pub use memory::MemoryLeaderboard;
pub use remote::{RemoteConfig, RemoteLeaderboard};

use thiserror::Error;

use crate::highscores::HighScoreEntry;
use crate::platform::{FileStorage, StorageError};

/// Leaderboard failures. All of them are recoverable.
#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("network request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("leaderboard service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("malformed leaderboard data: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("leaderboard unavailable")]
    Unavailable,
}

impl LeaderboardError {
    /// Short text for the inline error banner
    pub fn user_message(&self) -> &'static str {
        match self {
            LeaderboardError::Http(_) | LeaderboardError::Unavailable => {
                "Could not reach the leaderboard. Check your connection."
            }
            LeaderboardError::Status { .. } | LeaderboardError::Decode(_) => {
                "The leaderboard returned an unexpected response."
            }
            LeaderboardError::Storage(_) => "Could not access local score storage.",
        }
    }
}

/// Where scores are recorded and ranked.
///
/// `submit_score` is not idempotent: retrying after a reported failure may
/// record the score twice.
#[allow(async_fn_in_trait)]
pub trait LeaderboardGateway {
    /// Record `score` for `player_name`, creating the player if needed
    async fn submit_score(&self, player_name: &str, score: u64) -> Result<(), LeaderboardError>;

    /// At most `limit` entries, best first; ties in arrival order
    async fn fetch_top_scores(&self, limit: usize)
    -> Result<Vec<HighScoreEntry>, LeaderboardError>;

    /// Every known player, distinct, ascending
    async fn fetch_all_player_names(&self) -> Result<Vec<String>, LeaderboardError>;
}

/// Backend chosen at runtime from [`crate::Settings`]
#[derive(Debug)]
pub enum AnyLeaderboard {
    Local(LocalLeaderboard<FileStorage>),
    Remote(RemoteLeaderboard),
    Memory(MemoryLeaderboard),
}

impl LeaderboardGateway for AnyLeaderboard {
    async fn submit_score(&self, player_name: &str, score: u64) -> Result<(), LeaderboardError> {
        match self {
            AnyLeaderboard::Local(board) => board.submit_score(player_name, score).await,
            AnyLeaderboard::Remote(board) => board.submit_score(player_name, score).await,
            AnyLeaderboard::Memory(board) => board.submit_score(player_name, score).await,
        }
    }

    async fn fetch_top_scores(
        &self,
        limit: usize,
    ) -> Result<Vec<HighScoreEntry>, LeaderboardError> {
        match self {
            AnyLeaderboard::Local(board) => board.fetch_top_scores(limit).await,
            AnyLeaderboard::Remote(board) => board.fetch_top_scores(limit).await,
            AnyLeaderboard::Memory(board) => board.fetch_top_scores(limit).await,
        }
    }

    async fn fetch_all_player_names(&self) -> Result<Vec<String>, LeaderboardError> {
        match self {
            AnyLeaderboard::Local(board) => board.fetch_all_player_names().await,
            AnyLeaderboard::Remote(board) => board.fetch_all_player_names().await,
            AnyLeaderboard::Memory(board) => board.fetch_all_player_names().await,
        }
    }
}

/// Sort names case-insensitively and drop case-insensitive duplicates,
/// keeping the first spelling seen
pub(crate) fn distinct_sorted(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut names: Vec<String> = names.into_iter().filter(|n| !n.is_empty()).collect();
    names.sort_by_key(|n| n.to_lowercase());
    names.dedup_by(|a, b| crate::same_player(a, b));
    names
}
