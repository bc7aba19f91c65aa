//! High score leaderboard cache
//!
//! A read-mostly snapshot of the top scores, refreshed from the leaderboard
//! gateway after every write. Sorted descending; equal scores keep arrival order.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_HIGH_SCORES;
use crate::{display_name, same_player};

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player name as entered (identity is case-insensitive)
    pub name: String,
    /// Ticks survived
    pub score: u64,
}

impl HighScoreEntry {
    pub fn new(name: impl Into<String>, score: u64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }

    /// Name as shown on the board
    pub fn display_name(&self) -> String {
        display_name(&self.name)
    }
}

/// Ranked snapshot of the best scores
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
    #[serde(skip, default = "default_capacity")]
    capacity: usize,
}

fn default_capacity() -> usize {
    MAX_HIGH_SCORES
}

impl Default for HighScores {
    fn default() -> Self {
        Self::new()
    }
}

impl HighScores {
    /// Empty board with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(MAX_HIGH_SCORES)
    }

    /// Empty leaderboard holding at most `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Rank `entries` (stable) and keep the best `capacity`
    pub fn from_entries(mut entries: Vec<HighScoreEntry>, capacity: usize) -> Self {
        // sort_by is stable, so ties stay in arrival order
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(capacity);
        Self { entries, capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Replace the snapshot with freshly fetched entries
    pub fn replace(&mut self, entries: Vec<HighScoreEntry>) {
        *self = Self::from_entries(entries, self.capacity);
    }

    /// Whether `score` would make the board right now (ties lose to earlier entries)
    pub fn qualifies(&self, score: u64) -> bool {
        self.entries.len() < self.capacity
            || self.entries.last().is_some_and(|last| score > last.score)
    }

    /// Insert after any equal scores and drop whatever falls off the end.
    /// Returns the 1-based rank, or `None` if every slot holds a better score.
    pub fn add_score(&mut self, name: impl Into<String>, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let index = self.entries.partition_point(|e| e.score >= score);
        self.entries.insert(index, HighScoreEntry::new(name, score));
        self.entries.truncate(self.capacity);
        Some(index + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Best score on the board
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Whether the board shows `score` for `player`.
    ///
    /// Matches on exact score and case-insensitive name, so an older entry
    /// with the same score also counts.
    pub fn is_new_high_score(&self, player: &str, score: u64) -> bool {
        !self.entries.is_empty()
            && score > 0
            && self
                .entries
                .iter()
                .any(|e| e.score == score && same_player(&e.name, player))
    }

    /// Distinct player names on the board, display-cased, in board order
    pub fn unique_players(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for entry in &self.entries {
            let name = entry.display_name();
            if !name.is_empty() && !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}
