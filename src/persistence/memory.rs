//! In-process leaderboard with the remote schema
//!
//! Keeps `players` and `scores` tables exactly as the hosted store does, so
//! the session layer can be exercised end to end without a network.

use std::cell::{Cell, RefCell};

use super::{LeaderboardError, LeaderboardGateway, distinct_sorted};
use crate::highscores::HighScoreEntry;
use crate::same_player;

/// Row of the `players` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    pub id: u64,
    /// Unique case-insensitively
    pub name: String,
    pub created_at: u64,
}

/// Row of the `scores` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRecord {
    pub id: u64,
    pub player_id: u64,
    pub score: u64,
    pub created_at: u64,
}

#[derive(Debug, Default)]
struct Tables {
    players: Vec<PlayerRecord>,
    scores: Vec<ScoreRecord>,
    /// Logical clock for `created_at`
    clock: u64,
}

impl Tables {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }
}

#[derive(Debug, Default)]
pub struct MemoryLeaderboard {
    tables: RefCell<Tables>,
    offline: Cell<bool>,
}

impl MemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with [`LeaderboardError::Unavailable`]
    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    pub fn players(&self) -> Vec<PlayerRecord> {
        self.tables.borrow().players.clone()
    }

    pub fn scores(&self) -> Vec<ScoreRecord> {
        self.tables.borrow().scores.clone()
    }

    fn check_online(&self) -> Result<(), LeaderboardError> {
        if self.offline.get() {
            Err(LeaderboardError::Unavailable)
        } else {
            Ok(())
        }
    }
}

impl LeaderboardGateway for MemoryLeaderboard {
    async fn submit_score(&self, player_name: &str, score: u64) -> Result<(), LeaderboardError> {
        self.check_online()?;
        let mut tables = self.tables.borrow_mut();

        let existing = tables
            .players
            .iter()
            .find(|p| same_player(&p.name, player_name))
            .map(|p| p.id);
        let player_id = match existing {
            Some(id) => id,
            None => {
                let id = tables.players.len() as u64 + 1;
                let created_at = tables.tick();
                tables.players.push(PlayerRecord {
                    id,
                    name: player_name.to_string(),
                    created_at,
                });
                log::info!("created player {player_name:?} (id {id})");
                id
            }
        };

        let id = tables.scores.len() as u64 + 1;
        let created_at = tables.tick();
        tables.scores.push(ScoreRecord {
            id,
            player_id,
            score,
            created_at,
        });
        Ok(())
    }

    async fn fetch_top_scores(
        &self,
        limit: usize,
    ) -> Result<Vec<HighScoreEntry>, LeaderboardError> {
        self.check_online()?;
        let tables = self.tables.borrow();

        let mut rows: Vec<&ScoreRecord> = tables.scores.iter().collect();
        // Stable: equal scores stay in insertion order
        rows.sort_by(|a, b| b.score.cmp(&a.score));

        Ok(rows
            .into_iter()
            .take(limit)
            .filter_map(|row| {
                tables
                    .players
                    .iter()
                    .find(|p| p.id == row.player_id)
                    .map(|p| HighScoreEntry::new(p.name.clone(), row.score))
            })
            .collect())
    }

    async fn fetch_all_player_names(&self) -> Result<Vec<String>, LeaderboardError> {
        self.check_online()?;
        let tables = self.tables.borrow();
        Ok(distinct_sorted(tables.players.iter().map(|p| p.name.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fresh_player_is_created() {
        let board = MemoryLeaderboard::new();
        board.submit_score("veteran", 500).await.unwrap();
        assert!(board.players().iter().all(|p| p.name != "rookie"));

        board.submit_score("rookie", 300).await.unwrap();

        let rookie = board
            .players()
            .into_iter()
            .find(|p| p.name == "rookie")
            .unwrap();
        let scores = board.scores();
        let last = scores.last().unwrap();
        assert_eq!(last.player_id, rookie.id);
        assert_eq!(last.score, 300);

        let top = board.fetch_top_scores(5).await.unwrap();
        assert!(top.contains(&HighScoreEntry::new("rookie", 300)));
    }

    #[tokio::test]
    async fn test_identity_is_case_insensitive() {
        let board = MemoryLeaderboard::new();
        board.submit_score("Mia", 10).await.unwrap();
        board.submit_score("MIA", 20).await.unwrap();
        assert_eq!(board.players().len(), 1);
        assert_eq!(board.scores().len(), 2);
        assert!(board.scores().iter().all(|s| s.player_id == 1));
    }

    #[tokio::test]
    async fn test_top_scores_ordering_and_limit() {
        let board = MemoryLeaderboard::new();
        for (name, score) in [("a", 10), ("b", 30), ("c", 30), ("d", 20)] {
            board.submit_score(name, score).await.unwrap();
        }
        let top = board.fetch_top_scores(3).await.unwrap();
        assert_eq!(
            top,
            vec![
                HighScoreEntry::new("b", 30),
                HighScoreEntry::new("c", 30),
                HighScoreEntry::new("d", 20),
            ]
        );
    }

    #[tokio::test]
    async fn test_resubmission_duplicates() {
        let board = MemoryLeaderboard::new();
        board.submit_score("a", 10).await.unwrap();
        board.submit_score("a", 10).await.unwrap();
        assert_eq!(board.fetch_top_scores(5).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_offline_fails_every_call() {
        let board = MemoryLeaderboard::new();
        board.set_offline(true);
        assert!(matches!(
            board.submit_score("a", 1).await,
            Err(LeaderboardError::Unavailable)
        ));
        assert!(board.fetch_top_scores(5).await.is_err());
        assert!(board.fetch_all_player_names().await.is_err());
        assert!(board.scores().is_empty());
    }
}
