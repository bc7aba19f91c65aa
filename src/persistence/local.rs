//! Offline leaderboard kept in a key-value store
//!
//! The whole board is one JSON array of `{name, score}` under a fixed key,
//! ranked and capped, and overwritten wholesale on every update. Unparsable
//! data is logged and treated as an empty board.

use super::{LeaderboardError, LeaderboardGateway, distinct_sorted};
use crate::consts::{HIGH_SCORES_KEY, MAX_HIGH_SCORES};
use crate::highscores::{HighScoreEntry, HighScores};
use crate::platform::Storage;

#[derive(Debug)]
pub struct LocalLeaderboard<S> {
    storage: S,
    key: String,
    capacity: usize,
}

impl<S: Storage> LocalLeaderboard<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            key: HIGH_SCORES_KEY.to_string(),
            capacity: MAX_HIGH_SCORES,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Current board; missing or corrupt data reads as empty
    pub fn load(&self) -> Result<HighScores, LeaderboardError> {
        let Some(json) = self.storage.get_item(&self.key)? else {
            log::info!("No high scores found, starting fresh");
            return Ok(HighScores::with_capacity(self.capacity));
        };

        match serde_json::from_str::<Vec<HighScoreEntry>>(&json) {
            Ok(entries) => {
                log::info!("Loaded {} high scores", entries.len());
                Ok(HighScores::from_entries(entries, self.capacity))
            }
            Err(e) => {
                log::warn!("Discarding unreadable high scores under {:?}: {e}", self.key);
                Ok(HighScores::with_capacity(self.capacity))
            }
        }
    }

    /// Rank `entries`, keep the top of the board and overwrite storage
    pub fn save(&self, entries: Vec<HighScoreEntry>) -> Result<HighScores, LeaderboardError> {
        let scores = HighScores::from_entries(entries, self.capacity);
        let json = serde_json::to_string(&scores.entries)?;
        self.storage.set_item(&self.key, &json)?;
        log::info!("High scores saved ({} entries)", scores.len());
        Ok(scores)
    }
}

impl<S: Storage> LeaderboardGateway for LocalLeaderboard<S> {
    async fn submit_score(&self, player_name: &str, score: u64) -> Result<(), LeaderboardError> {
        let mut board = self.load()?;
        match board.add_score(player_name, score) {
            Some(rank) => {
                log::info!("{player_name} placed #{rank} with {score}");
                self.save(board.entries)?;
            }
            None => log::info!("score {score} did not make the local board"),
        }
        Ok(())
    }

    async fn fetch_top_scores(
        &self,
        limit: usize,
    ) -> Result<Vec<HighScoreEntry>, LeaderboardError> {
        let mut entries = self.load()?.entries;
        entries.truncate(limit);
        Ok(entries)
    }

    async fn fetch_all_player_names(&self) -> Result<Vec<String>, LeaderboardError> {
        // Only players still on the board are known locally
        let scores = self.load()?;
        Ok(distinct_sorted(scores.unique_players()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStorage;

    #[tokio::test]
    async fn test_invalid_json_loads_empty() {
        let storage = MemoryStorage::new();
        storage.set_item(HIGH_SCORES_KEY, "{not json").unwrap();
        let board = LocalLeaderboard::new(storage);

        assert!(board.load().unwrap().is_empty());
        assert!(board.fetch_top_scores(5).await.unwrap().is_empty());

        // Next write replaces the corrupt value
        board.submit_score("amy", 12).await.unwrap();
        assert_eq!(
            board.fetch_top_scores(5).await.unwrap(),
            vec![HighScoreEntry::new("amy", 12)]
        );
    }

    #[tokio::test]
    async fn test_board_is_capped_and_ranked() {
        let board = LocalLeaderboard::new(MemoryStorage::new());
        for (name, score) in [("a", 5), ("b", 50), ("c", 20), ("d", 50), ("e", 1), ("f", 30)] {
            board.submit_score(name, score).await.unwrap();
        }
        let top = board.fetch_top_scores(10).await.unwrap();
        let names: Vec<_> = top.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "d", "f", "c", "a"]);

        let stored = board.storage().get_item(HIGH_SCORES_KEY).unwrap().unwrap();
        let raw: Vec<HighScoreEntry> = serde_json::from_str(&stored).unwrap();
        assert_eq!(raw.len(), MAX_HIGH_SCORES);

        assert_eq!(board.fetch_top_scores(2).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_player_names_from_board() {
        let board = LocalLeaderboard::new(MemoryStorage::new());
        board.submit_score("zoe", 3).await.unwrap();
        board.submit_score("Adam", 9).await.unwrap();
        board.submit_score("ZOE", 7).await.unwrap();
        assert_eq!(
            board.fetch_all_player_names().await.unwrap(),
            vec!["ADAM", "ZOE"]
        );
    }

    #[test]
    fn test_unsorted_storage_is_ranked_on_load() {
        let storage = MemoryStorage::new();
        storage
            .set_item(
                HIGH_SCORES_KEY,
                r#"[{"name":"x","score":1},{"name":"y","score":9}]"#,
            )
            .unwrap();
        let board = LocalLeaderboard::new(storage);
        assert_eq!(board.load().unwrap().top_score(), Some(9));
    }
}
