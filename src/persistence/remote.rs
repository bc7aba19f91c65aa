//! Hosted leaderboard over the PostgREST API (Supabase)
//!
//! Schema:
//! - `players(id, name, created_at)`, name unique case-insensitively
//! - `scores(id, player_id -> players.id, score, created_at)`

use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{LeaderboardError, LeaderboardGateway, distinct_sorted};
use crate::highscores::HighScoreEntry;
use crate::same_player;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection details for the hosted store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Project URL, e.g. `https://<project>.supabase.co`
    pub base_url: String,
    /// Public (anon) API key
    pub api_key: String,
}

impl RemoteConfig {
    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct PlayerRow {
    id: u64,
    name: String,
}

#[derive(Debug, Serialize)]
struct NewPlayer<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct NewScore {
    player_id: u64,
    score: u64,
}

#[derive(Debug, Deserialize)]
struct NameRow {
    name: String,
}

/// `scores` row with the embedded player name
#[derive(Debug, Deserialize)]
struct ScoreRow {
    score: u64,
    players: Option<NameRow>,
}

pub struct RemoteLeaderboard {
    client: reqwest::Client,
    config: RemoteConfig,
}

impl std::fmt::Debug for RemoteLeaderboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteLeaderboard")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl RemoteLeaderboard {
    pub fn new(config: RemoteConfig) -> Result<Self, LeaderboardError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pixel-rusher/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, config })
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, self.config.table_url(table))
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    /// Send and return the body of a 2xx response
    async fn send(&self, request: RequestBuilder) -> Result<String, LeaderboardError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(LeaderboardError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, LeaderboardError> {
        let body = self.send(request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn find_player(&self, name: &str) -> Result<Option<u64>, LeaderboardError> {
        let request = self
            .request(Method::GET, "players")
            .query(&[("select", "id,name".to_string()), ("name", ilike_filter(name))]);
        let rows: Vec<PlayerRow> = self.send_json(request).await?;
        Ok(pick_player(rows, name))
    }

    async fn create_player(&self, name: &str) -> Result<u64, LeaderboardError> {
        let request = self
            .request(Method::POST, "players")
            .header("Prefer", "return=representation")
            .json(&[NewPlayer { name }]);
        match self.send_json::<Vec<PlayerRow>>(request).await {
            Ok(rows) => rows
                .into_iter()
                .next()
                .map(|row| row.id)
                .ok_or_else(|| LeaderboardError::Status {
                    status: 201,
                    body: "insert returned no player row".to_string(),
                }),
            // Someone registered the same name first
            Err(LeaderboardError::Status { status: 409, .. }) => self
                .find_player(name)
                .await?
                .ok_or(LeaderboardError::Unavailable),
            Err(e) => Err(e),
        }
    }
}

impl LeaderboardGateway for RemoteLeaderboard {
    async fn submit_score(&self, player_name: &str, score: u64) -> Result<(), LeaderboardError> {
        let player_id = match self.find_player(player_name).await? {
            Some(id) => id,
            None => {
                let id = self.create_player(player_name).await?;
                log::info!("registered player {player_name:?} (id {id})");
                id
            }
        };

        let request = self
            .request(Method::POST, "scores")
            .header("Prefer", "return=minimal")
            .json(&NewScore { player_id, score });
        self.send(request).await?;
        Ok(())
    }

    async fn fetch_top_scores(
        &self,
        limit: usize,
    ) -> Result<Vec<HighScoreEntry>, LeaderboardError> {
        let request = self.request(Method::GET, "scores").query(&[
            ("select", "score,players(name)".to_string()),
            ("order", "score.desc,id.asc".to_string()),
            ("limit", limit.to_string()),
        ]);
        let rows: Vec<ScoreRow> = self.send_json(request).await?;
        Ok(score_entries(rows))
    }

    async fn fetch_all_player_names(&self) -> Result<Vec<String>, LeaderboardError> {
        let request = self
            .request(Method::GET, "players")
            .query(&[("select", "name"), ("order", "name.asc")]);
        let rows: Vec<NameRow> = self.send_json(request).await?;
        Ok(distinct_sorted(rows.into_iter().map(|r| r.name)))
    }
}

/// Case-insensitive equality filter; LIKE wildcards in the name are escaped
fn ilike_filter(name: &str) -> String {
    let mut pattern = String::with_capacity(name.len() + 6);
    pattern.push_str("ilike.");
    for c in name.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern
}

/// The filter may over-match (`*` is a wildcard to PostgREST), so confirm
fn pick_player(rows: Vec<PlayerRow>, name: &str) -> Option<u64> {
    rows.into_iter()
        .find(|row| same_player(&row.name, name))
        .map(|row| row.id)
}

fn score_entries(rows: Vec<ScoreRow>) -> Vec<HighScoreEntry> {
    rows.into_iter()
        .filter_map(|row| {
            row.players
                .map(|player| HighScoreEntry::new(player.name, row.score))
        })
        .collect()
}
