//! Game settings and preferences
//!
//! Persisted separately from the high scores, then overridden from the
//! environment on native builds.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::persistence::RemoteConfig;
use crate::platform::Storage;

/// Environment variables read by [`Settings::apply_env`]
pub mod env {
    pub const BACKEND: &str = "PIXEL_RUSHER_BACKEND";
    pub const REMOTE_URL: &str = "PIXEL_RUSHER_REMOTE_URL";
    pub const REMOTE_KEY: &str = "PIXEL_RUSHER_REMOTE_KEY";
    pub const DATA_DIR: &str = "PIXEL_RUSHER_DATA_DIR";
    pub const ROUNDS: &str = "PIXEL_RUSHER_ROUNDS";
}

/// Which leaderboard implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Backend {
    /// JSON file in the data directory
    #[default]
    Local,
    /// Hosted PostgREST store
    Remote,
    /// In-process only; scores vanish on exit
    Memory,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Local => "local",
            Backend::Remote => "remote",
            Backend::Memory => "memory",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "local" | "file" => Some(Backend::Local),
            "remote" | "supabase" => Some(Backend::Remote),
            "memory" | "mem" => Some(Backend::Memory),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Leaderboard backend
    pub backend: Backend,
    /// Hosted store URL (remote backend)
    pub remote_url: Option<String>,
    /// Hosted store public key (remote backend)
    pub remote_key: Option<String>,
    /// Where the local backend keeps its files
    pub data_dir: PathBuf,
    /// Player selected last time, offered again on start
    pub last_player: Option<String>,
    /// Sessions the native demo plays before exiting
    pub demo_rounds: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: Backend::Local,
            remote_url: None,
            remote_key: None,
            data_dir: PathBuf::from(".pixel-rusher"),
            last_player: None,
            demo_rounds: 1,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "pixelRusherSettings";

    /// Remote connection details, if both URL and key are set
    pub fn remote_config(&self) -> Option<RemoteConfig> {
        match (&self.remote_url, &self.remote_key) {
            (Some(url), Some(key)) if !url.is_empty() && !key.is_empty() => Some(RemoteConfig {
                base_url: url.clone(),
                api_key: key.clone(),
            }),
            _ => None,
        }
    }

    /// Override fields from environment-style lookups
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup(env::BACKEND) {
            match Backend::from_str(&value) {
                Some(backend) => self.backend = backend,
                None => log::warn!("Ignoring unknown {}={value:?}", env::BACKEND),
            }
        }
        if let Some(url) = lookup(env::REMOTE_URL) {
            self.remote_url = Some(url);
        }
        if let Some(key) = lookup(env::REMOTE_KEY) {
            self.remote_key = Some(key);
        }
        if let Some(dir) = lookup(env::DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(rounds) = lookup(env::ROUNDS) {
            match rounds.trim().parse() {
                Ok(n) => self.demo_rounds = n,
                Err(_) => log::warn!("Ignoring invalid {}={rounds:?}", env::ROUNDS),
            }
        }
    }

    /// Load settings from storage (defaults if missing or unreadable)
    pub fn load(storage: &(impl Storage + ?Sized)) -> Self {
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from storage");
                    return settings;
                }
                Err(e) => log::warn!("Discarding unreadable settings: {e}"),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Could not read settings: {e}"),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to storage (failures are logged, never fatal)
    pub fn save(&self, storage: &(impl Storage + ?Sized)) {
        match serde_json::to_string(self) {
            Ok(json) => match storage.set_item(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Could not save settings: {e}"),
            },
            Err(e) => log::warn!("Could not encode settings: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStorage;
    use std::collections::HashMap;

    #[test]
    fn test_backend_from_str() {
        assert_eq!(Backend::from_str("REMOTE"), Some(Backend::Remote));
        assert_eq!(Backend::from_str(" file "), Some(Backend::Local));
        assert_eq!(Backend::from_str("cloud"), None);
        assert_eq!(Backend::Memory.as_str(), "memory");
    }

    #[test]
    fn test_load_missing_and_corrupt() {
        let storage = MemoryStorage::new();
        assert_eq!(Settings::load(&storage), Settings::default());
        storage.set_item(Settings::STORAGE_KEY, "nope").unwrap();
        assert_eq!(Settings::load(&storage), Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        let settings = Settings {
            last_player: Some("ACE".into()),
            backend: Backend::Memory,
            ..Default::default()
        };
        settings.save(&storage);
        assert_eq!(Settings::load(&storage), settings);
    }

    #[test]
    fn test_apply_env() {
        let vars: HashMap<&str, &str> = [
            (env::BACKEND, "remote"),
            (env::REMOTE_URL, "https://demo.supabase.co"),
            (env::REMOTE_KEY, "anon"),
            (env::ROUNDS, "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings.apply_env(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(settings.backend, Backend::Remote);
        assert_eq!(settings.demo_rounds, 1);
        let remote = settings.remote_config().unwrap();
        assert_eq!(remote.base_url, "https://demo.supabase.co");
        assert_eq!(remote.api_key, "anon");
    }

    #[test]
    fn test_remote_config_needs_both_parts() {
        let settings = Settings {
            remote_url: Some("https://demo.supabase.co".into()),
            ..Default::default()
        };
        assert!(settings.remote_config().is_none());
    }
}
