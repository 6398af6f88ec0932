use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const SETTINGS_FILE: &str = "settings.json";

const DEFAULT_LISTING_URL: &str = "https://www.pushsquare.com/guides/all-playstation-now-games";
const DEFAULT_COOP_URL: &str = "https://www.co-optimus.com/ajax/ajax_games.php?game-title-filter=&system=22&countDirection=at%20least&playerCount=2&sort=&sortDirection=";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub igdb_client_id: String,
    pub igdb_access_token: String,
    pub listing_url: String,
    pub coop_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            igdb_client_id: String::new(),
            igdb_access_token: String::new(),
            listing_url: DEFAULT_LISTING_URL.to_string(),
            coop_url: DEFAULT_COOP_URL.to_string(),
        }
    }
}

impl Settings {
    /// Writes the defaults first when the file is missing. Env credentials win.
    pub fn load_or_bootstrap(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(SETTINGS_FILE);
        if !path.exists() {
            let defaults = serde_json::to_string_pretty(&Settings::default())?;
            fs::write(&path, defaults).with_context(|| {
                format!("Failed to write default settings to {}", path.display())
            })?;
            info!("Wrote default settings to {}", path.display());
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut settings: Settings = serde_json::from_str(&text)
            .with_context(|| format!("{} is not valid settings JSON", path.display()))?;
        settings.apply_env();
        Ok(settings)
    }

    fn apply_env(&mut self) {
        if let Some(id) = non_empty_var("IGDB_CLIENT_ID") {
            self.igdb_client_id = id;
        }
        if let Some(token) = non_empty_var("IGDB_ACCESS_TOKEN") {
            self.igdb_access_token = token;
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone)]
pub struct DataPaths {
    pub titles: PathBuf,
    pub until_dates: PathBuf,
    pub metadata: PathBuf,
    pub couch_coop: PathBuf,
    pub splitscreen_coop: PathBuf,
}

impl DataPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            titles: dir.join("allnowgames.txt"),
            until_dates: dir.join("allnowgames.until.json"),
            metadata: dir.join("gamedb.json"),
            couch_coop: dir.join("couchgames.json"),
            splitscreen_coop: dir.join("splitscreengames.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstraps_missing_settings_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = Settings::load_or_bootstrap(dir.path()).expect("settings");
        assert_eq!(settings.listing_url, DEFAULT_LISTING_URL);
        assert!(dir.path().join(SETTINGS_FILE).exists());
    }

    #[test]
    fn keeps_values_from_existing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{ "listing_url": "http://localhost/list" }"#,
        )
        .expect("write");
        let settings = Settings::load_or_bootstrap(dir.path()).expect("settings");
        assert_eq!(settings.listing_url, "http://localhost/list");
        assert_eq!(settings.coop_url, DEFAULT_COOP_URL);
    }

    #[test]
    fn rejects_malformed_settings() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(SETTINGS_FILE), "{ nope").expect("write");
        let err = Settings::load_or_bootstrap(dir.path()).unwrap_err();
        assert!(err.to_string().contains("not valid settings JSON"));
    }
}
