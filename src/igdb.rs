use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::config::Settings;
use crate::error::FetchError;
use crate::models::{MetadataRecord, QUERY_PLATFORM_IDS};

const IGDB_GAMES_ENDPOINT: &str = "https://api.igdb.com/v4/games";

#[async_trait]
pub trait MetadataApi: Send + Sync {
    async fn search_games(&self, title: &str) -> Result<Vec<MetadataRecord>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct IgdbClient {
    client: Client,
    endpoint: String,
    client_id: String,
    access_token: String,
}

impl IgdbClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        if settings.igdb_client_id.trim().is_empty() {
            anyhow::bail!(
                "Missing IGDB client id: set IGDB_CLIENT_ID or igdb_client_id in settings.json"
            );
        }
        if settings.igdb_access_token.trim().is_empty() {
            anyhow::bail!(
                "Missing IGDB access token: set IGDB_ACCESS_TOKEN or igdb_access_token in settings.json"
            );
        }
        let user_agent = format!("nowrank/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()
            .context("Failed to build IGDB HTTP client")?;
        Ok(Self {
            client,
            endpoint: IGDB_GAMES_ENDPOINT.to_string(),
            client_id: settings.igdb_client_id.trim().to_string(),
            access_token: settings.igdb_access_token.trim().to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl MetadataApi for IgdbClient {
    async fn search_games(&self, title: &str) -> Result<Vec<MetadataRecord>, FetchError> {
        let res = self
            .client
            .post(&self.endpoint)
            .header("Client-ID", &self.client_id)
            .bearer_auth(&self.access_token)
            .body(search_query(title))
            .send()
            .await?;

        let status = res.status();
        let bytes = res.bytes().await?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

pub fn search_query(title: &str) -> String {
    let escaped = title.replace('\\', "\\\\").replace('"', "\\\"");
    let platforms = QUERY_PLATFORM_IDS
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("fields *; search \"{escaped}\"; where release_dates.platform = ({platforms});")
}
