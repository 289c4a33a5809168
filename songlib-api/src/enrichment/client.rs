//! HTTP song-info client

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{EnrichmentError, SongInfoProvider};
use crate::models::SongDetail;

const USER_AGENT: &str = concat!("songlib-api/", env!("CARGO_PKG_VERSION"));

/// Client for the external song-info endpoint
///
/// Issues one `GET {endpoint}?group=..&song=..` per lookup. No retry.
#[derive(Debug, Clone)]
pub struct HttpSongInfoClient {
    http_client: reqwest::Client,
    endpoint: String,
}

impl HttpSongInfoClient {
    /// Build a client for `endpoint`
    ///
    /// Without a `timeout` a request waits as long as the upstream keeps the
    /// connection open.
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, EnrichmentError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let http_client = builder
            .build()
            .map_err(|e| EnrichmentError::Config(e.to_string()))?;

        Ok(Self::with_client(http_client, endpoint))
    }

    /// Use a preconfigured reqwest client
    pub fn with_client(http_client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http_client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SongInfoProvider for HttpSongInfoClient {
    async fn fetch_song_info(
        &self,
        group: &str,
        title: &str,
    ) -> Result<SongDetail, EnrichmentError> {
        debug!(
            endpoint = %self.endpoint,
            group = %group,
            song = %title,
            "Querying song-info API"
        );

        let response = self
            .http_client
            .get(&self.endpoint)
            .query(&[("group", group), ("song", title)])
            .send()
            .await
            .map_err(|e| EnrichmentError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                body = %body,
                group = %group,
                song = %title,
                "Song-info API returned an error"
            );
            return Err(EnrichmentError::Status(status.as_u16(), body));
        }

        let detail: SongDetail = response
            .json()
            .await
            .map_err(|e| EnrichmentError::Parse(e.to_string()))?;

        info!(
            group = %group,
            song = %title,
            release_date = %detail.release_date,
            "Retrieved song details"
        );

        Ok(detail)
    }
}
