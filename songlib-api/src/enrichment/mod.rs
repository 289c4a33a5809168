//! Song metadata enrichment
//!
//! New songs arrive with only a group and a title. The rest (release date,
//! lyrics, link) is looked up through a [`SongInfoProvider`]. Production uses
//! [`HttpSongInfoClient`]; tests substitute their own provider.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::SongDetail;

mod client;

pub use client::HttpSongInfoClient;

/// Song-info lookup errors
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Status(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Client configuration error: {0}")]
    Config(String),
}

/// Lookup of metadata for a song identified by group and title
#[async_trait]
pub trait SongInfoProvider: Send + Sync {
    async fn fetch_song_info(
        &self,
        group: &str,
        title: &str,
    ) -> Result<SongDetail, EnrichmentError>;
}
