//! Song-info provider double

use async_trait::async_trait;
use songlib_api::enrichment::{EnrichmentError, SongInfoProvider};
use songlib_api::models::SongDetail;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn detail(release_date: &str, text: &str) -> SongDetail {
    SongDetail {
        release_date: release_date.to_string(),
        text: text.to_string(),
        link: "https://www.youtube.com/watch?v=Xsp3_a-PMTw".to_string(),
    }
}

/// Returns a fixed detail, or a 503 when built with [`MockSongInfo::unavailable`]
pub struct MockSongInfo {
    detail: Option<SongDetail>,
    calls: AtomicUsize,
}

impl MockSongInfo {
    pub fn returning(detail: SongDetail) -> Self {
        Self {
            detail: Some(detail),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            detail: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SongInfoProvider for MockSongInfo {
    async fn fetch_song_info(
        &self,
        _group: &str,
        _title: &str,
    ) -> Result<SongDetail, EnrichmentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.detail {
            Some(detail) => Ok(detail.clone()),
            None => Err(EnrichmentError::Status(503, "service unavailable".to_string())),
        }
    }
}
