//! Song service
//!
//! Orchestrates data access, enrichment and release-date normalization.
//! Each call is independent; the only shared resource is the pool.

use sqlx::SqlitePool;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::date_format::{normalize_release_date, DateFormatError};
use crate::db::{self, SongFilter, SongStoreError};
use crate::enrichment::{EnrichmentError, SongInfoProvider};
use crate::models::{NewSong, Song, SongUpdate};
use crate::pagination::{OffsetOutOfRange, PageWindow, VerseWindow};

/// Domain-level outcome of a failed service call
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("song with ID {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    OffsetOutOfRange(OffsetOutOfRange),

    #[error("no fields to update")]
    NoFieldsToUpdate,

    #[error(transparent)]
    InvalidDateFormat(#[from] DateFormatError),

    #[error("song-info lookup failed: {0}")]
    Upstream(#[from] EnrichmentError),

    #[error("failed to {operation}: {source}")]
    Storage {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl From<SongStoreError> for ServiceError {
    fn from(err: SongStoreError) -> Self {
        match err {
            SongStoreError::NotFound(id) => ServiceError::NotFound(id),
            SongStoreError::OffsetOutOfRange(e) => ServiceError::OffsetOutOfRange(e),
            SongStoreError::NoFieldsToUpdate => ServiceError::NoFieldsToUpdate,
            SongStoreError::Database { operation, source } => {
                error!(operation, error = %source, "Storage operation failed");
                ServiceError::Storage { operation, source }
            }
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// One page of a filtered song listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongPage {
    pub songs: Vec<Song>,
    pub window: PageWindow,
    /// Rows matching the filters across all pages
    pub total: i64,
}

#[derive(Clone)]
pub struct SongService {
    pool: SqlitePool,
    song_info: Arc<dyn SongInfoProvider>,
}

impl SongService {
    pub fn new(pool: SqlitePool, song_info: Arc<dyn SongInfoProvider>) -> Self {
        Self { pool, song_info }
    }

    /// Enrich, normalize and insert a new song
    ///
    /// Nothing is written unless the lookup and the date parse both succeed.
    #[instrument(skip(self))]
    pub async fn add_new_song(&self, group: &str, title: &str) -> ServiceResult<Song> {
        let group = group.trim();
        let title = title.trim();
        if group.is_empty() || title.is_empty() {
            return Err(ServiceError::Validation(
                "group and song are required".to_string(),
            ));
        }

        let detail = self
            .song_info
            .fetch_song_info(group, title)
            .await
            .map_err(|e| {
                warn!(error = %e, "Song-info lookup failed, song not added");
                e
            })?;

        let release_date = normalize_release_date(&detail.release_date).map_err(|e| {
            warn!(
                release_date = %detail.release_date,
                "Song-info returned an unparseable release date"
            );
            e
        })?;

        let new_song = NewSong {
            group: group.to_string(),
            title: title.to_string(),
            release_date,
            text: detail.text,
            link: detail.link,
        };

        let id = db::insert_song(&self.pool, &new_song).await?;
        info!(song_id = id, "Song added");

        Ok(Song {
            id,
            group: new_song.group,
            title: new_song.title,
            release_date: new_song.release_date,
            text: new_song.text,
            link: new_song.link,
        })
    }

    /// Apply the non-empty fields of `update` to song `id` and return the result
    #[instrument(skip(self, update))]
    pub async fn update_song(&self, id: i64, mut update: SongUpdate) -> ServiceResult<Song> {
        if update.is_empty() {
            return Err(ServiceError::NoFieldsToUpdate);
        }

        if let Some(raw) = update.release_date() {
            let normalized = normalize_release_date(raw)?;
            update.release_date = Some(normalized);
        }

        let rows = db::update_song(&self.pool, id, &update).await?;
        if rows == 0 {
            return Err(ServiceError::NotFound(id));
        }

        // The row can vanish between the update and the read under a
        // concurrent delete
        let song = db::get_song(&self.pool, id)
            .await?
            .ok_or(ServiceError::NotFound(id))?;

        info!(song_id = id, "Song updated");
        Ok(song)
    }

    #[instrument(skip(self))]
    pub async fn delete_song(&self, id: i64) -> ServiceResult<()> {
        let rows = db::delete_song(&self.pool, id).await?;
        if rows == 0 {
            return Err(ServiceError::NotFound(id));
        }

        info!(song_id = id, "Song deleted");
        Ok(())
    }

    /// One page of songs matching every filter
    ///
    /// A release-date filter may use any accepted input format; it is
    /// normalized before the exact comparison.
    #[instrument(skip(self, filters), fields(filter_count = filters.len()))]
    pub async fn get_songs_with_paginate(
        &self,
        filters: &[SongFilter],
        window: PageWindow,
    ) -> ServiceResult<SongPage> {
        let filters = canonical_filters(filters)?;
        let songs = db::list_songs(&self.pool, &filters, window).await?;
        let total = db::count_songs(&self.pool, &filters).await?;

        info!(count = songs.len(), total, page = window.page, "Listed songs");
        Ok(SongPage {
            songs,
            window,
            total,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_song_with_verses(&self, id: i64, window: VerseWindow) -> ServiceResult<Song> {
        let song = db::get_song_with_verses(&self.pool, id, window).await?;
        info!(song_id = id, "Fetched song verses");
        Ok(song)
    }

    /// Liveness check against the database
    pub async fn ping(&self) -> ServiceResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|source| ServiceError::Storage {
                operation: "ping database",
                source,
            })?;
        Ok(())
    }
}

fn canonical_filters(filters: &[SongFilter]) -> ServiceResult<Vec<SongFilter>> {
    filters
        .iter()
        .map(|filter| match filter {
            SongFilter::ReleaseDate(raw) => {
                let canonical = normalize_release_date(raw).map_err(|e| {
                    warn!(release_date = %raw, "Unparseable release date filter");
                    e
                })?;
                Ok(SongFilter::ReleaseDate(canonical))
            }
            other => Ok(other.clone()),
        })
        .collect()
}
