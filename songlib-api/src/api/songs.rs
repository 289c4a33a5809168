//! Song CRUD endpoints
//!
//! Extractor rejections are caught and re-raised as [`ApiError`] so that
//! every response, success or failure, uses the same JSON envelope.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::SongFilter;
use crate::error::{ApiError, ApiResult};
use crate::models::{NewSongRequest, Song, SongUpdate};
use crate::pagination::{PageWindow, VerseWindow, DEFAULT_PAGE_LIMIT, DEFAULT_VERSE_LIMIT};
use crate::AppState;

/// Raw query string as ordered key/value pairs
type QueryPairs = Vec<(String, String)>;

/// Success envelope carrying a payload
#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
    pub message: String,
}

/// Success envelope for a song listing
#[derive(Debug, Serialize, Deserialize)]
pub struct SongListResponse {
    pub data: Vec<Song>,
    pub message: String,
    pub page: i64,
    pub limit: i64,
    /// Songs matching the filters across all pages
    pub total: i64,
}

/// Success envelope without a payload
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Last value supplied for `key`, or `default` when absent or blank
fn int_param(params: &[(String, String)], key: &str, default: i64) -> ApiResult<i64> {
    match params.iter().rev().find(|(k, _)| k == key) {
        Some((_, raw)) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ApiError::BadRequest(format!("invalid {} parameter: '{}'", key, raw))),
        _ => Ok(default),
    }
}

/// Typed filters for every recognised key
fn song_filters(params: &[(String, String)]) -> Vec<SongFilter> {
    params
        .iter()
        .filter_map(|(key, value)| SongFilter::from_query_key(key, value))
        .collect()
}

fn song_id(path: Result<Path<String>, PathRejection>) -> ApiResult<i64> {
    let Path(raw) = path.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::BadRequest(format!("invalid song id: '{}'", raw)))
}

fn query_pairs(query: Result<Query<QueryPairs>, QueryRejection>) -> ApiResult<QueryPairs> {
    let Query(params) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    Ok(params)
}

/// GET /songs/
///
/// Filters: `group`, `song`, `releaseDate`, `text`, `link`.
/// Paging: `limit` (default 10), `page` (default 1).
pub async fn list_songs(
    State(state): State<AppState>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> ApiResult<Json<SongListResponse>> {
    let params = query_pairs(query)?;

    let limit = int_param(&params, "limit", DEFAULT_PAGE_LIMIT)?;
    let page = int_param(&params, "page", 1)?;
    let window = PageWindow::from_page(limit, page)?;
    let filters = song_filters(&params);

    let result = state.service.get_songs_with_paginate(&filters, window).await?;

    Ok(Json(SongListResponse {
        data: result.songs,
        message: "songs retrieved successfully".to_string(),
        page: result.window.page,
        limit: result.window.limit,
        total: result.total,
    }))
}

/// GET /songs/get_song/:id
///
/// Returns the song with `limit` verses (default 5) starting at `offset`.
pub async fn get_song(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> ApiResult<Json<DataResponse<Song>>> {
    let id = song_id(path)?;
    let params = query_pairs(query)?;

    let limit = int_param(&params, "limit", DEFAULT_VERSE_LIMIT)?;
    let offset = int_param(&params, "offset", 0)?;
    let window = VerseWindow::new(limit, offset)?;

    let song = state.service.get_song_with_verses(id, window).await?;

    Ok(Json(DataResponse {
        data: song,
        message: "song retrieved successfully".to_string(),
    }))
}

/// POST /songs/add_song
///
/// Body: `{"group": "...", "song": "..."}`. Responds 201 with the stored song.
pub async fn add_song(
    State(state): State<AppState>,
    body: Result<Json<NewSongRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<DataResponse<Song>>)> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let group = request.group.unwrap_or_default();
    let title = request.song.unwrap_or_default();

    let song = state.service.add_new_song(&group, &title).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: song,
            message: "song added successfully".to_string(),
        }),
    ))
}

/// PUT /songs/update_song/:id
///
/// Body: any subset of the song fields. Empty strings are treated as absent.
pub async fn update_song(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<SongUpdate>, JsonRejection>,
) -> ApiResult<Json<DataResponse<Song>>> {
    let id = song_id(path)?;
    let Json(update) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let song = state.service.update_song(id, update).await?;

    Ok(Json(DataResponse {
        data: song,
        message: "song updated successfully".to_string(),
    }))
}

/// DELETE /songs/delete_song/:id
pub async fn delete_song(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let id = song_id(path)?;

    state.service.delete_song(id).await?;

    Ok(Json(MessageResponse {
        message: format!("song with ID {} deleted successfully", id),
    }))
}
