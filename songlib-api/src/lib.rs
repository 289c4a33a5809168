//! songlib-api library - song library REST service
//!
//! Songs are listed with filters and pagination, fetched with verse
//! pagination, added through an external song-info lookup, and updated or
//! deleted by id.

use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod api;
pub mod date_format;
pub mod db;
pub mod enrichment;
pub mod error;
pub mod models;
pub mod pagination;
pub mod service;

use enrichment::SongInfoProvider;
use service::SongService;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub service: SongService,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, song_info: Arc<dyn SongInfoProvider>) -> Self {
        Self {
            service: SongService::new(db, song_info),
        }
    }
}

/// Build application router
///
/// CORS is fully permissive; every request is traced.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{delete, get, post, put};

    let songs = Router::new()
        .route("/songs", get(api::list_songs))
        .route("/songs/", get(api::list_songs))
        .route("/songs/get_song/:id", get(api::get_song))
        .route("/songs/add_song", post(api::add_song))
        .route("/songs/update_song/:id", put(api::update_song))
        .route("/songs/delete_song/:id", delete(api::delete_song));

    Router::new()
        .merge(songs)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
