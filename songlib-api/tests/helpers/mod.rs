//! Test Helper Utilities
//!
//! Shared utilities for testing songlib-api

#![allow(dead_code)]

pub mod http_utils;
pub mod mock_song_info;

pub use http_utils::{empty_request, extract_json, json_request, test_app};
pub use mock_song_info::{detail, MockSongInfo};

use songlib_api::db::insert_song;
use songlib_api::models::NewSong;
use sqlx::SqlitePool;

/// In-memory database with migrations applied
pub async fn create_test_db() -> SqlitePool {
    songlib_common::db::init_memory_database()
        .await
        .expect("Should create in-memory database")
}

/// Insert a song directly, bypassing enrichment
pub async fn seed_song(pool: &SqlitePool, group: &str, title: &str, text: &str) -> i64 {
    let song = NewSong {
        group: group.to_string(),
        title: title.to_string(),
        release_date: "2006-07-16 00:00:00".to_string(),
        text: text.to_string(),
        link: "https://www.youtube.com/watch?v=Xsp3_a-PMTw".to_string(),
    };
    insert_song(pool, &song).await.expect("Should insert song")
}

pub async fn song_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM songs")
        .fetch_one(pool)
        .await
        .expect("Should count songs")
}
