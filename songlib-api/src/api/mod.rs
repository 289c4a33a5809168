//! HTTP API handlers for songlib-api

pub mod health;
pub mod songs;

pub use health::health_routes;
pub use songs::{add_song, delete_song, get_song, list_songs, update_song};
