//! Database access layer for songlib-api
//!
//! Connection setup and migrations live in `songlib_common::db`; this module
//! holds the song queries and the typed filters they accept.

pub mod filters;
pub mod songs;

pub use filters::{fold_case, MatchStrategy, SongFilter};
pub use songs::{
    count_songs, delete_song, get_song, get_song_with_verses, insert_song, list_songs,
    update_song, SongStoreError, StoreResult,
};
