//! Song domain types
//!
//! JSON names follow the public API: the title travels as `song` and the
//! release date as `releaseDate`.

use serde::{Deserialize, Serialize};

/// Stored song
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Song {
    /// Storage-assigned identifier
    pub id: i64,
    /// Performing group
    #[sqlx(rename = "group_name")]
    pub group: String,
    /// Song title
    #[serde(rename = "song")]
    #[sqlx(rename = "song_name")]
    pub title: String,
    /// Canonical release date, `YYYY-MM-DD HH:MM:SS`
    #[serde(rename = "releaseDate")]
    pub release_date: String,
    /// Lyrics, verses separated by a blank line
    pub text: String,
    /// External link
    pub link: String,
}

/// Values for a song about to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSong {
    pub group: String,
    pub title: String,
    pub release_date: String,
    pub text: String,
    pub link: String,
}

/// Partial update; absent or empty fields leave the stored value untouched
///
/// Any `id` in the request body is ignored: the target is always the path id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SongUpdate {
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default, rename = "song")]
    pub title: Option<String>,
    #[serde(default, rename = "releaseDate", alias = "release_date")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

fn supplied(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl SongUpdate {
    pub fn group(&self) -> Option<&str> {
        supplied(&self.group)
    }

    pub fn title(&self) -> Option<&str> {
        supplied(&self.title)
    }

    pub fn release_date(&self) -> Option<&str> {
        supplied(&self.release_date)
    }

    pub fn text(&self) -> Option<&str> {
        supplied(&self.text)
    }

    pub fn link(&self) -> Option<&str> {
        supplied(&self.link)
    }

    /// True when no field carries a non-empty value
    pub fn is_empty(&self) -> bool {
        self.group().is_none()
            && self.title().is_none()
            && self.release_date().is_none()
            && self.text().is_none()
            && self.link().is_none()
    }
}

/// Body of `POST /songs/add_song`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSongRequest {
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub song: Option<String>,
}

/// Metadata returned by the song-info provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongDetail {
    #[serde(rename = "releaseDate")]
    pub release_date: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_serializes_with_api_names() {
        let song = Song {
            id: 7,
            group: "Muse".to_string(),
            title: "Supermassive Black Hole".to_string(),
            release_date: "2006-07-16 00:00:00".to_string(),
            text: "Ooh baby".to_string(),
            link: "https://example.com".to_string(),
        };

        let json = serde_json::to_value(&song).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["group"], "Muse");
        assert_eq!(json["song"], "Supermassive Black Hole");
        assert_eq!(json["releaseDate"], "2006-07-16 00:00:00");
        assert!(json.get("title").is_none());
    }

    #[test]
    fn test_update_ignores_id_and_accepts_alias() {
        let update: SongUpdate =
            serde_json::from_str(r#"{"id": 99, "release_date": "16.07.2006", "link": ""}"#)
                .unwrap();

        assert_eq!(update.release_date(), Some("16.07.2006"));
        assert_eq!(update.link(), None);
        assert!(!update.is_empty());
    }

    #[test]
    fn test_update_with_only_empty_strings_is_empty() {
        let update: SongUpdate =
            serde_json::from_str(r#"{"group": "", "song": "", "text": ""}"#).unwrap();
        assert!(update.is_empty());
        assert!(SongUpdate::default().is_empty());
    }

    #[test]
    fn test_song_detail_requires_release_date() {
        let detail: SongDetail =
            serde_json::from_str(r#"{"releaseDate": "16.07.2006", "text": "a\n\nb"}"#).unwrap();
        assert_eq!(detail.link, "");

        assert!(serde_json::from_str::<SongDetail>(r#"{"text": "a"}"#).is_err());
    }
}
