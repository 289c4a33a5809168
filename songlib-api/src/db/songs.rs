//! Song table queries
//!
//! Every value is bound as a parameter; SQL text is assembled only from
//! fixed column names.

use super::filters::{fold_case, where_clauses, SongFilter};
use crate::models::{NewSong, Song, SongUpdate};
use crate::pagination::{paginate_verses, OffsetOutOfRange, PageWindow, VerseWindow};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Projection shared by all single-table song reads
const SELECT_SONG: &str = "SELECT id, group_name, song_name, \
     COALESCE(release_date, '') AS release_date, \
     COALESCE(text, '') AS text, \
     COALESCE(link, '') AS link \
     FROM songs";

/// Data-access errors
#[derive(Debug, Error)]
pub enum SongStoreError {
    #[error("song with ID {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    OffsetOutOfRange(#[from] OffsetOutOfRange),

    #[error("no fields to update")]
    NoFieldsToUpdate,

    #[error("failed to {operation}: {source}")]
    Database {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

pub type StoreResult<T> = Result<T, SongStoreError>;

fn db_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> SongStoreError {
    move |source| SongStoreError::Database { operation, source }
}

/// List songs matching every filter, ordered by id, inside `window`
pub async fn list_songs(
    pool: &SqlitePool,
    filters: &[SongFilter],
    window: PageWindow,
) -> StoreResult<Vec<Song>> {
    let sql = format!(
        "{} WHERE 1=1{} ORDER BY id ASC LIMIT ? OFFSET ?",
        SELECT_SONG,
        where_clauses(filters)
    );
    debug!(sql = %sql, "List songs query");

    let mut query = sqlx::query_as::<_, Song>(&sql);
    for filter in filters {
        query = query.bind(filter.bind_value());
    }

    let songs = query
        .bind(window.limit)
        .bind(window.offset)
        .fetch_all(pool)
        .await
        .map_err(db_error("list songs"))?;

    info!(
        count = songs.len(),
        limit = window.limit,
        offset = window.offset,
        "Fetched songs"
    );
    Ok(songs)
}

/// Count songs matching every filter
pub async fn count_songs(pool: &SqlitePool, filters: &[SongFilter]) -> StoreResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM songs WHERE 1=1{}", where_clauses(filters));

    let mut query = sqlx::query_scalar::<_, i64>(&sql);
    for filter in filters {
        query = query.bind(filter.bind_value());
    }

    query
        .fetch_one(pool)
        .await
        .map_err(db_error("count songs"))
}

/// Fetch one song by id
pub async fn get_song(pool: &SqlitePool, id: i64) -> StoreResult<Option<Song>> {
    let sql = format!("{} WHERE id = ?", SELECT_SONG);

    sqlx::query_as::<_, Song>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(db_error("fetch song"))
}

/// Fetch one song with its text cut down to the verses inside `window`
pub async fn get_song_with_verses(
    pool: &SqlitePool,
    id: i64,
    window: VerseWindow,
) -> StoreResult<Song> {
    let mut song = get_song(pool, id)
        .await?
        .ok_or(SongStoreError::NotFound(id))?;

    song.text = paginate_verses(&song.text, window).map_err(|e| {
        warn!(song_id = id, offset = e.offset, total = e.total, "Verse offset out of range");
        e
    })?;

    debug!(
        song_id = id,
        offset = window.offset,
        limit = window.limit,
        "Returning verse window"
    );
    Ok(song)
}

/// Insert a song and return its storage-assigned id
pub async fn insert_song(pool: &SqlitePool, song: &NewSong) -> StoreResult<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO songs (
            group_name, song_name, release_date, text, link,
            group_name_folded, song_name_folded, text_folded, link_folded
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&song.group)
    .bind(&song.title)
    .bind(&song.release_date)
    .bind(&song.text)
    .bind(&song.link)
    .bind(fold_case(&song.group))
    .bind(fold_case(&song.title))
    .bind(fold_case(&song.text))
    .bind(fold_case(&song.link))
    .execute(pool)
    .await
    .map_err(db_error("insert song"))?;

    let id = result.last_insert_rowid();
    info!(song_id = id, group = %song.group, song = %song.title, "Inserted song");
    Ok(id)
}

/// Overwrite the non-empty fields of `update` on song `id`
///
/// Searchable columns get their folded copy rewritten in the same statement.
/// Returns the number of rows affected (0 when the id does not exist).
pub async fn update_song(pool: &SqlitePool, id: i64, update: &SongUpdate) -> StoreResult<u64> {
    let fields = [
        ("group_name", Some("group_name_folded"), update.group()),
        ("song_name", Some("song_name_folded"), update.title()),
        ("text", Some("text_folded"), update.text()),
        ("link", Some("link_folded"), update.link()),
        ("release_date", None, update.release_date()),
    ];

    let mut assignments = Vec::new();
    let mut values = Vec::new();
    for (column, folded_column, value) in fields {
        if let Some(value) = value {
            assignments.push(format!("{} = ?", column));
            values.push(value.to_string());
            if let Some(folded_column) = folded_column {
                assignments.push(format!("{} = ?", folded_column));
                values.push(fold_case(value));
            }
        }
    }

    if values.is_empty() {
        return Err(SongStoreError::NoFieldsToUpdate);
    }

    let sql = format!(
        "UPDATE songs SET {}, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        assignments.join(", ")
    );

    let mut query = sqlx::query(&sql);
    for value in values {
        query = query.bind(value);
    }

    let rows = query
        .bind(id)
        .execute(pool)
        .await
        .map_err(db_error("update song"))?
        .rows_affected();

    if rows == 0 {
        warn!(song_id = id, "No song updated");
    } else {
        info!(song_id = id, "Updated song");
    }
    Ok(rows)
}

/// Delete song `id`; returns the number of rows affected (0 or 1)
pub async fn delete_song(pool: &SqlitePool, id: i64) -> StoreResult<u64> {
    let rows = sqlx::query("DELETE FROM songs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map_err(db_error("delete song"))?
        .rows_affected();

    if rows == 0 {
        warn!(song_id = id, "No song found to delete");
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use songlib_common::db::init_memory_database;

    fn new_song(group: &str, title: &str, text: &str) -> NewSong {
        NewSong {
            group: group.to_string(),
            title: title.to_string(),
            release_date: "2006-07-16 00:00:00".to_string(),
            text: text.to_string(),
            link: format!("https://example.com/{}", title),
        }
    }

    async fn seeded_pool() -> SqlitePool {
        let pool = init_memory_database().await.unwrap();
        for (group, title) in [
            ("Muse", "Supermassive Black Hole"),
            ("Muse", "Uprising"),
            ("Radiohead", "Creep"),
            ("The Beatles", "Yesterday"),
        ] {
            insert_song(&pool, &new_song(group, title, "a\n\nb\n\nc"))
                .await
                .unwrap();
        }
        pool
    }

    #[tokio::test]
    async fn test_list_without_filters_returns_window() {
        let pool = seeded_pool().await;

        let all = list_songs(&pool, &[], PageWindow::from_page(10, 1).unwrap())
            .await
            .unwrap();
        assert_eq!(all.len(), 4);
        assert!(all.windows(2).all(|w| w[0].id < w[1].id));

        let second_page = list_songs(&pool, &[], PageWindow::from_page(3, 2).unwrap())
            .await
            .unwrap();
        assert_eq!(second_page.len(), 1);
        assert_eq!(second_page[0].title, "Yesterday");
    }

    #[tokio::test]
    async fn test_group_filter_is_case_insensitive_substring() {
        let pool = seeded_pool().await;
        let window = PageWindow::default();

        for needle in ["muse", "MUSE", "us"] {
            let songs = list_songs(&pool, &[SongFilter::Group(needle.into())], window)
                .await
                .unwrap();
            assert_eq!(songs.len(), 2, "filter '{}'", needle);
            assert!(songs.iter().all(|s| s.group == "Muse"));
        }

        let none = list_songs(&pool, &[SongFilter::Group("Metallica".into())], window)
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_text_filters_fold_non_ascii_case() {
        let pool = init_memory_database().await.unwrap();
        insert_song(&pool, &new_song("Кино", "Группа крови", "Тёплое место"))
            .await
            .unwrap();
        insert_song(&pool, &new_song("Muse", "Uprising", "la"))
            .await
            .unwrap();

        for filter in [
            SongFilter::Group("Кино".into()),
            SongFilter::Group("кино".into()),
            SongFilter::Group("КИНО".into()),
            SongFilter::Title("ГРУППА".into()),
            SongFilter::Text("тёплое".into()),
        ] {
            let songs = list_songs(&pool, &[filter.clone()], PageWindow::default())
                .await
                .unwrap();
            assert_eq!(songs.len(), 1, "filter {:?}", filter);
            assert_eq!(songs[0].group, "Кино");
        }
    }

    #[tokio::test]
    async fn test_update_refreshes_folded_columns() {
        let pool = init_memory_database().await.unwrap();
        let id = insert_song(&pool, &new_song("Muse", "Uprising", "la"))
            .await
            .unwrap();

        let update = SongUpdate {
            group: Some("Сплин".to_string()),
            ..Default::default()
        };
        update_song(&pool, id, &update).await.unwrap();

        let by_new = [SongFilter::Group("сплин".into())];
        assert_eq!(count_songs(&pool, &by_new).await.unwrap(), 1);
        let by_old = [SongFilter::Group("muse".into())];
        assert_eq!(count_songs(&pool, &by_old).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_wildcard_characters_match_literally() {
        let pool = init_memory_database().await.unwrap();
        let mut song = new_song("AC_DC", "Back in Black", "100% rock");
        song.link = "https://www.youtube.com/watch?v=Xsp3_a-PMTw".to_string();
        insert_song(&pool, &song).await.unwrap();
        insert_song(&pool, &new_song("ACXDC", "Thunderstruck", "1000 rock"))
            .await
            .unwrap();

        let cases = [
            (SongFilter::Link("Xsp3".into()), 1),
            (SongFilter::Link("Xsp3_a".into()), 1),
            (SongFilter::Link("xsp3_a-pmtw".into()), 1),
            (SongFilter::Group("AC_DC".into()), 1),
            (SongFilter::Group("ac_".into()), 1),
            (SongFilter::Text("100%".into()), 1),
            (SongFilter::Text("%".into()), 1),
            (SongFilter::Group("_".into()), 1),
        ];
        for (filter, expected) in cases {
            assert_eq!(
                count_songs(&pool, &[filter.clone()]).await.unwrap(),
                expected,
                "filter {:?}",
                filter
            );
        }
    }

    #[tokio::test]
    async fn test_filters_combine_with_and() {
        let pool = seeded_pool().await;
        let filters = vec![
            SongFilter::Group("muse".into()),
            SongFilter::Title("rising".into()),
        ];

        let songs = list_songs(&pool, &filters, PageWindow::default()).await.unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].title, "Uprising");
        assert_eq!(count_songs(&pool, &filters).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_release_date_filter_is_exact() {
        let pool = seeded_pool().await;

        let exact = [SongFilter::ReleaseDate("2006-07-16 00:00:00".into())];
        assert_eq!(count_songs(&pool, &exact).await.unwrap(), 4);

        let partial = [SongFilter::ReleaseDate("2006-07-16".into())];
        assert_eq!(count_songs(&pool, &partial).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_filter_value_cannot_inject_sql() {
        let pool = seeded_pool().await;

        let filters = [SongFilter::Title("' OR 1=1 --".into())];
        let songs = list_songs(&pool, &filters, PageWindow::default()).await.unwrap();
        assert!(songs.is_empty());
        assert_eq!(count_songs(&pool, &[]).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_get_song_with_verses() {
        let pool = init_memory_database().await.unwrap();
        let id = insert_song(&pool, &new_song("Muse", "Uprising", "one\n\ntwo\n\nthree"))
            .await
            .unwrap();

        let song = get_song_with_verses(&pool, id, VerseWindow::new(2, 0).unwrap())
            .await
            .unwrap();
        assert_eq!(song.text, "one\n\ntwo");
        assert_eq!(song.group, "Muse");

        let err = get_song_with_verses(&pool, id, VerseWindow::new(2, 3).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SongStoreError::OffsetOutOfRange(OffsetOutOfRange { offset: 3, total: 3 })
        ));

        let err = get_song_with_verses(&pool, id + 100, VerseWindow::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SongStoreError::NotFound(missing) if missing == id + 100));
    }

    #[tokio::test]
    async fn test_partial_update_only_touches_supplied_fields() {
        let pool = init_memory_database().await.unwrap();
        let id = insert_song(&pool, &new_song("Muse", "Uprising", "one"))
            .await
            .unwrap();
        let before = get_song(&pool, id).await.unwrap().unwrap();

        let update = SongUpdate {
            link: Some("https://new.example.com".to_string()),
            group: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(update_song(&pool, id, &update).await.unwrap(), 1);

        let after = get_song(&pool, id).await.unwrap().unwrap();
        assert_eq!(after.link, "https://new.example.com");
        assert_eq!(after.group, before.group);
        assert_eq!(after.title, before.title);
        assert_eq!(after.text, before.text);
        assert_eq!(after.release_date, before.release_date);
    }

    #[tokio::test]
    async fn test_update_without_fields_is_rejected() {
        let pool = init_memory_database().await.unwrap();
        let err = update_song(&pool, 1, &SongUpdate::default()).await.unwrap_err();
        assert!(matches!(err, SongStoreError::NoFieldsToUpdate));
    }

    #[tokio::test]
    async fn test_update_missing_song_affects_no_rows() {
        let pool = init_memory_database().await.unwrap();
        let update = SongUpdate {
            text: Some("x".to_string()),
            ..Default::default()
        };
        assert_eq!(update_song(&pool, 42, &update).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_reports_rows_affected() {
        let pool = init_memory_database().await.unwrap();
        let id = insert_song(&pool, &new_song("Muse", "Uprising", "one"))
            .await
            .unwrap();

        assert_eq!(delete_song(&pool, id).await.unwrap(), 1);
        assert_eq!(delete_song(&pool, id).await.unwrap(), 0);
        assert!(get_song(&pool, id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_null_columns_read_back_as_empty_strings() {
        let pool = init_memory_database().await.unwrap();
        sqlx::query("INSERT INTO songs (group_name, song_name) VALUES ('Muse', 'Uprising')")
            .execute(&pool)
            .await
            .unwrap();

        let songs = list_songs(&pool, &[], PageWindow::default()).await.unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].release_date, "");
        assert_eq!(songs[0].text, "");
        assert_eq!(songs[0].link, "");
    }
}
