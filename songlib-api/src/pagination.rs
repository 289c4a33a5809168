//! Pagination utilities
//!
//! Two kinds of window are used by the service:
//! - [`PageWindow`]: LIMIT/OFFSET over song rows, derived from a 1-indexed page
//! - [`VerseWindow`]: offset/limit over the verse blocks of one song's text

use thiserror::Error;

/// Default number of songs per page
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Default number of verses returned for one song
pub const DEFAULT_VERSE_LIMIT: i64 = 5;

/// Separator between verse blocks: a blank line
pub const VERSE_DELIMITER: &str = "\n\n";

/// Invalid pagination parameters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("limit must be a positive integer, got {0}")]
    InvalidLimit(i64),

    #[error("page must be a positive integer, got {0}")]
    InvalidPage(i64),

    #[error("offset must be a non-negative integer, got {0}")]
    InvalidOffset(i64),
}

/// Requested verse offset lies past the end of the song
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("offset {offset} is out of range: song has {total} verses")]
pub struct OffsetOutOfRange {
    pub offset: usize,
    pub total: usize,
}

/// Row window for SQL LIMIT/OFFSET
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Current page number (1-indexed)
    pub page: i64,
    /// Maximum rows returned
    pub limit: i64,
    /// Rows skipped, `(page - 1) * limit`
    pub offset: i64,
}

impl PageWindow {
    /// Build a window from a page size and a 1-indexed page number
    ///
    /// # Examples
    /// ```
    /// use songlib_api::pagination::PageWindow;
    ///
    /// let w = PageWindow::from_page(10, 3).unwrap();
    /// assert_eq!(w.offset, 20);
    /// assert!(PageWindow::from_page(0, 1).is_err());
    /// ```
    pub fn from_page(limit: i64, page: i64) -> Result<Self, PaginationError> {
        if limit <= 0 {
            return Err(PaginationError::InvalidLimit(limit));
        }
        if page < 1 {
            return Err(PaginationError::InvalidPage(page));
        }

        let offset = (page - 1)
            .checked_mul(limit)
            .ok_or(PaginationError::InvalidPage(page))?;

        Ok(Self {
            page,
            limit,
            offset,
        })
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

/// Window over the verse blocks of a song
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerseWindow {
    pub limit: usize,
    pub offset: usize,
}

impl VerseWindow {
    pub fn new(limit: i64, offset: i64) -> Result<Self, PaginationError> {
        if limit <= 0 {
            return Err(PaginationError::InvalidLimit(limit));
        }
        if offset < 0 {
            return Err(PaginationError::InvalidOffset(offset));
        }
        let limit = usize::try_from(limit).map_err(|_| PaginationError::InvalidLimit(limit))?;
        let offset = usize::try_from(offset).map_err(|_| PaginationError::InvalidOffset(offset))?;
        Ok(Self { limit, offset })
    }
}

impl Default for VerseWindow {
    fn default() -> Self {
        Self {
            limit: DEFAULT_VERSE_LIMIT as usize,
            offset: 0,
        }
    }
}

/// Split song text into verse blocks
pub fn split_verses(text: &str) -> Vec<&str> {
    text.split(VERSE_DELIMITER).collect()
}

/// Select the verses inside `window` and rejoin them with the delimiter
pub fn paginate_verses(text: &str, window: VerseWindow) -> Result<String, OffsetOutOfRange> {
    let verses = split_verses(text);
    let total = verses.len();

    if window.offset >= total {
        return Err(OffsetOutOfRange {
            offset: window.offset,
            total,
        });
    }

    let end = window.offset.saturating_add(window.limit).min(total);
    Ok(verses[window.offset..end].join(VERSE_DELIMITER))
}
