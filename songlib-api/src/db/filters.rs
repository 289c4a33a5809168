//! Typed song filters
//!
//! Only the variants below can reach SQL. Each one names its column and how
//! the supplied value is matched, so column names never come from user input.
//!
//! Text filters compare against the `*_folded` shadow columns, which hold a
//! Unicode lower-cased copy written alongside every insert and update.

/// How a filter value is compared with its column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// `column = ?`
    Exact,
    /// `folded_column LIKE ? ESCAPE '\'`, substring of the case-folded value
    Pattern,
}

/// Case folding shared by stored shadow columns and filter values
pub fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

/// Escape LIKE metacharacters so `value` only matches literally
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// One narrowing condition on the song listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SongFilter {
    Group(String),
    Title(String),
    /// Matched exactly; the service normalizes it to the canonical form
    ReleaseDate(String),
    Text(String),
    Link(String),
}

impl SongFilter {
    /// Map a query-string key onto a filter
    ///
    /// Unknown keys and empty values yield `None`.
    pub fn from_query_key(key: &str, value: &str) -> Option<Self> {
        if value.is_empty() {
            return None;
        }
        let value = value.to_string();
        match key {
            "group" => Some(SongFilter::Group(value)),
            "song" => Some(SongFilter::Title(value)),
            "releaseDate" | "release_date" => Some(SongFilter::ReleaseDate(value)),
            "text" => Some(SongFilter::Text(value)),
            "link" => Some(SongFilter::Link(value)),
            _ => None,
        }
    }

    /// Column the condition compares against
    pub fn column(&self) -> &'static str {
        match self {
            SongFilter::Group(_) => "group_name_folded",
            SongFilter::Title(_) => "song_name_folded",
            SongFilter::ReleaseDate(_) => "release_date",
            SongFilter::Text(_) => "text_folded",
            SongFilter::Link(_) => "link_folded",
        }
    }

    pub fn strategy(&self) -> MatchStrategy {
        match self {
            SongFilter::ReleaseDate(_) => MatchStrategy::Exact,
            _ => MatchStrategy::Pattern,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            SongFilter::Group(v)
            | SongFilter::Title(v)
            | SongFilter::ReleaseDate(v)
            | SongFilter::Text(v)
            | SongFilter::Link(v) => v,
        }
    }

    /// SQL condition with a single `?` placeholder
    pub fn condition(&self) -> String {
        match self.strategy() {
            MatchStrategy::Exact => format!("{} = ?", self.column()),
            MatchStrategy::Pattern => format!("{} LIKE ? ESCAPE '\\'", self.column()),
        }
    }

    /// Value to bind for [`SongFilter::condition`]
    ///
    /// Pattern values are folded and escaped, so `%` and `_` match literally.
    pub fn bind_value(&self) -> String {
        let value = self.value();
        match self.strategy() {
            MatchStrategy::Exact => value.to_string(),
            MatchStrategy::Pattern => format!("%{}%", escape_like(&fold_case(value))),
        }
    }
}

/// ` AND ...` clauses for a filter set, appended after `WHERE 1=1`
pub fn where_clauses(filters: &[SongFilter]) -> String {
    filters
        .iter()
        .map(|f| format!(" AND {}", f.condition()))
        .collect()
}
