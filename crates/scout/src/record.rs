// ABOUTME: ExtractedRecord, the structured row produced for each accepted listing item.
// ABOUTME: Also holds the sentinel strings and limits shared by extraction and output.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Sentinel for author and publish date when nothing could be recovered.
pub const UNKNOWN: &str = "unknown";

/// Sentinel for tags and permalink when nothing could be recovered.
pub const NONE: &str = "none";

/// Maximum number of tags kept per record.
pub const MAX_TAGS: usize = 5;

/// Maximum length (in characters) of a title taken from the item's full text.
pub const TITLE_FALLBACK_CHARS: usize = 100;

/// Column headers, in output order.
pub const COLUMNS: [&str; 8] = [
    "id",
    "title",
    "author",
    "publish_date",
    "likes",
    "comments",
    "tags",
    "permalink",
];

/// One note pulled from a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedRecord {
    pub id: String,
    pub title: String,
    pub author: String,
    pub publish_date: String,
    pub likes: u64,
    pub comments: u64,
    pub tags: Vec<String>,
    pub permalink: String,
}

impl ExtractedRecord {
    /// Tags joined for display, or the `none` sentinel when there are none.
    pub fn tags_display(&self) -> String {
        if self.tags.is_empty() {
            NONE.to_string()
        } else {
            self.tags.join(", ")
        }
    }
}

/// Positional id used when an item has no recognizable permalink.
pub fn positional_id(position: usize) -> String {
    format!("note_{}", position + 1)
}

/// Placeholder title that never counts as a real title.
pub fn placeholder_title(position: usize) -> String {
    format!("笔记_{}", position + 1)
}

/// Everything collected for one keyword.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordOutcome {
    pub keyword: String,
    /// Item selector that matched, if the page structure was recognized.
    pub item_selector: Option<String>,
    /// Number of candidate items found before the limit was applied.
    pub candidates: usize,
    pub crawled_at: DateTime<Utc>,
    pub records: Vec<ExtractedRecord>,
}

impl KeywordOutcome {
    pub fn empty(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            item_selector: None,
            candidates: 0,
            crawled_at: Utc::now(),
            records: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
