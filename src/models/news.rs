//! News models: the stored row, the enriched article and the list projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Category, Tag};

/// A news row as read from storage, before tag ids are resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsRow {
    pub news_id: i32,
    pub category_id: i32,
    pub title: String,
    pub content: String,
    pub author: String,
    pub published_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub status_id: i32,
    /// Ordered tag references; duplicates are possible
    pub tag_ids: Vec<i32>,
    pub category: Category,
}

/// A news article with its category and resolved tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct News {
    pub news_id: i32,
    pub category_id: i32,
    pub title: String,
    pub content: String,
    pub author: String,
    pub published_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub status_id: i32,
    pub category: Category,
    pub tags: Vec<Tag>,
}

impl News {
    /// Combine a stored row with its already resolved tags.
    pub fn from_row(row: NewsRow, tags: Vec<Tag>) -> Self {
        Self {
            news_id: row.news_id,
            category_id: row.category_id,
            title: row.title,
            content: row.content,
            author: row.author,
            published_at: row.published_at,
            updated_at: row.updated_at,
            status_id: row.status_id,
            category: row.category,
            tags,
        }
    }
}

/// List view of a news article. Same as [`News`] without the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsSummary {
    pub news_id: i32,
    pub category_id: i32,
    pub title: String,
    pub author: String,
    pub published_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub status_id: i32,
    pub category: Category,
    pub tags: Vec<Tag>,
}

impl From<News> for NewsSummary {
    fn from(news: News) -> Self {
        Self {
            news_id: news.news_id,
            category_id: news.category_id,
            title: news.title,
            author: news.author,
            published_at: news.published_at,
            updated_at: news.updated_at,
            status_id: news.status_id,
            category: news.category,
            tags: news.tags,
        }
    }
}

/// Filters shared by the news listing, count and single lookup queries.
///
/// Visibility (published news, published category) is always applied by the
/// store; `published_before` is the "now" the caller evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewsFilter {
    pub tag_id: Option<i32>,
    pub category_id: Option<i32>,
    pub published_before: DateTime<Utc>,
}

impl NewsFilter {
    pub fn new(tag_id: Option<i32>, category_id: Option<i32>) -> Self {
        Self {
            tag_id,
            category_id,
            published_before: Utc::now(),
        }
    }
}

impl std::fmt::Display for NewsFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "tag_id={:?}, category_id={:?}",
            self.tag_id, self.category_id
        )
    }
}
