//! Storage contract consumed by the news service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::AppError;
use crate::models::{Category, NewsFilter, NewsRow, Tag};

/// Read access to the news tables.
///
/// Every news query applies the visibility predicate: published news,
/// published category, `publishedAt` strictly before the filter's cutoff.
#[async_trait]
pub trait NewsStore: Send + Sync {
    /// Visible news matching the filter, newest first.
    async fn fetch_news_page(
        &self,
        filter: &NewsFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NewsRow>, AppError>;

    /// Number of visible news matching the filter.
    async fn count_news(&self, filter: &NewsFilter) -> Result<i64, AppError>;

    /// A single visible news row.
    async fn fetch_news_by_id(
        &self,
        id: i32,
        published_before: DateTime<Utc>,
    ) -> Result<Option<NewsRow>, AppError>;

    /// Published tags among `ids`, ordered by title.
    async fn fetch_tags_by_ids(&self, ids: &[i32]) -> Result<Vec<Tag>, AppError>;

    /// Published categories ordered by `orderNumber`.
    async fn fetch_categories(&self) -> Result<Vec<Category>, AppError>;

    /// Published tags ordered by title.
    async fn fetch_tags(&self) -> Result<Vec<Tag>, AppError>;

    /// Cheap round-trip used by the health check.
    async fn ping(&self) -> Result<(), AppError>;
}
