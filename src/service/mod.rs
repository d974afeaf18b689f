//! News query engine.
//!
//! Listing, counting and single lookup of visible news, with tags resolved in
//! one batch per call.

mod tags;

pub use tags::attach_tags;

use std::sync::Arc;

use chrono::Utc;

use crate::db::NewsStore;
use crate::errors::AppError;
use crate::models::{Category, News, NewsFilter, NewsSummary, Tag};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Read-only query service over a [`NewsStore`].
#[derive(Clone)]
pub struct NewsService {
    store: Arc<dyn NewsStore>,
}

impl NewsService {
    pub fn new(store: Arc<dyn NewsStore>) -> Self {
        Self { store }
    }

    /// Visible news matching the filters, newest first, without body content.
    ///
    /// `page` and `page_size` must be at least 1; `page_size` is capped at
    /// [`MAX_PAGE_SIZE`].
    pub async fn list_news(
        &self,
        tag_id: Option<i32>,
        category_id: Option<i32>,
        page: i64,
        page_size: i64,
    ) -> Result<Vec<NewsSummary>, AppError> {
        let (limit, offset) = page_window(page, page_size)?;
        let filter = NewsFilter::new(tag_id, category_id);

        let rows = self.store.fetch_news_page(&filter, limit, offset).await?;
        let news = attach_tags(rows, |ids| async move {
            self.store.fetch_tags_by_ids(&ids).await
        })
        .await?;

        tracing::info!(%filter, page, page_size = limit, count = news.len(), "listed news");
        Ok(news.into_iter().map(NewsSummary::from).collect())
    }

    /// Number of visible news matching the filters.
    pub async fn count_news(
        &self,
        tag_id: Option<i32>,
        category_id: Option<i32>,
    ) -> Result<i64, AppError> {
        let filter = NewsFilter::new(tag_id, category_id);
        let count = self.store.count_news(&filter).await?;
        tracing::info!(%filter, count, "counted news");
        Ok(count)
    }

    /// A visible article with full content, or `None` if it doesn't exist or is hidden.
    pub async fn news_by_id(&self, id: i32) -> Result<Option<News>, AppError> {
        let Some(row) = self.store.fetch_news_by_id(id, Utc::now()).await? else {
            tracing::info!(news_id = id, "news not found");
            return Ok(None);
        };

        let mut news = attach_tags(vec![row], |ids| async move {
            self.store.fetch_tags_by_ids(&ids).await
        })
        .await?;
        Ok(news.pop())
    }

    /// Published categories in display order.
    pub async fn categories(&self) -> Result<Vec<Category>, AppError> {
        self.store.fetch_categories().await
    }

    /// Published tags ordered by title.
    pub async fn tags(&self) -> Result<Vec<Tag>, AppError> {
        self.store.fetch_tags().await
    }

    /// Whether the backing store answers.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.store.ping().await
    }
}

/// Validate pagination and turn it into `(limit, offset)`.
pub fn page_window(page: i64, page_size: i64) -> Result<(i64, i64), AppError> {
    if page < 1 {
        return Err(AppError::InvalidArgument(format!(
            "page must be >= 1, got {page}"
        )));
    }
    if page_size < 1 {
        return Err(AppError::InvalidArgument(format!(
            "pageSize must be >= 1, got {page_size}"
        )));
    }

    let limit = page_size.min(MAX_PAGE_SIZE);
    let offset = (page - 1)
        .checked_mul(limit)
        .ok_or_else(|| AppError::InvalidArgument(format!("page {page} is out of range")))?;
    Ok((limit, offset))
}
