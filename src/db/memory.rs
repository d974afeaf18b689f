//! In-memory [`NewsStore`] used by the service and HTTP tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{fixture, NewsStore};
use crate::errors::AppError;
use crate::models::{Category, NewsFilter, NewsRow, Tag, STATUS_PUBLISHED};

pub struct MemoryStore {
    categories: Vec<Category>,
    tags: Vec<Tag>,
    news: Vec<NewsRow>,
    tag_lookups: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new(categories: Vec<Category>, tags: Vec<Tag>, news: Vec<NewsRow>) -> Self {
        Self {
            categories,
            tags,
            news,
            tag_lookups: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }

    /// Store seeded with the shared fixture.
    pub fn seeded() -> Self {
        Self::new(fixture::categories(), fixture::tags(), fixture::news())
    }

    /// Number of `fetch_tags_by_ids` calls so far.
    pub fn tag_lookups(&self) -> usize {
        self.tag_lookups.load(Ordering::SeqCst)
    }

    /// Make every subsequent call fail like a lost connection.
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn check(&self, op: &str) -> Result<(), AppError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::Storage(format!("{op}: connection refused")));
        }
        Ok(())
    }

    fn visible(&self, published_before: DateTime<Utc>) -> impl Iterator<Item = &NewsRow> {
        self.news.iter().filter(move |n| {
            n.status_id == STATUS_PUBLISHED
                && n.category.status_id == STATUS_PUBLISHED
                && n.published_at < published_before
        })
    }

    fn matching(&self, filter: &NewsFilter) -> Vec<&NewsRow> {
        let mut rows: Vec<_> = self
            .visible(filter.published_before)
            .filter(|n| filter.category_id.is_none_or(|c| n.category_id == c))
            .filter(|n| filter.tag_id.is_none_or(|t| n.tag_ids.contains(&t)))
            .collect();
        rows.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then(b.news_id.cmp(&a.news_id))
        });
        rows
    }
}

#[async_trait]
impl NewsStore for MemoryStore {
    async fn fetch_news_page(
        &self,
        filter: &NewsFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NewsRow>, AppError> {
        self.check("fetch news page")?;
        Ok(self
            .matching(filter)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count_news(&self, filter: &NewsFilter) -> Result<i64, AppError> {
        self.check("count news")?;
        Ok(self.matching(filter).len() as i64)
    }

    async fn fetch_news_by_id(
        &self,
        id: i32,
        published_before: DateTime<Utc>,
    ) -> Result<Option<NewsRow>, AppError> {
        self.check("fetch news by id")?;
        Ok(self
            .visible(published_before)
            .find(|n| n.news_id == id)
            .cloned())
    }

    async fn fetch_tags_by_ids(&self, ids: &[i32]) -> Result<Vec<Tag>, AppError> {
        self.tag_lookups.fetch_add(1, Ordering::SeqCst);
        self.check("fetch tags by ids")?;
        let mut tags: Vec<_> = self
            .tags
            .iter()
            .filter(|t| t.status_id == STATUS_PUBLISHED && ids.contains(&t.tag_id))
            .cloned()
            .collect();
        tags.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(tags)
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, AppError> {
        self.check("fetch categories")?;
        let mut categories: Vec<_> = self
            .categories
            .iter()
            .filter(|c| c.status_id == STATUS_PUBLISHED)
            .cloned()
            .collect();
        categories.sort_by_key(|c| (c.order_number, c.category_id));
        Ok(categories)
    }

    async fn fetch_tags(&self) -> Result<Vec<Tag>, AppError> {
        self.check("fetch tags")?;
        let mut tags: Vec<_> = self
            .tags
            .iter()
            .filter(|t| t.status_id == STATUS_PUBLISHED)
            .cloned()
            .collect();
        tags.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(tags)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check("ping database")
    }
}
