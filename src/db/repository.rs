//! PostgreSQL implementation of [`NewsStore`].
//!
//! All statements are parameterized; optional filters are bound as nullable
//! parameters so every query has a single fixed text.

use std::future::Future;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::NewsStore;
use crate::errors::AppError;
use crate::models::{Category, NewsFilter, NewsRow, Tag, STATUS_PUBLISHED};

const SELECT_VISIBLE_NEWS: &str = r#"
    SELECT n."newsId", n."categoryId", n."title", n."content", n."author",
           n."publishedAt", n."updatedAt", n."statusId", n."tagIds",
           c."title" AS "categoryTitle", c."orderNumber" AS "categoryOrderNumber",
           c."statusId" AS "categoryStatusId"
    FROM "news" n
    JOIN "categories" c ON c."categoryId" = n."categoryId"
    WHERE n."statusId" = $1 AND c."statusId" = $1 AND n."publishedAt" < $2
      AND ($3::int4 IS NULL OR n."categoryId" = $3)
      AND ($4::int4 IS NULL OR $4 = ANY(n."tagIds"))
    ORDER BY n."publishedAt" DESC, n."newsId" DESC
    LIMIT $5 OFFSET $6
"#;

const COUNT_VISIBLE_NEWS: &str = r#"
    SELECT COUNT(*) AS "total"
    FROM "news" n
    JOIN "categories" c ON c."categoryId" = n."categoryId"
    WHERE n."statusId" = $1 AND c."statusId" = $1 AND n."publishedAt" < $2
      AND ($3::int4 IS NULL OR n."categoryId" = $3)
      AND ($4::int4 IS NULL OR $4 = ANY(n."tagIds"))
"#;

const SELECT_VISIBLE_NEWS_BY_ID: &str = r#"
    SELECT n."newsId", n."categoryId", n."title", n."content", n."author",
           n."publishedAt", n."updatedAt", n."statusId", n."tagIds",
           c."title" AS "categoryTitle", c."orderNumber" AS "categoryOrderNumber",
           c."statusId" AS "categoryStatusId"
    FROM "news" n
    JOIN "categories" c ON c."categoryId" = n."categoryId"
    WHERE n."statusId" = $1 AND c."statusId" = $1 AND n."publishedAt" < $2
      AND n."newsId" = $3
"#;

/// Database repository for the news tables.
#[derive(Clone)]
pub struct Repository {
    pool: PgPool,
    query_timeout: Duration,
}

impl Repository {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Run one storage call under the query timeout, attaching `context` to failures.
    ///
    /// Each call is logged at debug with its elapsed time; the statement text
    /// itself is logged by sqlx under the `sqlx::query` target.
    async fn run<T, F>(&self, context: String, call: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        let started = Instant::now();
        let outcome = tokio::time::timeout(self.query_timeout, call).await;
        let elapsed = started.elapsed();

        match outcome {
            Ok(result) => {
                tracing::debug!(
                    operation = %context,
                    elapsed_ms = elapsed.as_millis() as u64,
                    ok = result.is_ok(),
                    "query executed"
                );
                result.map_err(|err| AppError::storage(&context, err))
            }
            Err(_) => {
                tracing::error!("{context} timed out after {:?}", self.query_timeout);
                Err(AppError::Storage(format!(
                    "{context}: timed out after {:?}",
                    self.query_timeout
                )))
            }
        }
    }
}

#[async_trait]
impl NewsStore for Repository {
    async fn fetch_news_page(
        &self,
        filter: &NewsFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NewsRow>, AppError> {
        tracing::debug!(%filter, limit, offset, "fetching news page");

        let rows = self
            .run(
                format!("fetch news page ({filter}, limit={limit}, offset={offset})"),
                sqlx::query(SELECT_VISIBLE_NEWS)
                    .bind(STATUS_PUBLISHED)
                    .bind(filter.published_before)
                    .bind(filter.category_id)
                    .bind(filter.tag_id)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool),
            )
            .await?;

        let news = rows
            .iter()
            .map(news_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| AppError::storage(format!("decode news page ({filter})"), err))?;

        tracing::debug!(count = news.len(), %filter, "fetched news page");
        Ok(news)
    }

    async fn count_news(&self, filter: &NewsFilter) -> Result<i64, AppError> {
        tracing::debug!(%filter, "counting news");

        let row = self
            .run(
                format!("count news ({filter})"),
                sqlx::query(COUNT_VISIBLE_NEWS)
                    .bind(STATUS_PUBLISHED)
                    .bind(filter.published_before)
                    .bind(filter.category_id)
                    .bind(filter.tag_id)
                    .fetch_one(&self.pool),
            )
            .await?;

        row.try_get("total")
            .map_err(|err| AppError::storage(format!("decode news count ({filter})"), err))
    }

    async fn fetch_news_by_id(
        &self,
        id: i32,
        published_before: DateTime<Utc>,
    ) -> Result<Option<NewsRow>, AppError> {
        tracing::debug!(news_id = id, "fetching news by id");

        let row = self
            .run(
                format!("fetch news by id ({id})"),
                sqlx::query(SELECT_VISIBLE_NEWS_BY_ID)
                    .bind(STATUS_PUBLISHED)
                    .bind(published_before)
                    .bind(id)
                    .fetch_optional(&self.pool),
            )
            .await?;

        row.as_ref()
            .map(news_from_row)
            .transpose()
            .map_err(|err| AppError::storage(format!("decode news ({id})"), err))
    }

    async fn fetch_tags_by_ids(&self, ids: &[i32]) -> Result<Vec<Tag>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        tracing::debug!(?ids, "fetching tags by ids");

        let rows = self
            .run(
                format!("fetch tags by ids ({ids:?})"),
                sqlx::query(
                    r#"SELECT "tagId", "title", "statusId" FROM "tags"
                       WHERE "tagId" = ANY($1) AND "statusId" = $2
                       ORDER BY "title" ASC"#,
                )
                .bind(ids)
                .bind(STATUS_PUBLISHED)
                .fetch_all(&self.pool),
            )
            .await?;

        rows.iter()
            .map(tag_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| AppError::storage("decode tags", err))
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, AppError> {
        let rows = self
            .run(
                "fetch categories".to_string(),
                sqlx::query(
                    r#"SELECT "categoryId", "title", "orderNumber", "statusId" FROM "categories"
                       WHERE "statusId" = $1
                       ORDER BY "orderNumber" ASC, "categoryId" ASC"#,
                )
                .bind(STATUS_PUBLISHED)
                .fetch_all(&self.pool),
            )
            .await?;

        tracing::debug!(count = rows.len(), "fetched categories");
        rows.iter()
            .map(category_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| AppError::storage("decode categories", err))
    }

    async fn fetch_tags(&self) -> Result<Vec<Tag>, AppError> {
        let rows = self
            .run(
                "fetch tags".to_string(),
                sqlx::query(
                    r#"SELECT "tagId", "title", "statusId" FROM "tags"
                       WHERE "statusId" = $1
                       ORDER BY "title" ASC"#,
                )
                .bind(STATUS_PUBLISHED)
                .fetch_all(&self.pool),
            )
            .await?;

        tracing::debug!(count = rows.len(), "fetched tags");
        rows.iter()
            .map(tag_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| AppError::storage("decode tags", err))
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.run(
            "ping database".to_string(),
            sqlx::query("SELECT 1").execute(&self.pool),
        )
        .await
        .map(|_| ())
    }
}

// Helper functions for row conversion

fn news_from_row(row: &PgRow) -> Result<NewsRow, sqlx::Error> {
    let content: Option<String> = row.try_get("content")?;
    let tag_ids: Option<Vec<i32>> = row.try_get("tagIds")?;
    let order_number: Option<i32> = row.try_get("categoryOrderNumber")?;
    let category_id: i32 = row.try_get("categoryId")?;

    Ok(NewsRow {
        news_id: row.try_get("newsId")?,
        category_id,
        title: row.try_get("title")?,
        content: content.unwrap_or_default(),
        author: row.try_get("author")?,
        published_at: row.try_get("publishedAt")?,
        updated_at: row.try_get("updatedAt")?,
        status_id: row.try_get("statusId")?,
        tag_ids: tag_ids.unwrap_or_default(),
        category: Category {
            category_id,
            title: row.try_get("categoryTitle")?,
            order_number: order_number.unwrap_or_default(),
            status_id: row.try_get("categoryStatusId")?,
        },
    })
}

fn category_from_row(row: &PgRow) -> Result<Category, sqlx::Error> {
    let order_number: Option<i32> = row.try_get("orderNumber")?;
    Ok(Category {
        category_id: row.try_get("categoryId")?,
        title: row.try_get("title")?,
        order_number: order_number.unwrap_or_default(),
        status_id: row.try_get("statusId")?,
    })
}

fn tag_from_row(row: &PgRow) -> Result<Tag, sqlx::Error> {
    Ok(Tag {
        tag_id: row.try_get("tagId")?,
        title: row.try_get("title")?,
        status_id: row.try_get("statusId")?,
    })
}
