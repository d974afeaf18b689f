//! News REST endpoints.

use axum::extract::{Path, Query, State};
use serde::Deserialize;

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{Category, News, NewsSummary, Tag};
use crate::service::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use crate::AppState;

/// Query parameters shared by the listing and count endpoints.
///
/// Kept as strings so malformed numbers get our error envelope instead of
/// the extractor's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsQuery {
    pub tag_id: Option<String>,
    pub category_id: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl NewsQuery {
    fn tag_id(&self) -> Result<Option<i32>, AppError> {
        parse_optional("tagId", self.tag_id.as_deref())
    }

    fn category_id(&self) -> Result<Option<i32>, AppError> {
        parse_optional("categoryId", self.category_id.as_deref())
    }

    fn page(&self) -> Result<i64, AppError> {
        Ok(parse_optional("page", self.page.as_deref())?.unwrap_or(DEFAULT_PAGE))
    }

    fn page_size(&self) -> Result<i64, AppError> {
        Ok(parse_optional("pageSize", self.page_size.as_deref())?.unwrap_or(DEFAULT_PAGE_SIZE))
    }
}

/// Empty or missing means "not given".
fn parse_optional<T: std::str::FromStr>(name: &str, raw: Option<&str>) -> Result<Option<T>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("invalid {name}: {s:?}"))),
    }
}

/// GET /api/v1/all_news - Paginated news summaries, newest first.
pub async fn list_news(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> ApiResult<Vec<NewsSummary>> {
    let news = state
        .news
        .list_news(
            query.tag_id()?,
            query.category_id()?,
            query.page()?,
            query.page_size()?,
        )
        .await?;
    success(news)
}

/// GET /api/v1/count - Number of news matching the filters.
pub async fn count_news(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> ApiResult<i64> {
    let count = state
        .news
        .count_news(query.tag_id()?, query.category_id()?)
        .await?;
    success(count)
}

/// GET /api/v1/news/{id} - A single article with content.
pub async fn get_news(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<News> {
    let id: i32 = id
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id: {id:?}")))?;

    match state.news.news_by_id(id).await? {
        Some(news) => success(news),
        None => Err(AppError::NotFound(format!("News {} not found", id))),
    }
}

/// GET /api/v1/categories - Published categories in display order.
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    success(state.news.categories().await?)
}

/// GET /api/v1/tags - Published tags by title.
pub async fn list_tags(State(state): State<AppState>) -> ApiResult<Vec<Tag>> {
    success(state.news.tags().await?)
}
