//! HTTP API module.
//!
//! REST endpoints under `/api/v1` and a JSON-RPC 2.0 endpoint at `/rpc`, both
//! thin adapters over [`crate::service::NewsService`].

mod news;
mod rpc;

pub use news::*;
pub use rpc::*;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::AppState;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

/// GET /health - Liveness plus a database round-trip.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthStatus>, AppError> {
    state.news.ping().await.map_err(|e| {
        tracing::warn!("Health check failed: {}", e);
        AppError::Unavailable("database unavailable".to_string())
    })?;
    Ok(Json(HealthStatus { status: "ok" }))
}
