//! JSON-RPC 2.0 endpoint.
//!
//! Methods are registered under the `news.` namespace and without a prefix:
//! `list`, `count`, `byId`, `categories`, `tags`. Params are accepted by name
//! or by position; batches and notifications follow the 2.0 rules.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::service::{NewsService, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use crate::AppState;

pub mod rpc_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const SERVER_ERROR: i64 = -32000;
    /// `byId` with a non-positive id
    pub const INVALID_ID: i64 = 400;
    pub const NOT_FOUND: i64 = 404;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<AppError> for RpcError {
    fn from(err: AppError) -> Self {
        let code = match &err {
            AppError::InvalidArgument(_) | AppError::BadRequest(_) => rpc_codes::INVALID_PARAMS,
            AppError::NotFound(_) => rpc_codes::NOT_FOUND,
            _ => {
                tracing::error!("rpc call failed: {}", err);
                rpc_codes::SERVER_ERROR
            }
        };
        RpcError::new(code, err.public_message())
    }
}

#[derive(Debug, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    pub id: Value,
}

impl RpcResponse {
    fn reply(id: Value, outcome: Result<Value, RpcError>) -> Self {
        match outcome {
            Ok(result) => Self {
                jsonrpc: "2.0",
                result: Some(result),
                error: None,
                id,
            },
            Err(error) => Self {
                jsonrpc: "2.0",
                result: None,
                error: Some(error),
                id,
            },
        }
    }
}

/// Filter argument of `list` and `count`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RpcNewsFilter {
    pub tag_id: Option<i32>,
    pub category_id: Option<i32>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// POST /rpc - JSON-RPC 2.0 single or batch call.
pub async fn rpc_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            let error = RpcError::new(rpc_codes::PARSE_ERROR, format!("parse error: {e}"));
            return Json(RpcResponse::reply(Value::Null, Err(error))).into_response();
        }
    };

    match payload {
        Value::Array(calls) if calls.is_empty() => {
            let error = RpcError::new(rpc_codes::INVALID_REQUEST, "empty batch");
            Json(RpcResponse::reply(Value::Null, Err(error))).into_response()
        }
        Value::Array(calls) => {
            let mut replies = Vec::with_capacity(calls.len());
            for call in calls {
                if let Some(reply) = handle_call(&state.news, call).await {
                    replies.push(reply);
                }
            }
            if replies.is_empty() {
                StatusCode::NO_CONTENT.into_response()
            } else {
                Json(replies).into_response()
            }
        }
        call => match handle_call(&state.news, call).await {
            Some(reply) => Json(reply).into_response(),
            None => StatusCode::NO_CONTENT.into_response(),
        },
    }
}

/// Run one call. Valid notifications (no `id` member) yield `None`; invalid
/// requests are always answered, with a null id when none was given.
async fn handle_call(service: &NewsService, call: Value) -> Option<RpcResponse> {
    let Value::Object(mut call) = call else {
        let error = RpcError::new(rpc_codes::INVALID_REQUEST, "request must be an object");
        return Some(RpcResponse::reply(Value::Null, Err(error)));
    };

    let id = call.remove("id");
    let version_ok = call.get("jsonrpc").and_then(Value::as_str) == Some("2.0");
    let method = call.get("method").and_then(Value::as_str).map(str::to_owned);
    let params = call.remove("params").unwrap_or(Value::Null);

    let method = match method {
        Some(method) if version_ok => method,
        _ => {
            let error = RpcError::new(
                rpc_codes::INVALID_REQUEST,
                "expected jsonrpc \"2.0\" and a method name",
            );
            return Some(RpcResponse::reply(id.unwrap_or(Value::Null), Err(error)));
        }
    };

    tracing::debug!(%method, "rpc call");
    let outcome = dispatch(service, &method, params).await;
    id.map(|id| RpcResponse::reply(id, outcome))
}

/// Invoke `method` with raw `params`.
pub async fn dispatch(service: &NewsService, method: &str, params: Value) -> Result<Value, RpcError> {
    let name = method.strip_prefix("news.").unwrap_or(method);

    match name {
        "list" => {
            let filter: RpcNewsFilter = single_param(params, "filter")?;
            let news = service
                .list_news(
                    filter.tag_id,
                    filter.category_id,
                    filter.page.unwrap_or(DEFAULT_PAGE),
                    filter.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
                )
                .await?;
            to_value(news)
        }
        "count" => {
            let filter: RpcNewsFilter = single_param(params, "filter")?;
            to_value(service.count_news(filter.tag_id, filter.category_id).await?)
        }
        "byId" => {
            let id: Option<i32> = single_param(params, "id")?;
            let id = match id {
                Some(id) if id > 0 => id,
                _ => return Err(RpcError::new(rpc_codes::INVALID_ID, "id must be positive")),
            };
            match service.news_by_id(id).await? {
                Some(news) => to_value(news),
                None => Err(RpcError::new(rpc_codes::NOT_FOUND, "news not found")),
            }
        }
        "categories" => to_value(service.categories().await?),
        "tags" => to_value(service.tags().await?),
        _ => Err(RpcError::new(
            rpc_codes::METHOD_NOT_FOUND,
            format!("method not found: {method}"),
        )),
    }
}

/// Extract a method's only parameter from `{name: value}`, `[value]`, or
/// absent params (the type's default).
fn single_param<T: DeserializeOwned + Default>(params: Value, name: &str) -> Result<T, RpcError> {
    let value = match params {
        Value::Null => return Ok(T::default()),
        Value::Array(mut items) if items.len() <= 1 => items.pop().unwrap_or(Value::Null),
        Value::Object(mut fields) if fields.len() == 1 && fields.contains_key(name) => {
            fields.remove(name).unwrap_or(Value::Null)
        }
        Value::Object(fields) if fields.is_empty() => return Ok(T::default()),
        other => {
            return Err(RpcError::new(
                rpc_codes::INVALID_PARAMS,
                format!("expected a single \"{name}\" parameter, got {other}"),
            ))
        }
    };

    if value.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(value).map_err(|e| {
        RpcError::new(rpc_codes::INVALID_PARAMS, format!("invalid {name}: {e}"))
    })
}

fn to_value<T: Serialize>(value: T) -> Result<Value, RpcError> {
    serde_json::to_value(value)
        .map_err(|e| AppError::Internal(format!("failed to encode rpc result: {e}")).into())
}

/// Service description listing the available methods, served on GET /rpc.
pub async fn rpc_describe() -> Json<Value> {
    Json(json!({
        "transport": "POST",
        "envelope": "JSON-RPC-2.0",
        "namespaces": ["news", ""],
        "methods": {
            "list": { "params": ["filter"], "returns": "NewsSummary[]" },
            "count": { "params": ["filter"], "returns": "integer" },
            "byId": {
                "params": ["id"],
                "returns": "News",
                "errors": { "400": "id must be positive", "404": "news not found" }
            },
            "categories": { "params": [], "returns": "Category[]" },
            "tags": { "params": [], "returns": "Tag[]" }
        }
    }))
}
