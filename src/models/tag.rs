//! Tag model.

use serde::{Deserialize, Serialize};

/// A tag attached to news articles by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub tag_id: i32,
    pub title: String,
    pub status_id: i32,
}
