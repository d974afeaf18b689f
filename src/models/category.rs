//! Category model.

use serde::{Deserialize, Serialize};

/// A news category. Exactly one per news article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub category_id: i32,
    pub title: String,
    /// Position in category listings (ascending)
    pub order_number: i32,
    pub status_id: i32,
}
