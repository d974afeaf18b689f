//! Data models for the news portal.
//!
//! Wire names are camelCase to match the portal frontend and the JSON-RPC clients.

mod category;
mod news;
mod tag;

pub use category::*;
pub use news::*;
pub use tag::*;

/// Status code marking a row as publicly visible.
pub const STATUS_PUBLISHED: i32 = 1;
