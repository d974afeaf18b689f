//! Batch resolution of tag ids to tags across a page of news.

use std::collections::{BTreeSet, HashMap};
use std::future::Future;

use crate::errors::AppError;
use crate::models::{News, NewsRow, Tag};

/// Resolve the tag ids of every row with a single `lookup` call.
///
/// `lookup` receives the deduplicated union of ids (ascending) and must return
/// the published tags among them. It is not called when no row references a
/// tag. Ids without a match are dropped; each row's tags end up sorted by title.
pub async fn attach_tags<F, Fut>(rows: Vec<NewsRow>, lookup: F) -> Result<Vec<News>, AppError>
where
    F: FnOnce(Vec<i32>) -> Fut,
    Fut: Future<Output = Result<Vec<Tag>, AppError>>,
{
    let ids: BTreeSet<i32> = rows
        .iter()
        .flat_map(|row| row.tag_ids.iter().copied())
        .collect();

    if ids.is_empty() {
        return Ok(rows
            .into_iter()
            .map(|row| News::from_row(row, Vec::new()))
            .collect());
    }

    let tags = lookup(ids.into_iter().collect()).await?;
    let by_id: HashMap<i32, Tag> = tags.into_iter().map(|tag| (tag.tag_id, tag)).collect();

    Ok(rows
        .into_iter()
        .map(|row| {
            let mut tags: Vec<Tag> = row
                .tag_ids
                .iter()
                .filter_map(|id| by_id.get(id).cloned())
                .collect();
            tags.sort_by(|a, b| a.title.cmp(&b.title).then(a.tag_id.cmp(&b.tag_id)));
            News::from_row(row, tags)
        })
        .collect())
}
