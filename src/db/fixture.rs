//! Seed data shared by the in-memory and PostgreSQL tests.
//!
//! Seven visible articles across five categories and five tags, plus rows
//! that must stay hidden: an unpublished article, a future-dated one, one in
//! an unpublished category, and an unpublished tag.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::models::{Category, NewsRow, Tag};

pub const VISIBLE_NEWS: usize = 7;
pub const UNPUBLISHED_NEWS_ID: i32 = 8;
pub const FUTURE_NEWS_ID: i32 = 9;
pub const HIDDEN_CATEGORY_NEWS_ID: i32 = 10;
pub const HIDDEN_CATEGORY_ID: i32 = 6;
pub const UNPUBLISHED_TAG_ID: i32 = 6;

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 14, 12, 0, 0).unwrap()
}

pub fn categories() -> Vec<Category> {
    [
        (1, "Technology", 1, 1),
        (2, "Sports", 2, 1),
        (3, "Politics", 3, 1),
        (4, "Economy", 4, 1),
        (5, "Culture", 5, 1),
        (HIDDEN_CATEGORY_ID, "Archive", 6, 2),
    ]
    .into_iter()
    .map(|(category_id, title, order_number, status_id)| Category {
        category_id,
        title: title.to_string(),
        order_number,
        status_id,
    })
    .collect()
}

pub fn tags() -> Vec<Tag> {
    [
        (1, "Important", 1),
        (2, "Hot", 1),
        (3, "Analytics", 1),
        (4, "Interview", 1),
        (5, "Report", 1),
        (UNPUBLISHED_TAG_ID, "Draft", 2),
    ]
    .into_iter()
    .map(|(tag_id, title, status_id)| Tag {
        tag_id,
        title: title.to_string(),
        status_id,
    })
    .collect()
}

pub fn news() -> Vec<NewsRow> {
    let categories = categories();
    let category = |id: i32| {
        categories
            .iter()
            .find(|c| c.category_id == id)
            .cloned()
            .unwrap()
    };

    let day = Duration::days(1);
    let rows = vec![
        (1, 1, "AI Breakthrough in Machine Learning", "Artificial intelligence continues to evolve rapidly.", "John Doe", base_time(), vec![1, 2], 1),
        (2, 1, "Quantum Computers: Future of Computing", "Quantum computers promise to revolutionize computing technology.", "Jane Smith", base_time() - day, vec![1, 3], 1),
        (3, 2, "World Cup Finals: Results", "The World Cup has concluded.", "Bob Johnson", base_time() - day * 2, vec![1, 2, UNPUBLISHED_TAG_ID, 99], 1),
        (4, 2, "Olympic Games: New Records", "New world records were set at the Olympic Games.", "Alice Brown", base_time() - day * 3, vec![1, 5], 1),
        (5, 3, "International Summit: Negotiation Results", "An international summit concluded.", "Charlie Wilson", base_time() - day * 4, vec![1, 3], 1),
        (6, 4, "Financial Markets: Situation Analysis", "Experts analyze the current situation in financial markets.", "Diana Davis", base_time() - day * 5, vec![], 1),
        (7, 5, "Film Festival: Award Ceremony", "An international film festival concluded.", "Edward Miller", base_time() - day * 6, vec![5, 2, 5], 1),
        (UNPUBLISHED_NEWS_ID, 1, "Draft: Upcoming Gadgets", "Not ready yet.", "John Doe", base_time(), vec![1], 2),
        (FUTURE_NEWS_ID, 3, "Election Night Preview", "Scheduled for later.", "Charlie Wilson", Utc::now() + day * 30, vec![1], 1),
        (HIDDEN_CATEGORY_NEWS_ID, HIDDEN_CATEGORY_ID, "Archived Interview", "From the archive.", "Diana Davis", base_time() - day, vec![4], 1),
    ];

    rows.into_iter()
        .map(
            |(news_id, category_id, title, content, author, published_at, tag_ids, status_id)| {
                NewsRow {
                    news_id,
                    category_id,
                    title: title.to_string(),
                    content: content.to_string(),
                    author: author.to_string(),
                    published_at,
                    updated_at: None,
                    status_id,
                    tag_ids,
                    category: category(category_id),
                }
            },
        )
        .collect()
}
