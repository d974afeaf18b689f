//! Database module for PostgreSQL access.
//!
//! The schema is owned by the portal's migration tooling; [`ensure_schema`]
//! only exists so tests and local setups can bootstrap an empty database.

#[cfg(test)]
pub mod fixture;
#[cfg(test)]
mod memory;
mod repository;
mod store;

#[cfg(test)]
pub use memory::*;
pub use repository::*;
pub use store::*;

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::config::DatabaseConfig;

/// Open the connection pool and verify the server answers.
pub async fn init_database(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_conns)
        .max_lifetime(config.max_conn_lifetime)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&config.url)
        .await?;

    sqlx::query("SELECT 1").execute(&pool).await?;

    if config.init_schema {
        ensure_schema(&pool).await?;
    }

    Ok(pool)
}

/// Idempotent DDL for the news tables.
const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS "statuses" (
        "statusId" INT4 PRIMARY KEY
    )"#,
    r#"INSERT INTO "statuses" ("statusId") VALUES (1), (2), (3) ON CONFLICT DO NOTHING"#,
    r#"CREATE TABLE IF NOT EXISTS "categories" (
        "categoryId" SERIAL PRIMARY KEY,
        "title" VARCHAR(255) NOT NULL,
        "orderNumber" INT4,
        "statusId" INT4 NOT NULL REFERENCES "statuses" ("statusId")
    )"#,
    r#"CREATE TABLE IF NOT EXISTS "tags" (
        "tagId" SERIAL PRIMARY KEY,
        "title" VARCHAR(255) NOT NULL,
        "statusId" INT4 NOT NULL REFERENCES "statuses" ("statusId")
    )"#,
    r#"CREATE TABLE IF NOT EXISTS "news" (
        "newsId" SERIAL PRIMARY KEY,
        "categoryId" INT4 NOT NULL REFERENCES "categories" ("categoryId"),
        "title" VARCHAR(255) NOT NULL,
        "content" TEXT,
        "author" VARCHAR(64) NOT NULL,
        "publishedAt" TIMESTAMPTZ NOT NULL DEFAULT now(),
        "updatedAt" TIMESTAMPTZ,
        "tagIds" INT4[] NOT NULL DEFAULT '{}',
        "statusId" INT4 NOT NULL REFERENCES "statuses" ("statusId")
    )"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_news_published_at" ON "news" ("publishedAt" DESC)"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_news_tag_ids" ON "news" USING GIN ("tagIds")"#,
];

/// Create the news tables if they don't exist.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(*statement).execute(pool).await?;
    }
    tracing::info!("Database schema verified");
    Ok(())
}
