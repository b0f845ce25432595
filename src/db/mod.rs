use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::env;

pub type DB = sqlx::PgPool;

pub async fn connect() -> Result<DB> {
    let url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    // 1. Connect
    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&url)
        .await
        .context("could not connect to Postgres")?;

    // 2. Ensure the schema exists
    // Three tables, no surprises. Timestamps are unix seconds stored as BIGINT.
    // Photo bytes live on disk; the photos table only holds metadata.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            name TEXT NOT NULL DEFAULT '',
            surname TEXT NOT NULL DEFAULT '',
            email TEXT NOT NULL DEFAULT '',
            phone_number TEXT NOT NULL DEFAULT '',
            birthday TEXT NOT NULL DEFAULT '',
            city TEXT NOT NULL DEFAULT '',
            created_at BIGINT NOT NULL
        )
        "#,
    )
    .execute(&db)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS posts (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            main_text TEXT NOT NULL,
            created_at BIGINT NOT NULL
        )
        "#,
    )
    .execute(&db)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS photos (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            file_name TEXT NOT NULL,
            content_hash TEXT NOT NULL,
            content_type TEXT NOT NULL,
            created_at BIGINT NOT NULL
        )
        "#,
    )
    .execute(&db)
    .await?;

    Ok(db)
}

/// Builds a pool without touching the network. The first query pays the
/// connection cost. Used by tests that only exercise pre-database paths.
pub fn connect_lazy(url: &str) -> Result<DB> {
    Ok(PgPoolOptions::new().connect_lazy(url)?)
}
