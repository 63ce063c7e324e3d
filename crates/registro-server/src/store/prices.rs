use chrono::Utc;
use sqlx::SqlitePool;

use crate::domain::Price;
use crate::error::{AppError, Result};

pub async fn list(pool: &SqlitePool) -> Result<Vec<Price>> {
    let prices = sqlx::query_as("SELECT * FROM prices ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(prices)
}

pub async fn get(pool: &SqlitePool, name: &str) -> Result<Price> {
    sqlx::query_as("SELECT * FROM prices WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::PriceNotFound(name.to_owned()))
}

pub async fn upsert(pool: &SqlitePool, name: &str, value: i64) -> Result<Price> {
    let price = sqlx::query_as(
        r#"
        INSERT INTO prices (name, value, updated_at)
        VALUES (?, ?, ?)
        ON CONFLICT (name) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(value)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;
    Ok(price)
}

/// Updates an existing price only; unknown names are not created.
pub async fn update(pool: &SqlitePool, name: &str, value: i64) -> Result<Price> {
    sqlx::query_as("UPDATE prices SET value = ?, updated_at = ? WHERE name = ? RETURNING *")
        .bind(value)
        .bind(Utc::now())
        .bind(name)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::PriceNotFound(name.to_owned()))
}

/// Inserts the price unless one with that name exists. Returns whether it
/// was created.
pub async fn seed(pool: &SqlitePool, name: &str, value: i64) -> Result<bool> {
    let result = sqlx::query(
        "INSERT INTO prices (name, value, updated_at) VALUES (?, ?, ?) ON CONFLICT (name) DO NOTHING",
    )
    .bind(name)
    .bind(value)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}
