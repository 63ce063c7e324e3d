use chrono::Utc;
use sqlx::SqlitePool;

use crate::domain::{CoreFields, Establishment};
use crate::error::{AppError, Result};

/// First commit of the intake pipeline. A duplicate email or CUIT becomes a
/// conflict and nothing is written.
pub async fn insert(pool: &SqlitePool, core: &CoreFields, webhook_data: &str) -> Result<Establishment> {
    sqlx::query_as(
        r#"
        INSERT INTO establishments (name, owner_email, cuit, address, webhook_data, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&core.name)
    .bind(&core.owner_email)
    .bind(&core.cuit)
    .bind(&core.address)
    .bind(webhook_data)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(conflict_or_database)
}

fn conflict_or_database(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let message = db_err.message();
            let field = if message.contains("owner_email") {
                "owner_email"
            } else if message.contains("cuit") {
                "cuit"
            } else {
                "establishment"
            };
            return AppError::Conflict {
                field: field.to_owned(),
            };
        }
    }
    AppError::Database(err)
}

pub async fn attach_pdf(pool: &SqlitePool, id: i64, pdf_path: &str) -> Result<Establishment> {
    sqlx::query_as("UPDATE establishments SET pdf_path = ? WHERE id = ? RETURNING *")
        .bind(pdf_path)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::EstablishmentNotFound(id))
}

pub async fn attach_payment_link(pool: &SqlitePool, id: i64, link: &str) -> Result<Establishment> {
    sqlx::query_as("UPDATE establishments SET payment_link = ? WHERE id = ? RETURNING *")
        .bind(link)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::EstablishmentNotFound(id))
}

pub async fn find(pool: &SqlitePool, id: i64) -> Result<Establishment> {
    sqlx::query_as("SELECT * FROM establishments WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::EstablishmentNotFound(id))
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<Establishment>> {
    let establishments = sqlx::query_as("SELECT * FROM establishments ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(establishments)
}
