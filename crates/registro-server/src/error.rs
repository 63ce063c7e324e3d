use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::certificate::RenderError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("missing required fields: {}", .missing.join(", "))]
    Validation { missing: Vec<String> },

    #[error("establishment already registered: duplicate {field}")]
    Conflict { field: String },

    #[error("certificate rendering failed for establishment {establishment_id}: {source}")]
    Render {
        establishment_id: i64,
        #[source]
        source: RenderError,
    },

    #[error("establishment not found: {0}")]
    EstablishmentNotFound(i64),

    #[error("price not found: {0}")]
    PriceNotFound(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("payment link could not be created: {0}")]
    PaymentLink(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unsupported content type: {0}")]
    UnsupportedMediaType(String),

    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, details) = match &self {
            Self::Validation { missing } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                Some(serde_json::json!({ "missing": missing })),
            ),
            Self::Conflict { field } => (
                StatusCode::CONFLICT,
                "conflict",
                Some(serde_json::json!({ "field": field })),
            ),
            Self::Render {
                establishment_id, ..
            } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "render_error",
                Some(serde_json::json!({ "establishment_id": establishment_id })),
            ),
            Self::EstablishmentNotFound(_) => {
                (StatusCode::NOT_FOUND, "establishment_not_found", None)
            }
            Self::PriceNotFound(_) => (StatusCode::NOT_FOUND, "price_not_found", None),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", None),
            Self::PaymentLink(_) => (StatusCode::INTERNAL_SERVER_ERROR, "payment_link_error", None),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request", None),
            Self::UnsupportedMediaType(_) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "unsupported_media_type",
                None,
            ),
            Self::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "unavailable", None),
            Self::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None),
            Self::Serialization(_) => (StatusCode::INTERNAL_SERVER_ERROR, "serialization_error", None),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None),
        };

        if status.is_server_error() {
            tracing::error!(code, error = %self, "request failed");
        } else {
            tracing::warn!(code, error = %self, "request rejected");
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message: self.to_string(),
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
