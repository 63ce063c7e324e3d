//! Request extractors that reject with `AppError`, so every failure keeps
//! the JSON error envelope.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::AppError;
use crate::intake::Submission;

enum BodyKind {
    Json,
    UrlEncoded,
    Multipart,
}

fn body_kind(req: &Request) -> Result<BodyKind, AppError> {
    let Some(content_type) = req.headers().get(CONTENT_TYPE) else {
        // Some form plugins omit the header on url-encoded posts.
        return Ok(BodyKind::UrlEncoded);
    };
    let content_type = content_type
        .to_str()
        .map_err(|_| AppError::UnsupportedMediaType("<non-ascii>".into()))?;
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "application/json" => Ok(BodyKind::Json),
        "application/x-www-form-urlencoded" => Ok(BodyKind::UrlEncoded),
        "multipart/form-data" => Ok(BodyKind::Multipart),
        _ if essence.ends_with("+json") => Ok(BodyKind::Json),
        _ => Err(AppError::UnsupportedMediaType(content_type.to_owned())),
    }
}

/// Accepts JSON objects, url-encoded forms and multipart forms. Multipart
/// file parts are skipped; only text fields make up the submission.
#[async_trait]
impl<S> FromRequest<S> for Submission
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let kind = body_kind(&req)?;

        if let BodyKind::Multipart = kind {
            let mut multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;

            let mut pairs = Vec::new();
            while let Some(field) = multipart
                .next_field()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?
            {
                let Some(name) = field.name().map(str::to_owned) else {
                    continue;
                };
                if let Some(file_name) = field.file_name() {
                    debug!(field = %name, file_name, "skipping uploaded file");
                    continue;
                }
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                pairs.push((name, value));
            }

            return Ok(Submission::from_pairs(pairs));
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let parsed = match kind {
            BodyKind::Json => Submission::from_json(&body),
            _ => Submission::from_form(&body),
        };

        parsed.map_err(|e| AppError::BadRequest(e.to_string()))
    }
}

/// `axum::Json` with an `AppError` rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Json<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state).await?;
        Ok(Json(value))
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
