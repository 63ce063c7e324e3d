use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::{error, info, instrument, warn};

use super::mapping::FieldMapping;
use super::payload::Submission;
use crate::certificate::{CertificateRenderer, CertificateRequest, RenderError};
use crate::domain::Establishment;
use crate::error::{AppError, Result};
use crate::store;

/// Turns one form submission into a registered establishment with its
/// certificate attached.
///
/// Validation and uniqueness failures leave nothing behind. Once the row is
/// inserted it stays, even if rendering fails; such a row has no `pdf_path`
/// and is not retried.
#[derive(Clone)]
pub struct IngestionPipeline {
    db: SqlitePool,
    mapping: Arc<FieldMapping>,
    renderer: CertificateRenderer,
}

impl IngestionPipeline {
    pub fn new(db: SqlitePool, mapping: Arc<FieldMapping>, renderer: CertificateRenderer) -> Self {
        Self {
            db,
            mapping,
            renderer,
        }
    }

    #[instrument(skip_all, fields(fields = submission.len()))]
    pub async fn ingest(&self, submission: Submission) -> Result<Establishment> {
        let core = self.mapping.resolve(&submission).map_err(|missing| {
            warn!(missing = ?missing.0, "submission rejected");
            AppError::from(missing)
        })?;

        let webhook_data = serde_json::to_string(&submission)?;
        let establishment = store::establishments::insert(&self.db, &core, &webhook_data).await?;
        let id = establishment.id;
        info!(establishment_id = id, cuit = %core.cuit, "establishment registered");

        let request = CertificateRequest {
            id,
            created_at: establishment.created_at,
            core,
            submission: Some(submission),
        };

        // Detached so a dropped connection cannot stop the render halfway
        // between the file landing and the row pointing at it.
        let renderer = self.renderer.clone();
        let db = self.db.clone();
        let task = tokio::spawn(async move {
            let rendered = tokio::task::spawn_blocking(move || renderer.render(&request))
                .await
                .map_err(|e| RenderError::Aborted(e.to_string()))
                .and_then(|r| r);

            let path = match rendered {
                Ok(path) => path,
                Err(source) => {
                    error!(establishment_id = id, error = %source, "certificate rendering failed");
                    return Err(AppError::Render {
                        establishment_id: id,
                        source,
                    });
                }
            };

            let path = path.to_string_lossy().into_owned();
            let establishment = store::establishments::attach_pdf(&db, id, &path).await?;
            info!(establishment_id = id, pdf_path = %path, "certificate attached");
            Ok::<_, AppError>(establishment)
        });

        task.await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("certificate task failed: {e}")))?
    }
}
