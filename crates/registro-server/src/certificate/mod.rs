//! Registration certificates: a pure layout pass followed by PDF drawing.

pub mod layout;
mod pdf;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::domain::CoreFields;
use crate::intake::{FieldMapping, Submission};

pub use layout::Layout;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("i/o error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("pdf error: {0}")]
    Pdf(String),

    #[error("render task aborted: {0}")]
    Aborted(String),
}

/// Everything printed on a certificate.
#[derive(Debug, Clone)]
pub struct CertificateRequest {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub core: CoreFields,
    pub submission: Option<Submission>,
}

#[derive(Debug, Clone)]
pub struct Branding {
    pub title: String,
    pub organization: String,
    pub logo_path: PathBuf,
}

#[derive(Clone)]
pub struct CertificateRenderer {
    output_dir: PathBuf,
    branding: Arc<Branding>,
    mapping: Arc<FieldMapping>,
}

impl CertificateRenderer {
    pub fn new(output_dir: PathBuf, branding: Branding, mapping: Arc<FieldMapping>) -> Self {
        Self {
            output_dir,
            branding: Arc::new(branding),
            mapping,
        }
    }

    /// Certificates are keyed by establishment id, so rendering again
    /// replaces the previous file.
    pub fn path_for(&self, id: i64) -> PathBuf {
        self.output_dir.join(format!("registro_{id}.pdf"))
    }

    pub fn layout(&self, request: &CertificateRequest, generated_at: DateTime<Local>) -> Layout {
        let with_logo = self.logo().is_some();
        layout::compose(request, &self.mapping, &self.branding, with_logo, generated_at)
    }

    /// Writes the certificate and returns its path. Blocking; the PDF is
    /// staged next to the target and renamed into place once complete.
    pub fn render(&self, request: &CertificateRequest) -> Result<PathBuf, RenderError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| RenderError::Io {
            path: self.output_dir.clone(),
            source,
        })?;

        let logo = self.logo();
        if logo.is_none() {
            warn!(path = %self.branding.logo_path.display(), "certificate logo not found");
        }

        let layout = self.layout(request, Local::now());

        let target = self.path_for(request.id);
        let staging = self
            .output_dir
            .join(format!(".registro_{}.{}.tmp", request.id, Uuid::new_v4()));

        if let Err(err) = pdf::write(&layout, &self.branding.title, logo, &staging) {
            let _ = fs::remove_file(&staging);
            return Err(err);
        }

        fs::rename(&staging, &target).map_err(|source| {
            let _ = fs::remove_file(&staging);
            RenderError::Io {
                path: target.clone(),
                source,
            }
        })?;

        Ok(target)
    }

    fn logo(&self) -> Option<&Path> {
        let path = self.branding.logo_path.as_path();
        path.is_file().then_some(path)
    }
}
