pub mod api;
pub mod certificate;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod intake;
pub mod payments;
pub mod store;
pub mod telemetry;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use sqlx::SqlitePool;
use tracing::info;

use crate::api::routes;
use crate::certificate::{Branding, CertificateRenderer};
use crate::config::Config;
use crate::intake::{FieldMapping, IngestionPipeline};
use crate::payments::{AirtablePrices, MercadoPagoClient, PriceResolver};

/// Service handles built once at startup and shared read-only by handlers.
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
    pub pipeline: IngestionPipeline,
    pub prices: PriceResolver,
    pub payments: MercadoPagoClient,
}

pub struct App {
    state: Arc<AppState>,
}

impl App {
    pub fn db(&self) -> &SqlitePool {
        &self.state.db
    }

    pub async fn new(config: Config) -> Result<Self> {
        let db = db::connect(&config.database_url, config.db_max_connections).await?;

        if store::prices::seed(&db, &config.price_name, config.default_price).await? {
            info!(price = %config.price_name, value = config.default_price, "default price created");
        }

        let mapping = Arc::new(match &config.form_profile_path {
            Some(path) => FieldMapping::load(path)?,
            None => FieldMapping::default(),
        });

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        let renderer = CertificateRenderer::new(
            config.pdf_dir.clone(),
            Branding {
                title: config.certificate_title.clone(),
                organization: config.organization_name.clone(),
                logo_path: config.static_dir.join("logo.png"),
            },
            mapping.clone(),
        );

        let airtable = config
            .airtable
            .clone()
            .map(|airtable| AirtablePrices::new(http_client.clone(), airtable));

        let state = Arc::new(AppState {
            db: db.clone(),
            pipeline: IngestionPipeline::new(db.clone(), mapping, renderer),
            prices: PriceResolver::new(db, airtable, config.default_price),
            payments: MercadoPagoClient::new(http_client, &config),
            config,
        });

        Ok(Self { state })
    }

    pub fn router(&self) -> Router {
        routes::build(self.state.clone())
    }

    /// Closes the database pool once the server has drained.
    pub async fn shutdown(self) {
        self.state.db.close().await;
    }
}
