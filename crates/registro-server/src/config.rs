use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Clone)]
pub struct AirtableConfig {
    pub api_key: String,
    pub base_id: String,
    pub table_name: String,
    pub api_base: String,
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub db_max_connections: u32,
    pub otlp_endpoint: Option<String>,
    pub log_format: LogFormat,
    pub static_dir: PathBuf,
    pub pdf_dir: PathBuf,
    pub form_profile_path: Option<PathBuf>,
    pub certificate_title: String,
    pub organization_name: String,
    pub price_name: String,
    pub default_price: i64,
    pub strict_prices: bool,
    pub mercadopago_access_token: Option<String>,
    pub mercadopago_api_base: String,
    pub payment_return_url: String,
    pub airtable: Option<AirtableConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://registro.db".into(),
            bind_address: "0.0.0.0:8000".into(),
            db_max_connections: 5,
            otlp_endpoint: None,
            log_format: LogFormat::Json,
            static_dir: PathBuf::from("static"),
            pdf_dir: PathBuf::from("pdfs"),
            form_profile_path: None,
            certificate_title: "Inscripción de establecimiento para actividad de caza 2026".into(),
            organization_name: "Dirección Provincial de Fauna de Neuquén".into(),
            price_name: "Inscripcion".into(),
            default_price: 1000,
            strict_prices: false,
            mercadopago_access_token: None,
            mercadopago_api_base: "https://api.mercadopago.com".into(),
            payment_return_url: "http://localhost:8000/dashboard".into(),
            airtable: None,
        }
    }
}

/// Unset and blank variables both read as absent.
fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let log_format = match env::var("LOG_FORMAT").as_deref() {
            Ok("pretty") => LogFormat::Pretty,
            Ok("json") | Err(_) => LogFormat::Json,
            Ok(other) => anyhow::bail!("unsupported LOG_FORMAT: {other}"),
        };

        let airtable = match (non_empty("AIRTABLE_API_KEY"), non_empty("AIRTABLE_BASE_ID")) {
            (Some(api_key), Some(base_id)) => Some(AirtableConfig {
                api_key,
                base_id,
                table_name: env::var("AIRTABLE_PRICE_TABLE_NAME").unwrap_or_else(|_| "Prices".into()),
                api_base: env::var("AIRTABLE_API_BASE")
                    .unwrap_or_else(|_| "https://api.airtable.com".into()),
            }),
            _ => None,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_address: env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".into())
                .parse()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            otlp_endpoint: non_empty("OTEL_EXPORTER_OTLP_ENDPOINT"),
            log_format,
            static_dir: env::var("STATIC_DIR").map(PathBuf::from).unwrap_or(defaults.static_dir),
            pdf_dir: env::var("PDF_DIR").map(PathBuf::from).unwrap_or(defaults.pdf_dir),
            form_profile_path: non_empty("FORM_PROFILE_PATH").map(PathBuf::from),
            certificate_title: env::var("CERTIFICATE_TITLE").unwrap_or(defaults.certificate_title),
            organization_name: env::var("ORGANIZATION_NAME").unwrap_or(defaults.organization_name),
            price_name: env::var("PRICE_NAME").unwrap_or(defaults.price_name),
            default_price: env::var("DEFAULT_PRICE")
                .unwrap_or_else(|_| "1000".into())
                .parse()
                .context("DEFAULT_PRICE must be an integer amount in cents")?,
            strict_prices: env::var("STRICT_PRICES")
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            mercadopago_access_token: non_empty("MERCADOPAGO_ACCESS_TOKEN"),
            mercadopago_api_base: env::var("MERCADOPAGO_API_BASE")
                .unwrap_or(defaults.mercadopago_api_base),
            payment_return_url: env::var("PAYMENT_RETURN_URL")
                .unwrap_or(defaults.payment_return_url),
            airtable,
        })
    }
}
