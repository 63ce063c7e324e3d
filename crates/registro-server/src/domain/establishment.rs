use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One registration row. `pdf_path` is only set once the certificate has been
/// written; a row without it is a registration whose rendering failed.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Establishment {
    pub id: i64,
    pub name: String,
    pub owner_email: String,
    pub cuit: String,
    pub address: String,
    pub payment_link: Option<String>,
    pub pdf_path: Option<String>,
    #[serde(skip)]
    pub webhook_data: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The four attributes every accepted submission must carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreFields {
    pub name: String,
    pub owner_email: String,
    pub cuit: String,
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct EstablishmentResponse {
    pub id: i64,
    pub name: String,
    pub owner_email: String,
    pub cuit: String,
    pub address: String,
    pub payment_link: Option<String>,
    pub pdf_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Establishment> for EstablishmentResponse {
    fn from(e: Establishment) -> Self {
        Self {
            id: e.id,
            name: e.name,
            owner_email: e.owner_email,
            cuit: e.cuit,
            address: e.address,
            payment_link: e.payment_link,
            pdf_path: e.pdf_path,
            created_at: e.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EstablishmentFullResponse {
    #[serde(flatten)]
    pub establishment: EstablishmentResponse,
    pub webhook_data: Option<String>,
}

impl From<Establishment> for EstablishmentFullResponse {
    fn from(mut e: Establishment) -> Self {
        let webhook_data = e.webhook_data.take();
        Self {
            establishment: e.into(),
            webhook_data,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentLinkResponse {
    pub payment_link: String,
}
