use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::domain::Establishment;
use crate::error::{AppError, Result};

const CURRENCY: &str = "ARS";

#[derive(Debug, Serialize)]
struct PreferenceRequest<'a> {
    items: [PreferenceItem; 1],
    payer: Payer<'a>,
    external_reference: String,
    back_urls: BackUrls,
    auto_return: &'static str,
}

#[derive(Debug, Serialize)]
struct PreferenceItem {
    title: String,
    quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    unit_price: Decimal,
    currency_id: &'static str,
}

#[derive(Debug, Serialize)]
struct Payer<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct BackUrls {
    success: String,
    failure: String,
    pending: String,
}

#[derive(Debug, Deserialize)]
struct PreferenceResponse {
    id: String,
    init_point: String,
}

/// Creates checkout preferences. Without an access token every request
/// fails, so the service still starts in environments with no provider.
#[derive(Debug, Clone)]
pub struct MercadoPagoClient {
    client: Client,
    api_base: String,
    access_token: Option<String>,
    return_url: String,
}

impl MercadoPagoClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            api_base: config.mercadopago_api_base.trim_end_matches('/').to_string(),
            access_token: config.mercadopago_access_token.clone(),
            return_url: config.payment_return_url.clone(),
        }
    }

    /// Returns the checkout URL (`init_point`) for one registration fee.
    /// `price` is in cents.
    pub async fn create_payment_link(&self, establishment: &Establishment, price: i64) -> Result<String> {
        let token = self
            .access_token
            .as_deref()
            .ok_or_else(|| AppError::PaymentLink("Mercado Pago access token not configured".into()))?;

        let request = PreferenceRequest {
            items: [PreferenceItem {
                title: format!("Registro Establecimiento {}", establishment.name),
                quantity: 1,
                unit_price: Decimal::new(price, 2),
                currency_id: CURRENCY,
            }],
            payer: Payer {
                name: &establishment.name,
                email: &establishment.owner_email,
            },
            external_reference: establishment.id.to_string(),
            back_urls: BackUrls {
                success: format!("{}?status=success", self.return_url),
                failure: format!("{}?status=failure", self.return_url),
                pending: format!("{}?status=pending", self.return_url),
            },
            auto_return: "approved",
        };

        let response = self
            .client
            .post(format!("{}/checkout/preferences", self.api_base))
            .bearer_auth(token)
            .header("X-Idempotency-Key", Uuid::new_v4().to_string())
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::PaymentLink(format!("Mercado Pago API error: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!(establishment_id = establishment.id, %status, "preference rejected");
            return Err(AppError::PaymentLink(format!(
                "Mercado Pago API error ({status}): {error_text}"
            )));
        }

        let preference: PreferenceResponse = response.json().await.map_err(|e| {
            AppError::PaymentLink(format!("failed to parse Mercado Pago response: {e}"))
        })?;

        info!(
            establishment_id = establishment.id,
            preference_id = %preference.id,
            "payment preference created"
        );
        Ok(preference.init_point)
    }
}
