use anyhow::Context;
use reqwest::Client;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::config::AirtableConfig;
use crate::store;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    Database,
    Airtable,
    Fallback,
}

/// A price in cents and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceQuote {
    pub value: i64,
    pub source: PriceSource,
}

#[derive(Debug, Deserialize)]
struct AirtableRecords {
    #[serde(default)]
    records: Vec<AirtableRecord>,
}

#[derive(Debug, Deserialize)]
struct AirtableRecord {
    #[serde(default)]
    fields: AirtableFields,
}

#[derive(Debug, Default, Deserialize)]
struct AirtableFields {
    #[serde(rename = "Price")]
    price: Option<Decimal>,
}

/// Reads the first record of an Airtable price table. Its `Price` field is
/// in major units.
#[derive(Clone)]
pub struct AirtablePrices {
    client: Client,
    config: AirtableConfig,
}

impl AirtablePrices {
    pub fn new(client: Client, config: AirtableConfig) -> Self {
        Self { client, config }
    }

    async fn fetch(&self) -> anyhow::Result<i64> {
        let url = format!(
            "{}/v0/{}/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.base_id,
            self.config.table_name
        );

        let records: AirtableRecords = self
            .client
            .get(url)
            .bearer_auth(&self.config.api_key)
            .query(&[("maxRecords", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let price = records
            .records
            .first()
            .and_then(|r| r.fields.price)
            .context("no Price field in Airtable records")?;

        (price * Decimal::ONE_HUNDRED)
            .round()
            .to_i64()
            .context("Airtable price out of range")
    }
}

/// Current registration price. Lookup failures never surface to callers:
/// they degrade to the configured default and are logged, and the quote
/// says so.
#[derive(Clone)]
pub struct PriceResolver {
    db: SqlitePool,
    airtable: Option<AirtablePrices>,
    default_value: i64,
}

impl PriceResolver {
    pub fn new(db: SqlitePool, airtable: Option<AirtablePrices>, default_value: i64) -> Self {
        Self {
            db,
            airtable,
            default_value,
        }
    }

    pub async fn current(&self, name: &str) -> PriceQuote {
        let looked_up = match &self.airtable {
            Some(airtable) => airtable
                .fetch()
                .await
                .map(|value| (value, PriceSource::Airtable)),
            None => store::prices::get(&self.db, name)
                .await
                .map(|price| (price.value, PriceSource::Database))
                .map_err(anyhow::Error::from),
        };

        match looked_up {
            Ok((value, source)) => {
                debug!(price = name, value, ?source, "price resolved");
                PriceQuote { value, source }
            }
            Err(err) => {
                warn!(
                    price = name,
                    error = %err,
                    default = self.default_value,
                    "price lookup failed, using default"
                );
                PriceQuote {
                    value: self.default_value,
                    source: PriceSource::Fallback,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[tokio::test]
    async fn reads_price_from_database() {
        let pool = db::memory().await.unwrap();
        store::prices::upsert(&pool, "Inscripcion", 4200).await.unwrap();

        let quote = PriceResolver::new(pool, None, 1000)
            .current("Inscripcion")
            .await;

        assert_eq!(
            quote,
            PriceQuote {
                value: 4200,
                source: PriceSource::Database
            }
        );
    }

    #[tokio::test]
    async fn missing_price_falls_back_to_default() {
        let pool = db::memory().await.unwrap();

        let quote = PriceResolver::new(pool, None, 1000).current("Inscripcion").await;

        assert_eq!(quote.source, PriceSource::Fallback);
        assert_eq!(quote.value, 1000);
    }

    #[tokio::test]
    async fn unreachable_airtable_falls_back_to_default() {
        let pool = db::memory().await.unwrap();
        store::prices::upsert(&pool, "Inscripcion", 4200).await.unwrap();
        let airtable = AirtablePrices::new(
            Client::new(),
            AirtableConfig {
                api_key: "key".into(),
                base_id: "app".into(),
                table_name: "Prices".into(),
                api_base: "http://127.0.0.1:9".into(),
            },
        );

        let quote = PriceResolver::new(pool, Some(airtable), 1000)
            .current("Inscripcion")
            .await;

        assert_eq!(quote.source, PriceSource::Fallback);
        assert_eq!(quote.value, 1000);
    }
}
