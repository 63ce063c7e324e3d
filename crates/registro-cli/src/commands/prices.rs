use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::Subcommand;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::client::ApiClient;
use crate::config::Config;
use crate::output::{self, display_cents, Format};

#[derive(Subcommand)]
pub enum Commands {
    /// List all prices
    List,
    /// Set a price, creating it if needed
    Set {
        #[arg(help = "Price name, e.g. Inscripcion")]
        name: String,
        #[arg(help = "Amount in pesos, e.g. 2500 or 2500.50")]
        value: Decimal,
    },
}

#[derive(Debug, Serialize)]
struct UpdateRequest {
    value: i64,
}

#[derive(Debug, Serialize, Deserialize, Tabled)]
pub struct Price {
    pub id: i64,
    pub name: String,
    #[tabled(display_with = "display_cents")]
    pub value: i64,
    pub updated_at: DateTime<Utc>,
}

fn to_cents(pesos: Decimal) -> Result<i64> {
    if pesos.is_sign_negative() {
        bail!("price must not be negative");
    }
    (pesos * Decimal::ONE_HUNDRED)
        .round()
        .to_i64()
        .context("price out of range")
}

/// Price names are free text; encode them as a single path segment.
fn price_path(name: &str) -> String {
    format!("/prices/{}", urlencoding::encode(name))
}

pub async fn run(cmd: Commands, config: &Config, format: Format) -> Result<()> {
    let client = ApiClient::new(config);

    match cmd {
        Commands::List => {
            let prices: Vec<Price> = client.get("/prices").await?;
            output::print_items(prices, format)?;
        }
        Commands::Set { name, value } => {
            let req = UpdateRequest {
                value: to_cents(value)?,
            };
            let price: Price = client.put(&price_path(&name), &req).await?;
            if let Format::Table = format {
                output::print_success("Price updated");
            }
            output::print_item(price, format)?;
        }
    }

    Ok(())
}
