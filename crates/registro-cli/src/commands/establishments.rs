use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Subcommand;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabled::Tabled;

use crate::client::ApiClient;
use crate::config::Config;
use crate::output::{self, display_option, Format};

#[derive(Subcommand)]
pub enum Commands {
    /// List registered establishments
    List {
        #[arg(long, help = "Include the raw form submission (JSON output)")]
        full: bool,
    },
    /// Create a Mercado Pago payment link for an establishment
    Pay {
        #[arg(help = "Establishment ID")]
        id: i64,
    },
}

#[derive(Debug, Serialize, Deserialize, Tabled)]
pub struct Establishment {
    pub id: i64,
    pub name: String,
    pub owner_email: String,
    pub cuit: String,
    pub address: String,
    #[tabled(display_with = "display_option")]
    pub pdf_path: Option<String>,
    #[tabled(display_with = "display_option")]
    pub payment_link: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Tabled)]
struct PaymentLink {
    payment_link: String,
}

pub async fn run(cmd: Commands, config: &Config, format: Format) -> Result<()> {
    let client = ApiClient::new(config);

    match cmd {
        Commands::List { full: true } => {
            // Raw submissions have no fixed columns.
            let establishments: Vec<Value> = client.get("/establishments/full").await?;
            output::print_json(&establishments)?;
        }
        Commands::List { full: false } => {
            let establishments: Vec<Establishment> = client.get("/establishments").await?;
            output::print_items(establishments, format)?;
        }
        Commands::Pay { id } => {
            let link: PaymentLink = client
                .post(&format!("/establishments/{}/generate-payment", id), &Value::Null)
                .await?;
            match format {
                Format::Json => output::print_json(&link)?,
                Format::Table => {
                    output::print_success("Payment link created");
                    println!("  {}", link.payment_link);
                }
            }
        }
    }

    Ok(())
}
