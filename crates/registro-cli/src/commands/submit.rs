use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use super::establishments::Establishment;
use crate::client::ApiClient;
use crate::config::Config;
use crate::output::{self, Format};

/// Replays a form submission against `/webhook`. Handy for re-sending a
/// payload the form provider failed to deliver.
pub async fn run(file: &Path, config: &Config, format: Format) -> Result<()> {
    let content =
        fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let payload: Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", file.display()))?;
    if !payload.is_object() {
        bail!("{} must contain a JSON object", file.display());
    }

    let establishment: Establishment = ApiClient::new(config).post("/webhook", &payload).await?;

    if let Format::Table = format {
        output::print_success("Establishment registered");
    }
    output::print_item(establishment, format)
}
