mod client;
mod commands;
mod config;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{establishments, prices, submit};

#[derive(Parser)]
#[command(name = "registro")]
#[command(about = "Registro CLI - Administer the hunting establishment registry")]
#[command(version)]
struct Cli {
    #[arg(long, global = true, help = "API server URL")]
    server: Option<String>,

    #[arg(long, global = true, help = "Output format", default_value = "table")]
    format: output::Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure CLI settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Inspect and edit registration prices
    Prices {
        #[command(subcommand)]
        command: prices::Commands,
    },
    /// Inspect registered establishments
    #[command(alias = "est")]
    Establishments {
        #[command(subcommand)]
        command: establishments::Commands,
    },
    /// Post a JSON form submission to the webhook
    Submit {
        #[arg(help = "Path to a JSON file with the form fields")]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration values
    Set {
        #[arg(long)]
        server: Option<String>,
    },
    /// Show current configuration
    Show,
    /// Get config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut cfg = config::Config::load()?;

    if let Some(server) = &cli.server {
        cfg.server = server.clone();
    }

    match cli.command {
        Commands::Config { command } => match command {
            ConfigCommands::Set { server } => {
                if let Some(s) = server {
                    cfg.server = s;
                }
                cfg.save()?;
                output::print_success("Configuration saved");
            }
            ConfigCommands::Show => {
                println!("Server: {}", cfg.server);
            }
            ConfigCommands::Path => {
                println!("{}", config::config_path()?.display());
            }
        },
        Commands::Prices { command } => {
            prices::run(command, &cfg, cli.format).await?;
        }
        Commands::Establishments { command } => {
            establishments::run(command, &cfg, cli.format).await?;
        }
        Commands::Submit { file } => {
            submit::run(&file, &cfg, cli.format).await?;
        }
    }

    Ok(())
}
