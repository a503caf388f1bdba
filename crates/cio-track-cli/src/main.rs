use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use cio_track::{load_client_config, Attributes, ClientConfig, StaticIdentity, TrackingClient};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cio-track", version, about = "Customer.io tracking CLI")]
struct Cli {
    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create or update a customer
    Identify {
        #[arg(long)]
        id: String,
        /// Customer attributes in key=value format (can be specified multiple times)
        #[arg(long = "attr", value_name = "KEY=VALUE")]
        attrs: Vec<String>,
    },
    /// Delete a customer
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Record an event for a customer
    Track {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        /// Event data in key=value format (can be specified multiple times)
        #[arg(long = "data", value_name = "KEY=VALUE")]
        data: Vec<String>,
        /// Unix timestamp in seconds
        #[arg(long)]
        timestamp: Option<i64>,
    },
    /// Show the resolved configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_client_config()?;
    match cli.cmd {
        Command::Identify { id, attrs } => {
            let identity = StaticIdentity::new(id).with_attributes(parse_pairs(&attrs)?);
            client(&config, identity)?.identify().await?;
        }
        Command::Delete { id } => {
            client(&config, StaticIdentity::new(id))?
                .delete_customer()
                .await?;
        }
        Command::Track {
            id,
            name,
            data,
            timestamp,
        } => {
            let data = if data.is_empty() {
                None
            } else {
                Some(parse_pairs(&data)?)
            };
            let timestamp = timestamp.map(parse_timestamp).transpose()?;
            client(&config, StaticIdentity::new(id))?
                .track_event(name, data, timestamp)
                .await?;
        }
        Command::Config => print_config(&config),
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "cio_track=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn client(config: &ClientConfig, identity: StaticIdentity) -> Result<TrackingClient> {
    TrackingClient::from_config(config, Arc::new(identity))
        .context("Failed to create tracking client")
}

/// Parse `key=value` pairs; values are JSON when they parse as JSON, strings otherwise
fn parse_pairs(pairs: &[String]) -> Result<Attributes> {
    let mut attributes = Attributes::new();
    for pair in pairs {
        let Some((key, raw)) = pair.split_once('=') else {
            bail!("Expected KEY=VALUE, got '{}'", pair);
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("Empty key in '{}'", pair);
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        attributes.insert(key.to_string(), value);
    }
    Ok(attributes)
}

fn parse_timestamp(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(secs, 0).with_context(|| format!("Timestamp out of range: {}", secs))
}

fn print_config(config: &ClientConfig) {
    println!("base_url     = {}", config.base_url);
    println!("timeout_secs = {}", config.timeout_secs);
    println!(
        "site_id      = {}",
        config.site_id.as_deref().unwrap_or("(not set)")
    );
    println!("api_key      = {}", mask(config.api_key.as_deref()));
}

fn mask(secret: Option<&str>) -> String {
    match secret {
        None => "(not set)".to_string(),
        Some(s) => {
            let chars: Vec<char> = s.chars().collect();
            if chars.len() <= 4 {
                "****".to_string()
            } else {
                let tail: String = chars[chars.len() - 4..].iter().collect();
                format!("****{}", tail)
            }
        }
    }
}
