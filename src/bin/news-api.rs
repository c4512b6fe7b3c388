use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use news_api::config::loader::load_config;
use news_api::config::settings::ClientConfig;
use news_api::utils::logging::{self, LogLevel};
use news_api::TokenManager;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Resource path relative to the API endpoint, e.g. `news`
    resource: String,
    /// Select a single resource by id
    #[arg(long)]
    id: Option<String>,
    /// Query parameter as key=value, repeatable
    #[arg(short, long = "param", value_parser = parse_param)]
    params: Vec<(String, String)>,
    /// YAML config; without it NEWS_API_* environment variables are used
    #[arg(short, long, env = "NEWS_API_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
}

fn parse_param(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected key=value, got '{}'", raw))?;
    Ok((key.to_owned(), value.to_owned()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // -------------------------------
    // 1. Load config and start logging
    // -------------------------------

    let (client_config, logging_config) = match &args.config {
        Some(path) => {
            let service_config = load_config(path)
                .await
                .with_context(|| format!("failed to load config {}", path.display()))?;
            (service_config.client, service_config.logging)
        }
        None => (ClientConfig::from_env()?, None),
    };
    logging::init_logging(&logging::resolve(logging_config.as_ref(), args.log_level));

    // -------------------------------
    // 2. Request the resource
    // -------------------------------

    let mut params: HashMap<String, String> = args.params.into_iter().collect();
    if let Some(id) = args.id {
        params.insert("id".to_owned(), id);
    }

    let manager = TokenManager::new(client_config).await?;
    info!("requesting '{}'", args.resource);
    let body = manager.authorized_get(&args.resource, &params).await?;

    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
