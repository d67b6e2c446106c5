//! evebridge: run one data-access operation against an Eve REST API and
//! print the result as JSON.
//!
//! Usage:
//!   evebridge --api-url http://localhost:5000 list posts --sort title --desc
//!   evebridge get posts 5f1d7a3b9c
//!   evebridge update-many posts 1 2 3 --data '{"published": true}'

use anyhow::{Context, Result};
use clap::Parser;
use evebridge_cli::{Args, load_config};
use evebridge_provider::{BroadcastNotifier, EveDataProvider};
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = load_config(&args)?;
    info!("Using API at {}", config.api_url);

    let notifier = Arc::new(BroadcastNotifier::default());
    let mut events = notifier.subscribe();
    let provider = EveDataProvider::from_config(config)
        .context("Failed to create data provider")?
        .with_notifier(notifier);

    let (resource, operation) = args.command.into_operation();
    let kind = operation.kind();
    let result = provider
        .execute(&resource, operation)
        .await
        .with_context(|| format!("{kind} on '{resource}' failed"))?;

    while let Ok(event) = events.try_recv() {
        info!("Received {} notification", event);
    }

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
