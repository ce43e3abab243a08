// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use lostfound_node::{api::start_server, cli::Cli, version};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    tracing::info!("🚀 Starting {}", version::get_version_string());
    tracing::info!("📦 Build: {}", version::VERSION);
    tracing::info!(
        "💾 Database: {}, uploads: {}",
        config.storage.database_url,
        config.storage.upload_dir.display()
    );

    start_server(config).await
}
