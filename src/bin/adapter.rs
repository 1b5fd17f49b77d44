//! Headless adapter: JSON line protocol on stdin/stdout.
//!
//! stdout carries protocol lines only; logs go to stderr (filter from
//! `CASCADE_LOG`, default `warn`).

use anyhow::Result;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use tile_cascade::adapter::{run, AdapterConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_env("CASCADE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = AdapterConfig::from_env();
    run(config, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}
