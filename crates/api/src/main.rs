//! Data Desk - Main Entry Point
//!
//! Usage: `data-desk [CONFIG_FILE]`. Without an argument `data-desk.toml` is
//! read from the working directory if present.

use anyhow::Context;
use api::{init_logging, run_server, ApiConfig};
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = ApiConfig::load(config_path.as_deref()).context("loading configuration")?;

    init_logging(&config.logging).context("installing log subscriber")?;

    info!("=== Data Desk v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "Cleaning bounds: year_built {}-{}, sale_price {:?}, acreage < {}",
        config.cleaning.min_year_built,
        config.cleaning.max_year_built,
        config.cleaning.sale_price_range,
        config.cleaning.acreage_limit
    );

    run_server(config).await
}
