//! OBD-II Console Dashboard - Main Entry Point

use obd_dash::{init_logging, run_console, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_logging(config.log_level())?;

    info!("=== OBD Console Dashboard v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Adapter: {:?}", config.transport());

    run_console(&config).await
}
