//! OBD-II Touchscreen Panel - Main Entry Point

use obd_dash::{init_logging, run_panel, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_logging(config.log_level())?;

    info!("=== OBD Panel v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "Adapter: {:?}, framebuffer: {}",
        config.transport(),
        config.panel.framebuffer
    );

    run_panel(&config).await
}
