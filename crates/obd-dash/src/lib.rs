//! OBD-II Live Dashboard
//!
//! Wires the adapter client, the sampling loop and a presenter together for
//! the `obd-console` and `obd-panel` binaries.

pub mod config;

pub use config::AppConfig;

use dashboard::{ConsolePresenter, FrameBuffer, Panel, PanelError, PanelPresenter};
use obd_protocol::ObdClient;
use obd_sampler::Sampler;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Initialize logging on stderr so stdout stays free for the dashboard
pub fn init_logging(level: Level) -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Poll and print readings until Ctrl-C
pub async fn run_console(config: &AppConfig) -> anyhow::Result<()> {
    let Some(mut sampler) = connect(config).await else {
        return Ok(());
    };

    let mut presenter = ConsolePresenter::stdout();
    sampler.run(&mut presenter, interrupted()).await;

    println!("\nExiting...");
    Ok(())
}

/// Poll and draw the panel until Ctrl-C
pub async fn run_panel(config: &AppConfig) -> anyhow::Result<()> {
    let device = FrameBuffer::open_device(&config.panel.framebuffer)?;
    let (events, panel) = Panel::channel();
    let _button = attach_button(config, events)?;

    let Some(mut sampler) = connect(config).await else {
        return Ok(());
    };

    let mut presenter = PanelPresenter::new(panel, device);
    sampler.run(&mut presenter, interrupted()).await;

    println!("Exiting...");
    Ok(())
}

async fn connect(config: &AppConfig) -> Option<Sampler<ObdClient>> {
    let mut client = ObdClient::new(config.transport()).with_protocol(config.adapter.protocol);
    client.set_timeout(config.adapter_timeout());

    match Sampler::connect(client, config.sampler_config()).await {
        Ok(sampler) => {
            println!("Connected to OBD-II adapter");
            Some(sampler)
        }
        Err(e) => {
            error!("Connection failed: {}", e);
            println!("Failed to connect to OBD-II adapter");
            None
        }
    }
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
async fn interrupted() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Interrupt received"),
        Err(e) => {
            error!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await
        }
    }
}

#[cfg(feature = "gpio")]
fn attach_button(
    config: &AppConfig,
    events: UnboundedSender<dashboard::ButtonEvent>,
) -> Result<dashboard::GpioButton, PanelError> {
    dashboard::GpioButton::watch(
        config.panel.button_pin,
        std::time::Duration::from_millis(config.panel.debounce_ms),
        events,
    )
}

#[cfg(not(feature = "gpio"))]
fn attach_button(
    _config: &AppConfig,
    events: UnboundedSender<dashboard::ButtonEvent>,
) -> Result<std::thread::JoinHandle<()>, PanelError> {
    Ok(dashboard::spawn_stdin_button(events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use obd_sampler::SamplerConfig;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_mock_session_prints_every_tick() {
        let mut sampler = Sampler::connect(ObdClient::mock(), SamplerConfig::default())
            .await
            .unwrap();
        let mut presenter = ConsolePresenter::new(Vec::new());

        sampler
            .run(&mut presenter, tokio::time::sleep(Duration::from_millis(2500)))
            .await;

        let text = String::from_utf8(presenter.into_inner()).unwrap();
        assert_eq!(text.matches("--- Vehicle Data ---").count(), 3);
        assert_eq!(text.matches("Acceleration:").count(), 2);
        assert!(!text.contains("Checking Diagnostic"));
        assert!(!sampler.adapter().is_connected());
    }

    #[tokio::test]
    async fn test_missing_device_fails_cleanly() {
        let mut config = AppConfig::default();
        config.adapter.device = "/dev/does-not-exist-obd".to_string();

        assert!(connect(&config).await.is_none());
        assert!(run_console(&config).await.is_ok());
    }
}
