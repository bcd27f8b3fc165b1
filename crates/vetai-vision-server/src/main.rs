use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use vetai_vision_core::config::{APP_NAME, APP_VERSION};
use vetai_vision_server::{start_server, ServerConfig, SimulatedDetector};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    tracing::info!("{} analysis endpoint starting v{}", APP_NAME, APP_VERSION);
    tracing::info!(
        bind_addr = %config.bind_addr,
        vision_credentials = config.vision_credentials.is_some(),
        "Configuration loaded"
    );

    let server = start_server(&config, Arc::new(SimulatedDetector)).await?;
    tracing::info!(addr = %server.addr(), "Listening");

    tokio::signal::ctrl_c().await?;
    server.shutdown().await;

    Ok(())
}
