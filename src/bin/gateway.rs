use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use veegox_gateway::config::Config;
use veegox_gateway::gateway::Gateway;
use veegox_gateway::server;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "veegox_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting chain gateway");

    let config = Config::from_env()?;
    info!("Configuration loaded");
    info!("Price source: {:?}", config.price_source);
    info!(
        "Upstream timeout {}s, {} retr(ies)",
        config.request_timeout.as_secs(),
        config.max_retries
    );

    let gateway = Gateway::new(config)?;

    if let Err(e) = server::serve(gateway).await {
        error!("Server error: {}", e);
        return Err(e);
    }

    Ok(())
}
