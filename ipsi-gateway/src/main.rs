use anyhow::Context;
use ipsi_gateway::{routes, AppState, IpsiConfig};
use std::{env, net::SocketAddr};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = IpsiConfig::from_env().context("failed to load IPSI configuration")?;
    info!(
        username = %config.username,
        config_id = %config.config_id,
        endpoint = %config.endpoint(),
        "loaded IPSI configuration"
    );
    let app = routes::router(AppState::new(config));

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8087".to_string())
        .parse()?;
    let addr = SocketAddr::new(host.parse()?, port);
    info!(%addr, "starting ipsi-gateway");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
