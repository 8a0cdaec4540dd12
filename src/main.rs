use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gmgn_relay::api::{self, AppState};
use gmgn_relay::cli::Cli;
use gmgn_relay::config::Config;
use gmgn_relay::fetch::{Fetcher, IdentityRotator};
use gmgn_relay::gmgn::GmgnClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gmgn_relay=info")),
        )
        .init();

    let config = Config::from_env()?;
    let rotator = IdentityRotator::new(config.provider_host());
    let fetcher = Fetcher::new(rotator, config.retry_policy());
    let client = GmgnClient::new(fetcher, config.base_url.clone());
    let state = AppState {
        config: Arc::new(config),
        client: Arc::new(client),
    };

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("listening on http://{addr}");

    axum::serve(listener, api::router(state))
        .await
        .context("server error")?;
    Ok(())
}
