use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tickdash_core::{
    DataAccess, FixtureProvider, MarketDataProvider, ReqwestHttpClient, Symbol, YahooAdapter,
};
use tickdash_web::{create_app, AppState, Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    Symbol::parse(&config.default_symbol).context("invalid --default-symbol")?;

    let provider: Arc<dyn MarketDataProvider> = if config.offline {
        Arc::new(FixtureProvider::new())
    } else {
        let http_client = ReqwestHttpClient::new().context("failed to build http client")?;
        Arc::new(YahooAdapter::new(Arc::new(http_client)).with_timeout_ms(config.timeout_ms))
    };

    let cache = config.cache_config();
    tracing::info!(
        provider = %provider.id(),
        cache_ttl_secs = ?cache.ttl.map(|ttl| ttl.as_secs()),
        cache_capacity = ?cache.capacity,
        "data access configured"
    );

    let state = AppState::new(DataAccess::new(provider, cache), config.default_symbol.clone());
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;
    tracing::info!("tickdash listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
