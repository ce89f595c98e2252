use fin_dash::{
    bridge::TimedBackend,
    ledger::LedgerBackend,
    load_data, load_settings,
    orchestrator::Orchestrator,
    quotes::ConfiguredQuotes,
    registry::{RefreshRegistry, ViewContext},
    router, AppState,
};
use std::{net::SocketAddr, sync::Arc};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let settings = load_settings()?;
    let data = load_data(&settings.data_path).await;
    info!(
        path = %settings.data_path.display(),
        quotes = settings.quotes.len(),
        "ledger loaded"
    );

    let ledger = LedgerBackend::new(
        settings.data_path.clone(),
        data,
        Arc::new(ConfiguredQuotes::new(settings.quotes.clone())),
    );
    let backend = TimedBackend::new(ledger, settings.bridge_timeout());
    let orchestrator = Orchestrator::new(
        ViewContext::new(Arc::new(backend)),
        RefreshRegistry::standard(),
    );
    orchestrator.bootstrap().await;

    let app = router(AppState::new(orchestrator));
    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        return std::future::pending().await;
    }
    info!("shutting down");
}
