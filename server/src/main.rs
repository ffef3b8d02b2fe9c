//! Meter reading API server.
//!
//! Run from repo root: `cargo run -p meter-reading-server`
//! Reads `.env` when present; see `ServerConfig` for the variables.

use meter_reading_api::{
    app, ensure_database_exists, AppState, DocumentStore, MemoryDocumentStore, PgDocumentStore, ServerConfig,
    StoreBackend, CUSTOMER_COLLECTION, READING_COLLECTION,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("meter_reading_api=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let store: Arc<dyn DocumentStore> = match (&config.backend, &config.database_url) {
        (StoreBackend::Postgres, Some(url)) => {
            let store = PgDocumentStore::connect_lazy(
                url,
                config.max_connections,
                config.acquire_timeout(),
                config.schema.clone(),
            )?;
            // The server still starts when the database is down; /test reports it.
            let bootstrap = async {
                ensure_database_exists(url).await?;
                store.ensure_collections(&[CUSTOMER_COLLECTION, READING_COLLECTION]).await
            };
            if let Err(e) = bootstrap.await {
                tracing::warn!(error = %e, "database bootstrap failed");
            }
            Arc::new(store)
        }
        _ => {
            tracing::warn!("using in-memory store; data is lost on exit");
            Arc::new(MemoryDocumentStore::new())
        }
    };

    let state = AppState::new(store, config.database_url.is_some());
    let router = app(state, config.body_limit_bytes);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutting down");
}
