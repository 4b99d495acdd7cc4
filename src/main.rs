use std::error::Error;
use tokio::{net::TcpListener, signal, sync::watch};

use company_api::{
    config::Config, create_router, health::health_router, init_tracing, storage, AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Loads .env, then validates everything before the core runs
    let config = Config::from_env()?;
    init_tracing(&config);

    tracing::info!("Company API - Starting...");
    tracing::debug!(?config, "Configuration loaded");

    let storage = storage::connect(&config).await?;
    let state = AppState::new(&config, storage.clone());
    let dispatcher = state.dispatcher.clone();
    let app = create_router(state);

    let api_listener = TcpListener::bind(config.api_addr()).await?;
    let health_listener = TcpListener::bind(config.health_addr()).await?;

    tracing::info!("Company API is running on http://{}", config.api_addr());
    tracing::info!("Swagger UI available at http://{}/swagger-ui", config.api_addr());
    tracing::info!("Health check available at http://{}/health", config.health_addr());

    // One signal stops both listeners
    let (shutdown_tx, shutdown_rx) = watch::channel(());
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(());
    });

    let api = axum::serve(api_listener, app).with_graceful_shutdown(stopped(shutdown_rx.clone()));
    let health =
        axum::serve(health_listener, health_router()).with_graceful_shutdown(stopped(shutdown_rx));

    let (api_result, health_result) = tokio::join!(async { api.await }, async { health.await });

    // Events spawned by the last requests are recorded before the pool goes away
    dispatcher.drain().await;
    storage.close().await;
    api_result?;
    health_result?;

    tracing::info!("Service shutdown complete");
    Ok(())
}

async fn stopped(mut rx: watch::Receiver<()>) {
    let _ = rx.changed().await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, starting graceful shutdown"),
        _ = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}
