//! HTTP transport using Axum
//!
//! Serves the demo page, the push endpoint, a health probe, and the
//! WebSocket channel clients receive prices on.

pub mod error;
pub mod handler;
pub mod ws;

use axum::{routing::get, Router};
use std::future::Future;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::RelayConfig;
use crate::cryptocompare::PriceClient;
use crate::error::Result;
use crate::scheduler::spawn_price_poller;
use crate::state::AppState;

/// Build the relay router
///
/// # Endpoints
/// - GET /: demo page
/// - GET /pushPrices/{user_id}: push the cached quote, returns a state snapshot
/// - GET /health: liveness and counters
/// - GET /ws?userId=<id>: WebSocket upgrade
///
/// # CORS
/// Configured to allow all origins (*) for development.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handler::index))
        .route("/pushPrices/{user_id}", get(handler::push_prices))
        .route("/health", get(handler::health))
        .route("/ws", get(ws::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve the router on an already bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Start the relay: price poller plus HTTP/WebSocket server
///
/// # Errors
/// Returns an error if the listener cannot bind or the price client cannot
/// be built. Fetch failures never surface here.
pub async fn start_http_server(config: RelayConfig) -> Result<()> {
    tracing::info!("Initializing price relay...");

    let state = AppState::from_config(&config);
    let client = PriceClient::new(config.price_api_base_url.clone(), config.fetch_timeout)?;

    let listener = TcpListener::bind(config.addr).await?;
    let addr = listener.local_addr()?;

    tracing::info!("Price relay listening on {}", addr);
    tracing::info!("  Page:      GET http://{}/", addr);
    tracing::info!("  Push:      GET http://{}/pushPrices/{{userId}}", addr);
    tracing::info!("  WebSocket: ws://{}/ws?userId={{userId}}", addr);
    tracing::info!(
        "  Fetch interval: {}s, broadcast on update: {}",
        config.fetch_interval.as_secs(),
        config.broadcast_on_update
    );

    // Create graceful shutdown handler with broadcast channel (supports multiple receivers)
    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);
    let mut server_shutdown_rx = shutdown_tx.subscribe();

    let poller = spawn_price_poller(
        client,
        state.clone(),
        config.fetch_interval,
        config.broadcast_on_update,
        shutdown_tx.subscribe(),
    );

    // Spawn shutdown signal handler
    let signal_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Received shutdown signal (Ctrl+C)");
                let _ = signal_tx.send(());
            }
            Err(err) => {
                tracing::error!("Failed to listen for shutdown signal: {}", err);
            }
        }
    });

    serve(listener, state, async move {
        server_shutdown_rx.recv().await.ok();
        tracing::info!("Shutting down HTTP server...");
    })
    .await?;

    let _ = shutdown_tx.send(());
    if let Err(e) = poller.await {
        tracing::warn!("Price poller ended abnormally: {}", e);
    }

    tracing::info!("Server stopped");
    Ok(())
}
