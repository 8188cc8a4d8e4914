//! Periodic price polling

use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::cryptocompare::PriceClient;
use crate::state::AppState;

/// Spawn the price polling task
///
/// Fetches once immediately, then every `period`. Each fetch completes
/// before the next tick is taken, and ticks missed during a slow fetch are
/// skipped, so requests never overlap. With `broadcast_on_update` set,
/// every successful fetch is pushed to all live connections.
pub fn spawn_price_poller(
    client: PriceClient,
    state: AppState,
    period: Duration,
    broadcast_on_update: bool,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            period_secs = period.as_secs(),
            base_url = client.base_url(),
            "Starting price poller"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if client.refresh(&state.prices).await && broadcast_on_update {
                        broadcast_prices(&state);
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("Shutting down price poller...");
                    break;
                }
            }
        }
    })
}

/// Push the current tracked quote to every connection
///
/// # Returns
/// Number of connections the update was queued on
pub fn broadcast_prices(state: &AppState) -> usize {
    let update = state.prices.price_update();
    match serde_json::to_string(&update) {
        Ok(payload) => {
            let delivered = state.registry.broadcast(&payload);
            tracing::debug!(delivered, "Broadcast price update");
            delivered
        }
        Err(e) => {
            tracing::error!("Failed to serialize price update: {}", e);
            0
        }
    }
}
