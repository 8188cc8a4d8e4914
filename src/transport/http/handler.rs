//! HTTP request handlers
//!
//! Implements handlers for:
//! - GET /: static demo page
//! - GET /pushPrices/{user_id}: push the cached quote to one user
//! - GET /health: liveness and counters

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::{HttpTransportError, Result};
use crate::cryptocompare::PriceQuote;
use crate::state::{AppState, Session};

/// Debug view of both caches returned by the push endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub clients_cache: BTreeMap<String, Session>,
    pub crypto_currencies_prices: BTreeMap<String, PriceQuote>,
}

impl StateSnapshot {
    pub fn capture(state: &AppState) -> Self {
        Self {
            clients_cache: state.registry.snapshot(),
            crypto_currencies_prices: state.prices.snapshot(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub connections: usize,
    pub users: usize,
    pub symbols: usize,
    pub last_price_update: Option<DateTime<Utc>>,
}

/// GET /
pub async fn index(State(state): State<AppState>) -> Result<Response> {
    let page = tokio::fs::read(&state.index_html)
        .await
        .map_err(HttpTransportError::StaticPage)?;

    Ok((
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        page,
    )
        .into_response())
}

/// GET /pushPrices/{user_id}
///
/// Queues `{"BTC": <quote>}` on the user's live connection, if any, then
/// returns the state snapshot. An unknown user is not an error.
pub async fn push_prices(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<StateSnapshot>> {
    let payload = serde_json::to_string(&state.prices.price_update())?;

    match state.registry.send_to_user(&user_id, payload) {
        Some(session) => {
            tracing::info!(
                user_id = %session.user_id,
                connection_id = %session.connection_id,
                "Pushed prices"
            );
        }
        None => {
            tracing::debug!(user_id = %user_id, "No live connection; push skipped");
        }
    }

    Ok(Json(StateSnapshot::capture(&state)))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        connections: state.registry.connection_count(),
        users: state.registry.user_count(),
        symbols: state.prices.len(),
        last_price_update: state.prices.updated_at(),
    })
}
