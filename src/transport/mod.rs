//! Client-facing transport
//!
//! HTTP endpoints and the WebSocket push channel, both served by one Axum
//! router.

pub mod http;
