use axum::{routing::get, Json, Router};
use price_relay::state::AppState;
use price_relay::transport::http::serve;
use std::future::pending;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub fn sample_quote() -> serde_json::Value {
    serde_json::json!({"USD": 61851.46, "JPY": 7036851.15, "EUR": 53109.28})
}

/// Start the relay on 127.0.0.1 with a fresh state
pub async fn start_relay() -> (SocketAddr, AppState) {
    let index = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("index.html");
    let state = AppState::new(index);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server_state = state.clone();
    tokio::spawn(async move {
        serve(listener, server_state, pending()).await.unwrap();
    });

    (addr, state)
}

/// Mock CryptoCompare answering `/data/price` with `body`
pub async fn start_upstream(body: serde_json::Value) -> String {
    let app = Router::new().route(
        "/data/price",
        get(move || {
            let body = body.clone();
            async move { Json(body) }
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Open a WebSocket as `user_id` and wait until the relay has registered it
pub async fn connect(addr: SocketAddr, state: &AppState, user_id: &str) -> Client {
    let before = state.registry.connection_count();
    let (socket, _) = connect_async(format!("ws://{}/ws?userId={}", addr, user_id))
        .await
        .expect("WebSocket handshake failed");
    wait_until(|| state.registry.connection_count() > before).await;
    socket
}

pub async fn wait_until<F: Fn() -> bool>(condition: F) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}

pub async fn get_json(url: String) -> (reqwest::StatusCode, serde_json::Value) {
    let response = reqwest::get(url).await.unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}
