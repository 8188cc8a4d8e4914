use futures_util::StreamExt;
use price_relay::cryptocompare::{PriceClient, PriceQuote};
use std::time::Duration;
use tokio_tungstenite::tungstenite::Message;

use crate::common::{connect, get_json, sample_quote, start_relay, start_upstream, Client};

async fn next_text(socket: &mut Client) -> serde_json::Value {
    let message = tokio::time::timeout(Duration::from_secs(2), socket.next())
        .await
        .expect("no message received")
        .expect("socket closed")
        .unwrap();
    match message {
        Message::Text(text) => serde_json::from_str(text.as_str()).unwrap(),
        other => panic!("unexpected frame: {:?}", other),
    }
}

async fn assert_silent(socket: &mut Client) {
    let result = tokio::time::timeout(Duration::from_millis(200), socket.next()).await;
    assert!(result.is_err(), "unexpected extra message");
}

#[tokio::test]
async fn test_push_delivers_exactly_one_message() {
    let (addr, state) = start_relay().await;
    let quote: PriceQuote = serde_json::from_value(sample_quote()).unwrap();
    state.prices.set("BTC", quote);
    let mut socket = connect(addr, &state, "u1").await;

    let (status, body) = get_json(format!("http://{}/pushPrices/u1", addr)).await;
    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(body["cryptoCurrenciesPrices"]["BTC"], sample_quote());
    assert_eq!(body["clientsCache"]["u1"]["userId"], "u1");

    let message = next_text(&mut socket).await;
    assert_eq!(message, serde_json::json!({"BTC": sample_quote()}));
    assert_silent(&mut socket).await;
}

#[tokio::test]
async fn test_push_to_absent_user() {
    let (addr, state) = start_relay().await;
    let mut socket = connect(addr, &state, "u1").await;

    let (status, body) = get_json(format!("http://{}/pushPrices/u2", addr)).await;
    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(body["clientsCache"].as_object().unwrap().len(), 2);
    assert_eq!(body["cryptoCurrenciesPrices"], serde_json::json!({}));

    assert_silent(&mut socket).await;
}

#[tokio::test]
async fn test_reconnected_user_receives_on_newest_socket() {
    let (addr, state) = start_relay().await;
    let mut first = connect(addr, &state, "u1").await;
    let mut second = connect(addr, &state, "u1").await;

    get_json(format!("http://{}/pushPrices/u1", addr)).await;

    assert_eq!(next_text(&mut second).await, serde_json::json!({"BTC": null}));
    assert_silent(&mut first).await;
}

#[tokio::test]
async fn test_fetched_price_reaches_client() {
    let (addr, state) = start_relay().await;
    let upstream = start_upstream(sample_quote()).await;
    let client = PriceClient::new(upstream, Duration::from_secs(5)).unwrap();

    assert!(client.refresh(&state.prices).await);

    let mut socket = connect(addr, &state, "u1").await;
    get_json(format!("http://{}/pushPrices/u1", addr)).await;

    assert_eq!(next_text(&mut socket).await, serde_json::json!({"BTC": sample_quote()}));
}

#[tokio::test]
async fn test_failed_fetch_keeps_stale_price() {
    let (addr, state) = start_relay().await;
    let quote: PriceQuote = serde_json::from_value(sample_quote()).unwrap();
    state.prices.set("BTC", quote.clone());

    let upstream = start_upstream(serde_json::json!({"Response": "Error"})).await;
    let client = PriceClient::new(upstream, Duration::from_secs(5)).unwrap();
    assert!(!client.refresh(&state.prices).await);

    let (_, body) = get_json(format!("http://{}/pushPrices/nobody", addr)).await;
    assert_eq!(body["cryptoCurrenciesPrices"]["BTC"], sample_quote());
    assert_eq!(state.prices.get("BTC"), Some(quote));
}

#[tokio::test]
async fn test_index_page() {
    let (addr, _state) = start_relay().await;

    let response = reqwest::get(format!("http://{}/", addr)).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(
        response.headers()[reqwest::header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
    assert!(response.text().await.unwrap().contains("<title>Price Relay</title>"));
}
