use crate::common::{connect, get_json, start_relay, wait_until};

#[tokio::test]
async fn test_disconnect_clears_both_keys() {
    let (addr, state) = start_relay().await;

    let mut socket = connect(addr, &state, "u1").await;
    let session = state.registry.session_for_user("u1").expect("session registered");
    let snapshot = state.registry.snapshot();
    assert_eq!(snapshot.get("u1"), Some(&session));
    assert_eq!(snapshot.get(&session.connection_id), Some(&session));

    socket.close(None).await.unwrap();
    wait_until(|| state.registry.connection_count() == 0).await;

    let snapshot = state.registry.snapshot();
    assert!(!snapshot.contains_key("u1"));
    assert!(!snapshot.contains_key(&session.connection_id));
    assert!(state.registry.session_for_user("u1").is_none());
}

#[tokio::test]
async fn test_dropped_socket_is_unregistered() {
    let (addr, state) = start_relay().await;

    let socket = connect(addr, &state, "u1").await;
    drop(socket);

    wait_until(|| state.registry.connection_count() == 0).await;
    assert_eq!(state.registry.user_count(), 0);
}

#[tokio::test]
async fn test_reconnect_without_disconnect() {
    let (addr, state) = start_relay().await;

    let mut first = connect(addr, &state, "u1").await;
    let first_session = state.registry.session_for_user("u1").unwrap();
    let _second = connect(addr, &state, "u1").await;
    let second_session = state.registry.session_for_user("u1").unwrap();

    assert_ne!(first_session.connection_id, second_session.connection_id);

    // Two connection entries, one user entry pointing at the newest session
    let (_, body) = get_json(format!("http://{}/pushPrices/nobody", addr)).await;
    let clients = body["clientsCache"].as_object().unwrap();
    assert_eq!(clients.len(), 3);
    assert_eq!(
        clients["u1"]["connectionId"].as_str(),
        Some(second_session.connection_id.as_str())
    );
    assert!(clients.contains_key(&first_session.connection_id));
    assert!(clients.contains_key(&second_session.connection_id));

    // Closing the stale connection keeps the user on the newer one
    first.close(None).await.unwrap();
    wait_until(|| state.registry.connection_count() == 1).await;
    assert_eq!(state.registry.session_for_user("u1"), Some(second_session));
}

#[tokio::test]
async fn test_missing_user_id_is_accepted() {
    let (addr, state) = start_relay().await;

    let (socket, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws", addr))
        .await
        .unwrap();
    wait_until(|| state.registry.connection_count() == 1).await;
    assert!(state.registry.session_for_user("").is_some());

    drop(socket);
}

#[tokio::test]
async fn test_health_reports_connections() {
    let (addr, state) = start_relay().await;
    let _socket = connect(addr, &state, "u1").await;

    let (status, body) = get_json(format!("http://{}/health", addr)).await;
    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["connections"], 1);
    assert_eq!(body["users"], 1);
}
