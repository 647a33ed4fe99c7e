#![allow(dead_code)]

use std::{net::SocketAddr, time::Duration};

use nomi_rooms::{app, config::Settings, state::AppState};
use serde_json::{json, Value};

/// Serve the full app on an ephemeral port.
pub async fn spawn_server(settings: Settings) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = AppState::new(&settings);
    let router = app(state, &settings);
    tokio::spawn(async move {
        axum::serve(listener, router.into_make_service()).await.unwrap();
    });
    addr
}

pub async fn spawn_default() -> SocketAddr { spawn_server(Settings::default()).await }

pub fn api(addr: SocketAddr, path: &str) -> String { format!("http://{addr}/api/v1{path}") }

pub async fn create_room(client: &reqwest::Client, addr: SocketAddr, name: &str) -> String {
    let resp = client.post(api(addr, "/rooms")).json(&json!({ "name": name })).send().await.unwrap();
    assert_eq!(resp.status(), 201);
    resp.json::<Value>().await.unwrap()["id"].as_str().unwrap().to_owned()
}

pub async fn broadcast(client: &reqwest::Client, addr: SocketAddr, room: &str, text: &str) -> Value {
    let resp = client
        .post(api(addr, &format!("/rooms/{room}/broadcast")))
        .json(&json!({ "messageText": text }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    resp.json().await.unwrap()
}

/// Poll /health until the hub reports `n` live connections.
pub async fn wait_for_connections(client: &reqwest::Client, addr: SocketAddr, n: u64) {
    for _ in 0..100 {
        let health: Value = client
            .get(format!("http://{addr}/health"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        if health["connections"] == json!(n) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("hub never reached {n} connections");
}
