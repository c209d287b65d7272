use std::net::SocketAddr;

use reqwest::StatusCode;
use serde_json::{Value, json};
use sonar_core::{Channel, Distance, PullBody};
use sonar_hub::api::{self, models::StatusResponse};
use sonar_hub::{AggregateStore, AppState};
use tokio::net::TcpListener;

async fn serve(store: AggregateStore) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, api::app(AppState { store }))
            .await
            .unwrap();
    });

    addr
}

async fn post(addr: SocketAddr, body: &'static str) -> (StatusCode, StatusResponse) {
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/update"))
        .header("content-type", "application/json")
        .body(body)
        .send()
        .await
        .unwrap();

    let status = resp.status();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn pull_reports_minus_one_for_unavailable() {
    let store = AggregateStore::new();
    store.record(Channel::Left, Distance::from_cm(123)).await;
    store.record(Channel::Right, Distance::from_cm(0)).await;
    let addr = serve(store).await;

    let body: Value = reqwest::get(format!("http://{addr}/data"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        body,
        json!({"left": 123, "right": 0, "under": -1, "front": -1, "back": -1})
    );
}

#[tokio::test]
async fn accepted_push_is_visible_on_pull() {
    let store = AggregateStore::new();
    store.record(Channel::Left, Distance::from_cm(77)).await;
    let addr = serve(store.clone()).await;

    let (status, resp) = post(addr, r#"{"front": 42}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert!(resp.success);
    assert_eq!(resp.message, "Data updated");

    let body: PullBody = reqwest::get(format!("http://{addr}/data"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body.front, Distance::from_cm(42));
    assert_eq!(body.left, Distance::from_cm(77));
    assert_eq!(body.back, Distance::Unavailable);
    assert_eq!(store.snapshot().await.get(Channel::Front), Distance::from_cm(42));
}

#[tokio::test]
async fn empty_body_is_no_data() {
    let store = AggregateStore::new();
    let addr = serve(store.clone()).await;

    let (status, resp) = post(addr, "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!resp.success);
    assert_eq!(resp.message, "No data received");
    assert!(resp.error.is_none());
}

#[tokio::test]
async fn malformed_body_leaves_store_untouched() {
    let store = AggregateStore::new();
    store.record(Channel::Front, Distance::from_cm(9)).await;
    let before = store.snapshot().await;
    let addr = serve(store.clone()).await;

    for body in [r#"[42]"#, r#"{"front": "near"}"#, "front=42", r#"{"back": 1"#] {
        let (status, resp) = post(addr, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(resp.message, "Invalid JSON", "{body}");
        assert!(resp.error.is_some());
    }

    assert_eq!(store.snapshot().await, before);
}

#[tokio::test]
async fn health_answers_ok() {
    let addr = serve(AggregateStore::new()).await;

    let resp = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "OK");
}
