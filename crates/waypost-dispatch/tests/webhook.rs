//! End-to-end dispatch tests against a local webhook receiver

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use waypost_core::{DispatchConfig, Stimulus, TaskId, TaskRequest};
use waypost_dispatch::{DispatchError, HttpTaskDispatcher, TaskDispatcher};

#[derive(Clone, Default)]
struct Received {
    calls: Arc<Mutex<Vec<(HashMap<String, String>, Value)>>>,
}

async fn accept(
    State(received): State<Received>,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> StatusCode {
    received.calls.lock().unwrap().push((params, body));
    StatusCode::OK
}

async fn reject(
    State(received): State<Received>,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> StatusCode {
    received.calls.lock().unwrap().push((params, body));
    StatusCode::BAD_GATEWAY
}

async fn start_webhook(accepting: bool) -> (SocketAddr, Received) {
    let received = Received::default();
    let route = if accepting { post(accept) } else { post(reject) };
    let app = Router::new()
        .route("/hook", route)
        .with_state(received.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, received)
}

fn dispatcher_for(addr: SocketAddr) -> HttpTaskDispatcher {
    HttpTaskDispatcher::new(
        reqwest::Client::new(),
        DispatchConfig {
            webhook_url: format!("http://{}/hook", addr),
            request_timeout_secs: 5,
        },
    )
}

fn sample_request() -> TaskRequest {
    let stimulus = Stimulus::new(TaskId::new("task-1"), "approve-po")
        .with_shared_secret("s3cret")
        .with_route_url("/tasks/approve")
        .with_allowed_roles(vec!["Manager".to_string(), "Clerk".to_string()]);

    let mut payload = BTreeMap::new();
    payload.insert("poNumber".to_string(), Value::from("PO-77"));
    payload.insert("amount".to_string(), Value::from(1250));

    TaskRequest::from_stimulus(Uuid::new_v4(), &stimulus, Some(payload))
}

#[tokio::test]
async fn test_dispatch_delivers_body_and_secret() {
    let (addr, received) = start_webhook(true).await;
    let dispatcher = dispatcher_for(addr);

    dispatcher
        .dispatch(&sample_request(), &CancellationToken::new())
        .await
        .unwrap();

    let calls = received.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);

    let (params, body) = &calls[0];
    assert_eq!(params.get("sharedSecret").map(String::as_str), Some("s3cret"));
    assert_eq!(body["taskId"], "task-1");
    assert_eq!(body["taskName"], "approve-po");
    assert_eq!(body["payload"]["poNumber"], "PO-77");
    assert_eq!(body["payload"]["amount"], 1250);
    assert_eq!(body["routeUrl"], "/tasks/approve");
    assert_eq!(body["allowedRoles"][0], "Manager");
    assert!(body["detailedDescription"].is_null());
    assert!(body.get("sharedSecret").is_none());
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let (addr, received) = start_webhook(false).await;
    let dispatcher = dispatcher_for(addr);

    let err = dispatcher
        .dispatch(&sample_request(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::Status(status) if status.as_u16() == 502));
    // The receiver did see the request; failure is about the response.
    assert_eq!(received.calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_cancellation_aborts_the_call() {
    let (addr, _received) = start_webhook(true).await;
    let dispatcher = dispatcher_for(addr);

    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = dispatcher
        .dispatch(&sample_request(), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::Cancelled));
}

#[tokio::test]
async fn test_unreachable_webhook_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dispatcher = dispatcher_for(addr);
    let err = dispatcher
        .dispatch(&sample_request(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::Transport(_)));
}
