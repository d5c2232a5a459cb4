//! Integration tests for the GraphQL registry client.
//!
//! Each test starts a local axum server standing in for the registry and
//! points an `RdpcClient` at it.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use secrecy::Secret;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ingestion_node::adapters::{RdpcClient, RdpcConfig};
use ingestion_node::application::{AnalysisResolver, RetryPolicy};
use ingestion_node::domain::foundation::AnalysisId;
use ingestion_node::ports::{AnalysisRegistry, RegistryError};

// =============================================================================
// Stub server
// =============================================================================

type Responder = dyn Fn(usize, &Value) -> (StatusCode, Value) + Send + Sync;

struct StubRegistry {
    calls: AtomicUsize,
    last_request: Mutex<Option<Value>>,
    last_authorization: Mutex<Option<String>>,
    delay: Duration,
    respond: Box<Responder>,
}

async fn graphql(
    State(stub): State<Arc<StubRegistry>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let call = stub.calls.fetch_add(1, Ordering::SeqCst) + 1;
    *stub.last_request.lock().unwrap() = Some(body.clone());
    *stub.last_authorization.lock().unwrap() = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if !stub.delay.is_zero() {
        tokio::time::sleep(stub.delay).await;
    }

    let (status, value) = (stub.respond)(call, &body);
    (status, Json(value))
}

async fn start_stub<F>(delay: Duration, respond: F) -> (SocketAddr, Arc<StubRegistry>)
where
    F: Fn(usize, &Value) -> (StatusCode, Value) + Send + Sync + 'static,
{
    let stub = Arc::new(StubRegistry {
        calls: AtomicUsize::new(0),
        last_request: Mutex::new(None),
        last_authorization: Mutex::new(None),
        delay,
        respond: Box::new(respond),
    });

    let app = Router::new()
        .route("/graphql", post(graphql))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, stub)
}

fn client_for(addr: SocketAddr) -> RdpcClient {
    RdpcClient::new(RdpcConfig::new(format!("http://{}/graphql", addr))).unwrap()
}

fn analysis_json(analysis_id: &str) -> Value {
    json!({
        "analysisId": analysis_id,
        "analysisType": "sequencing_experiment",
        "analysisState": "PUBLISHED",
        "studyId": "S1",
        "donors": [{"donorId": "D1"}, {"donorId": "D1"}, {"donorId": "D2"}],
        "files": [{"dataType": "BAM"}],
        "experiment": {"experimental_strategy": "WGS"}
    })
}

fn id(value: &str) -> AnalysisId {
    AnalysisId::new(value).unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn fetches_and_maps_first_analysis() {
    let (addr, stub) = start_stub(Duration::ZERO, |_, body| {
        let requested = body["variables"]["analysisId"].as_str().unwrap_or_default();
        (
            StatusCode::OK,
            json!({"data": {"analyses": [analysis_json(requested)]}}),
        )
    })
    .await;

    let record = client_for(addr).get_analysis_details(&id("A1")).await.unwrap();

    assert_eq!(record.analysis_id().as_str(), "A1");
    assert_eq!(record.donor_ids(), &["D1", "D2"]);
    assert_eq!(record.experimental_strategy(), "WGS");

    let request = stub.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(request["operationName"], "GetAnalysisDetails");
    assert!(request["query"].as_str().unwrap().contains("analyses"));
}

#[tokio::test]
async fn sends_bearer_token_when_configured() {
    let (addr, stub) = start_stub(Duration::ZERO, |_, _| {
        (StatusCode::OK, json!({"data": {"analyses": [analysis_json("A1")]}}))
    })
    .await;

    let config = RdpcConfig::new(format!("http://{}/graphql", addr))
        .with_auth_token(Secret::new("t0ken".to_string()));
    RdpcClient::new(config)
        .unwrap()
        .get_analysis_details(&id("A1"))
        .await
        .unwrap();

    assert_eq!(
        stub.last_authorization.lock().unwrap().as_deref(),
        Some("Bearer t0ken")
    );
}

#[tokio::test]
async fn empty_analyses_is_not_found() {
    let (addr, _) = start_stub(Duration::ZERO, |_, _| {
        (StatusCode::OK, json!({"data": {"analyses": []}}))
    })
    .await;

    let err = client_for(addr)
        .get_analysis_details(&id("A1"))
        .await
        .unwrap_err();

    assert_eq!(err, RegistryError::not_found("A1"));
}

#[tokio::test]
async fn server_error_is_transport_failure() {
    let (addr, _) = start_stub(Duration::ZERO, |_, _| {
        (StatusCode::SERVICE_UNAVAILABLE, json!({"error": "down"}))
    })
    .await;

    let err = client_for(addr)
        .get_analysis_details(&id("A1"))
        .await
        .unwrap_err();

    assert!(matches!(err, RegistryError::Status { status: 503, .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn slow_registry_times_out() {
    let (addr, _) = start_stub(Duration::from_secs(2), |_, _| {
        (StatusCode::OK, json!({"data": {"analyses": []}}))
    })
    .await;

    let config = RdpcConfig::new(format!("http://{}/graphql", addr))
        .with_timeout(Duration::from_millis(200));
    let err = RdpcClient::new(config)
        .unwrap()
        .get_analysis_details(&id("A1"))
        .await
        .unwrap_err();

    assert!(matches!(err, RegistryError::Timeout { .. }));
}

#[tokio::test]
async fn unreachable_registry_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(addr)
        .get_analysis_details(&id("A1"))
        .await
        .unwrap_err();

    assert!(matches!(err, RegistryError::Network(_)));
}

#[tokio::test]
async fn resolver_waits_for_registry_to_catch_up() {
    let (addr, stub) = start_stub(Duration::ZERO, |call, _| {
        if call < 3 {
            (StatusCode::OK, json!({"data": {"analyses": []}}))
        } else {
            (StatusCode::OK, json!({"data": {"analyses": [analysis_json("A1")]}}))
        }
    })
    .await;

    let resolver = AnalysisResolver::new(
        Arc::new(client_for(addr)),
        RetryPolicy::fixed(15, Duration::from_millis(10)),
    );

    let record = resolver.resolve(&id("A1")).await.unwrap();

    assert_eq!(record.study_id(), "S1");
    assert_eq!(stub.calls.load(Ordering::SeqCst), 3);
}
