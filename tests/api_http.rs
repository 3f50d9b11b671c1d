// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /            (service banner)
// - GET /health
// - POST /api/complaints (success + validation rejection)
// - GET /api/complaints  (newest-first ordering)
// - GET /api/analytics
// - OPTIONS preflight CORS headers
// - GET /warmup

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value as Json};
use tower::ServiceExt as _; // for `oneshot`

use complaint_triage::analyze::{ComplaintAnalyzer, LexiconClassifier, LexiconSentiment};
use complaint_triage::api::{create_router, AppState};
use complaint_triage::store::MemoryStore;

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

/// Router backed by the in-process ports and the in-memory store.
fn test_router() -> Router {
    let analyzer = Arc::new(ComplaintAnalyzer::new(
        Arc::new(LexiconClassifier::new()),
        Arc::new(LexiconSentiment::new()),
    ));
    let state = AppState {
        analyzer,
        store: Arc::new(MemoryStore::new()),
    };
    create_router(state)
}

fn post_json(uri: &str, body: Json) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("build POST request")
}

fn get_req(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build GET request")
}

async fn read_json(resp: axum::response::Response) -> Json {
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    serde_json::from_slice(&bytes).expect("parse json body")
}

#[tokio::test]
async fn root_reports_healthy_with_version() {
    let app = test_router();
    let resp = app.oneshot(get_req("/")).await.expect("oneshot /");
    assert_eq!(resp.status(), StatusCode::OK);

    let v = read_json(resp).await;
    assert_eq!(v["status"], "healthy");
    assert!(v.get("message").is_some(), "missing 'message'");
    assert!(v.get("version").is_some(), "missing 'version'");
}

#[tokio::test]
async fn health_reports_database_connected() {
    let app = test_router();
    let resp = app.oneshot(get_req("/health")).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK);

    let v = read_json(resp).await;
    assert_eq!(v["status"], "healthy");
    assert_eq!(v["database"], "connected");
}

#[tokio::test]
async fn create_complaint_returns_fully_analyzed_record() {
    let app = test_router();
    let payload = json!({
        "text": "This is an URGENT refund request, I am furious!!",
        "customer_name": "Priya",
    });

    let resp = app
        .oneshot(post_json("/api/complaints", payload))
        .await
        .expect("oneshot POST /api/complaints");
    assert_eq!(resp.status(), StatusCode::OK);

    let v = read_json(resp).await;
    assert_eq!(v["success"], true);
    let data = &v["data"];
    assert!(!data["id"].as_str().unwrap_or("").is_empty(), "missing id");
    assert_eq!(data["priority"], "High");
    assert_eq!(data["sentiment"], "NEGATIVE");
    assert_eq!(data["original_text"], "This is an URGENT refund request, I am furious!!");
    assert_eq!(data["customer_name"], "Priya");
    assert_eq!(data["timezone"], "Asia/Kolkata");

    // Category must be one of the fixed taxonomy labels.
    let category = data["category"].as_str().expect("category string");
    let taxonomy = [
        "Billing and Payments",
        "Delivery and Shipping",
        "Technical Support",
        "Product Quality",
        "Customer Service",
        "Refund and Returns",
        "Account Issues",
    ];
    assert!(taxonomy.contains(&category), "unexpected category {category}");
}

#[tokio::test]
async fn short_text_is_rejected_with_422_and_nothing_is_stored() {
    let app = test_router();

    let resp = app
        .clone()
        .oneshot(post_json("/api/complaints", json!({ "text": "too short" })))
        .await
        .expect("oneshot POST short text");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let v = read_json(resp).await;
    assert_eq!(v["success"], false);
    assert!(v.get("error").is_some(), "missing 'error'");
    assert!(v.get("detail").is_some(), "missing 'detail'");

    // The rejected complaint never reached the store.
    let resp = app
        .oneshot(get_req("/api/complaints"))
        .await
        .expect("oneshot GET /api/complaints");
    let v = read_json(resp).await;
    assert_eq!(v["data"].as_array().expect("data array").len(), 0);
}

#[tokio::test]
async fn list_returns_newest_first() {
    let app = test_router();

    for text in [
        "my invoice was charged twice this month, please fix it",
        "the courier lost my package and tracking is stuck",
    ] {
        let resp = app
            .clone()
            .oneshot(post_json("/api/complaints", json!({ "text": text })))
            .await
            .expect("oneshot POST");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = app
        .oneshot(get_req("/api/complaints"))
        .await
        .expect("oneshot GET /api/complaints");
    assert_eq!(resp.status(), StatusCode::OK);

    let v = read_json(resp).await;
    assert_eq!(v["success"], true);
    let data = v["data"].as_array().expect("data array");
    assert_eq!(data.len(), 2);

    // Newest first: timestamps must be non-increasing.
    let t0 = data[0]["timestamp"].as_str().expect("timestamp");
    let t1 = data[1]["timestamp"].as_str().expect("timestamp");
    assert!(t0 >= t1, "expected newest first, got {t0} before {t1}");
    assert_eq!(
        data[1]["original_text"],
        "my invoice was charged twice this month, please fix it"
    );
}

#[tokio::test]
async fn analytics_counts_categories_and_sentiments() {
    let app = test_router();

    for text in [
        "refund me now, this purchase was useless",
        "I want my refund, this is a scam",
        "my account is locked and verification fails",
    ] {
        let resp = app
            .clone()
            .oneshot(post_json("/api/complaints", json!({ "text": text })))
            .await
            .expect("oneshot POST");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = app
        .oneshot(get_req("/api/analytics"))
        .await
        .expect("oneshot GET /api/analytics");
    assert_eq!(resp.status(), StatusCode::OK);

    let v = read_json(resp).await;
    assert_eq!(v["success"], true);
    let data = &v["data"];
    assert_eq!(data["total"], 3);
    assert_eq!(data["categories"]["Refund and Returns"], 2);
    assert_eq!(data["categories"]["Account Issues"], 1);

    let sentiments = data["sentiments"].as_object().expect("sentiments map");
    let counted: u64 = sentiments.values().filter_map(Json::as_u64).sum();
    assert_eq!(counted, 3);
}

#[tokio::test]
async fn cors_preflight_is_permissive() {
    let app = test_router();

    let req = Request::builder()
        .method("OPTIONS")
        .uri("/api/complaints")
        .header("origin", "https://complaints.example")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .expect("build OPTIONS request");

    let resp = app.oneshot(req).await.expect("oneshot OPTIONS");
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.headers().get("access-control-allow-origin").is_some(),
        "preflight must carry allow-origin"
    );
}

#[tokio::test]
async fn warmup_primes_ports_and_store() {
    let app = test_router();
    let resp = app.oneshot(get_req("/warmup")).await.expect("oneshot /warmup");
    assert_eq!(resp.status(), StatusCode::OK);

    let v = read_json(resp).await;
    assert_eq!(v["status"], "success");
}
