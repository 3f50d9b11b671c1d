//! HTTP surface: routing, request/response envelopes, CORS, and the
//! validation that runs before any AI or store call.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::analyze::ComplaintAnalyzer;
use crate::model::ComplaintInput;
use crate::store::ComplaintStore;

/// Minimum complaint length, enforced before any port or store call.
pub const MIN_TEXT_CHARS: usize = 10;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<ComplaintAnalyzer>,
    pub store: Arc<dyn ComplaintStore>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/warmup", get(warmup))
        .route(
            "/api/complaints",
            get(list_complaints)
                .post(create_complaint)
                .options(preflight),
        )
        .route("/api/analytics", get(analytics))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Two-tier error policy, persistence/API side: these are the failures that
/// are *not* swallowed. AI backend failures never reach this type.
#[derive(Debug)]
pub enum ApiError {
    /// Rejected input; no analysis or persistence happened.
    Validation(String),
    /// Store or other unexpected failure.
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, detail) = match self {
            ApiError::Validation(msg) => {
                let detail = format!("Validation failed: {msg}");
                (StatusCode::UNPROCESSABLE_ENTITY, msg, detail)
            }
            ApiError::Internal(err) => {
                error!(error = ?err, "request failed");
                let msg = err.to_string();
                let detail = format!("Analysis failed: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg, detail)
            }
        };
        let body = json!({ "success": false, "error": error, "detail": detail });
        (status, Json(body)).into_response()
    }
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Complaint triage API is running",
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let database = match state.store.ping().await {
        Ok(()) => "connected",
        Err(_) => "unreachable",
    };
    Json(json!({
        "status": "healthy",
        "message": "Backend is running",
        "database": database,
    }))
}

/// Forces lazy initialization eagerly: primes the AI backends and the store
/// connection so the first real request does not pay the setup cost.
async fn warmup(State(state): State<AppState>) -> Json<Value> {
    state.analyzer.probe().await;
    match state.store.ping().await {
        Ok(()) => Json(json!({
            "status": "success",
            "message": "Analyzer and store are warm",
        })),
        Err(err) => Json(json!({
            "status": "error",
            "message": err.to_string(),
        })),
    }
}

async fn create_complaint(
    State(state): State<AppState>,
    Json(input): Json<ComplaintInput>,
) -> Result<Json<Value>, ApiError> {
    // Reject before any AI or store call.
    if input.text.chars().count() < MIN_TEXT_CHARS {
        return Err(ApiError::Validation(format!(
            "text must be at least {MIN_TEXT_CHARS} characters"
        )));
    }

    info!(
        has_name = input.customer_name.is_some(),
        has_email = input.customer_email.is_some(),
        "new complaint received"
    );

    let record = state.analyzer.analyze(input).await;
    let stored = state.store.save(record).await?;

    Ok(Json(json!({
        "success": true,
        "data": stored,
        "message": "Complaint analyzed successfully",
    })))
}

async fn list_complaints(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let complaints = state.store.list_all().await?;
    info!(count = complaints.len(), "listed complaints");
    Ok(Json(json!({ "success": true, "data": complaints })))
}

async fn analytics(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let stats = state.store.stats().await?;
    Ok(Json(json!({ "success": true, "data": stats })))
}

/// Plain OPTIONS answer for clients that probe without preflight headers;
/// real preflights are answered by the CORS layer.
async fn preflight() -> Json<Value> {
    Json(json!({ "message": "OK" }))
}
