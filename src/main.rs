//! Complaint Triage Service — Binary Entrypoint
//! Boots the Axum HTTP server, wiring config, analyzer ports, the store,
//! and the Prometheus exporter.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use complaint_triage::analyze::{build_ports, ComplaintAnalyzer};
use complaint_triage::api::{create_router, AppState};
use complaint_triage::config::{AiBackend, AppConfig, StoreBackend};
use complaint_triage::metrics::Metrics;
use complaint_triage::store::{ComplaintStore, MemoryStore, MongoStore};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("complaint_triage=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = AppConfig::from_env();
    let metrics = Metrics::init();

    let (classifier, sentiment) = build_ports(&config);
    let analyzer = Arc::new(ComplaintAnalyzer::new(classifier, sentiment));

    let store: Arc<dyn ComplaintStore> = match config.store_backend {
        StoreBackend::Mongo => Arc::new(MongoStore::new(
            config.mongodb_url.clone(),
            config.database_name.clone(),
        )),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };

    let state = AppState { analyzer, store };
    let app = create_router(state).merge(metrics.router());

    let backend = match config.ai_backend {
        AiBackend::Local => "local",
        AiBackend::Remote => "remote",
    };
    info!(port = config.port, ai_backend = backend, "complaint triage service starting");

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
