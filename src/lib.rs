// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod analyze;
pub mod api;
pub mod config;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod priority;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{build_ports, Classifier, ComplaintAnalyzer, SentimentModel};
pub use crate::api::{create_router, AppState};
pub use crate::config::AppConfig;
pub use crate::model::{AnalyzedComplaint, Category, ComplaintInput, Priority, Sentiment, StoredComplaint};
pub use crate::store::{ComplaintStats, ComplaintStore, MemoryStore, MongoStore};
