//! Environment-sourced configuration. `.env` is loaded by the binary before
//! this runs; everything here is plain `std::env` with defaults suitable for
//! local development.

use std::env;

/// Which pair of AI backends the analyzer is wired with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiBackend {
    /// In-process lexicon scorers; no network, no token.
    Local,
    /// Hosted inference endpoints; requires `HF_API_TOKEN`.
    Remote,
}

/// Where analyzed complaints are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    /// In-memory store for tests and database-less local runs.
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mongodb_url: String,
    pub database_name: String,
    pub hf_api_token: Option<String>,
    pub ai_backend: AiBackend,
    pub store_backend: StoreBackend,
    pub port: u16,
}

impl AppConfig {
    /// Read configuration from the environment.
    ///
    /// `AI_BACKEND` accepts `local` or `remote`; when unset, the presence of
    /// `HF_API_TOKEN` decides. `STORE_BACKEND=memory` opts into the
    /// in-memory store.
    pub fn from_env() -> Self {
        let hf_api_token = env::var("HF_API_TOKEN").ok().filter(|t| !t.trim().is_empty());

        let ai_backend = match env::var("AI_BACKEND").ok().as_deref() {
            Some("remote") => AiBackend::Remote,
            Some("local") => AiBackend::Local,
            _ if hf_api_token.is_some() => AiBackend::Remote,
            _ => AiBackend::Local,
        };

        let store_backend = match env::var("STORE_BACKEND").ok().as_deref() {
            Some("memory") => StoreBackend::Memory,
            _ => StoreBackend::Mongo,
        };

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);

        Self {
            mongodb_url: env::var("MONGODB_URL")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database_name: env::var("DATABASE_NAME")
                .unwrap_or_else(|_| "complaint_analyzer".to_string()),
            hf_api_token,
            ai_backend,
            store_backend,
            port,
        }
    }
}
