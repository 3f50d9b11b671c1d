//! Complaint persistence: the store contract plus its two implementations.
//!
//! Unlike the AI ports, persistence failures are *not* swallowed: `save`,
//! `list_all` and `stats` propagate errors so the API layer can answer with
//! a structured 500 instead of silently dropping a complaint.

pub mod memory;
pub mod mongo;

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use crate::model::{AnalyzedComplaint, StoredComplaint};

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Stored timestamps carry an explicit fixed offset (UTC+5:30, IST) rather
/// than the server's local time; every record uses the same offset.
pub const TIMEZONE_NAME: &str = "Asia/Kolkata";

/// Aggregate counts over all stored complaints, grouped independently by
/// category and by sentiment.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComplaintStats {
    pub categories: BTreeMap<String, u64>,
    pub sentiments: BTreeMap<String, u64>,
    pub total: u64,
}

/// Persistence contract. Records are created once, never mutated, and read
/// many times; `list_all` returns newest first.
#[async_trait]
pub trait ComplaintStore: Send + Sync {
    /// Assign an id and creation timestamp, persist, and return the stored
    /// record. Fails loudly when the underlying store is unreachable.
    async fn save(&self, record: AnalyzedComplaint) -> anyhow::Result<StoredComplaint>;

    /// All complaints, newest first, with identifiers and dates already
    /// serialized to representation-stable strings.
    async fn list_all(&self) -> anyhow::Result<Vec<StoredComplaint>>;

    async fn stats(&self) -> anyhow::Result<ComplaintStats>;

    /// Touch the underlying connection, forcing lazy initialization.
    async fn ping(&self) -> anyhow::Result<()>;
}

fn store_offset() -> FixedOffset {
    FixedOffset::east_opt(5 * 3600 + 30 * 60).expect("valid IST offset")
}

/// Current instant in the store's fixed offset, rendered as
/// `(rfc3339_timestamp, human_readable_created_at)`. Fixed-width fractional
/// seconds keep the RFC 3339 strings lexicographically sortable.
pub(crate) fn now_stamped() -> (String, String) {
    let now: DateTime<FixedOffset> = Utc::now().with_timezone(&store_offset());
    (
        now.to_rfc3339_opts(chrono::SecondsFormat::Micros, false),
        now.format("%Y-%m-%d %H:%M:%S IST").to_string(),
    )
}
