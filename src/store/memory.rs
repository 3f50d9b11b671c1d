//! In-memory store: a mutex-guarded vector. Backs the integration tests and
//! database-less local runs; semantics mirror the Mongo implementation.

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::model::{AnalyzedComplaint, StoredComplaint};

use super::{now_stamped, ComplaintStats, ComplaintStore, TIMEZONE_NAME};

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Vec<StoredComplaint>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ComplaintStore for MemoryStore {
    async fn save(&self, record: AnalyzedComplaint) -> anyhow::Result<StoredComplaint> {
        let (timestamp, created_at) = now_stamped();
        let stored = StoredComplaint {
            id: Uuid::new_v4().to_string(),
            record,
            timestamp,
            created_at,
            timezone: TIMEZONE_NAME.to_string(),
        };
        let mut v = self.inner.lock().expect("store mutex poisoned");
        v.push(stored.clone());
        Ok(stored)
    }

    async fn list_all(&self) -> anyhow::Result<Vec<StoredComplaint>> {
        let v = self.inner.lock().expect("store mutex poisoned");
        let mut out = v.clone();
        // Fixed-width RFC 3339 in a single offset sorts lexicographically.
        out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(out)
    }

    async fn stats(&self) -> anyhow::Result<ComplaintStats> {
        let v = self.inner.lock().expect("store mutex poisoned");
        let mut stats = ComplaintStats {
            total: v.len() as u64,
            ..Default::default()
        };
        for c in v.iter() {
            *stats
                .categories
                .entry(c.record.category.as_str().to_string())
                .or_insert(0) += 1;
            *stats
                .sentiments
                .entry(c.record.sentiment.as_str().to_string())
                .or_insert(0) += 1;
        }
        Ok(stats)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
