//! MongoDB-backed complaint store.
//!
//! The connection is lazy: nothing is dialed at process start. The first
//! call that needs the database runs the initializer inside a
//! `tokio::sync::OnceCell`, which both serializes concurrent first-use (no
//! two divergent connections) and leaves the cell empty on failure, so the
//! next call retries a clean connect instead of trusting partial state.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, Bson, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use tokio::sync::OnceCell;
use tracing::info;

use crate::model::{AnalyzedComplaint, StoredComplaint};

use super::{now_stamped, ComplaintStats, ComplaintStore, TIMEZONE_NAME};

const COLLECTION: &str = "complaints";

pub struct MongoStore {
    url: String,
    db_name: String,
    db: OnceCell<Database>,
}

impl MongoStore {
    pub fn new(url: String, db_name: String) -> Self {
        Self {
            url,
            db_name,
            db: OnceCell::new(),
        }
    }

    /// Connection reused for the process lifetime, established on first use.
    async fn database(&self) -> anyhow::Result<&Database> {
        self.db
            .get_or_try_init(|| async {
                let mut opts = ClientOptions::parse(&self.url).await?;
                opts.app_name = Some("complaint-triage".to_string());
                opts.server_selection_timeout = Some(Duration::from_secs(30));
                opts.connect_timeout = Some(Duration::from_secs(30));
                let client = Client::with_options(opts)?;
                let db = client.database(&self.db_name);
                // Verify reachability before caching the handle.
                db.run_command(doc! { "ping": 1 }).await?;
                info!(database = %self.db_name, "connected to MongoDB");
                Ok::<_, anyhow::Error>(db)
            })
            .await
    }

    async fn collection(&self) -> anyhow::Result<Collection<Document>> {
        Ok(self.database().await?.collection::<Document>(COLLECTION))
    }
}

/// Turn a raw document into the wire shape: `_id` becomes a plain string id,
/// everything else deserializes through serde.
fn into_stored(mut doc: Document) -> anyhow::Result<StoredComplaint> {
    let id = match doc.remove("_id") {
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(other) => other.to_string(),
        None => anyhow::bail!("complaint document missing _id"),
    };
    doc.insert("id", id);
    Ok(bson::from_document(doc)?)
}

async fn grouped_counts(
    coll: &Collection<Document>,
    field: &str,
) -> anyhow::Result<BTreeMap<String, u64>> {
    let pipeline = vec![doc! {
        "$group": { "_id": format!("${field}"), "count": { "$sum": 1 } }
    }];
    let mut cursor = coll.aggregate(pipeline).await?;
    let mut out = BTreeMap::new();
    while let Some(group) = cursor.try_next().await? {
        let key = group.get_str("_id").unwrap_or("unknown").to_string();
        let count = match group.get("count") {
            Some(Bson::Int32(n)) => *n as u64,
            Some(Bson::Int64(n)) => *n as u64,
            _ => 0,
        };
        out.insert(key, count);
    }
    Ok(out)
}

#[async_trait]
impl ComplaintStore for MongoStore {
    async fn save(&self, record: AnalyzedComplaint) -> anyhow::Result<StoredComplaint> {
        let coll = self.collection().await?;
        let (timestamp, created_at) = now_stamped();

        let mut doc = bson::to_document(&record)?;
        doc.insert("timestamp", timestamp.as_str());
        doc.insert("created_at", created_at.as_str());
        doc.insert("timezone", TIMEZONE_NAME);

        let result = coll.insert_one(doc).await?;
        let id = match result.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            other => other.to_string(),
        };
        info!(%id, "saved complaint");

        Ok(StoredComplaint {
            id,
            record,
            timestamp,
            created_at,
            timezone: TIMEZONE_NAME.to_string(),
        })
    }

    async fn list_all(&self) -> anyhow::Result<Vec<StoredComplaint>> {
        let coll = self.collection().await?;
        let docs: Vec<Document> = coll
            .find(doc! {})
            .sort(doc! { "timestamp": -1 })
            .await?
            .try_collect()
            .await?;
        docs.into_iter().map(into_stored).collect()
    }

    async fn stats(&self) -> anyhow::Result<ComplaintStats> {
        let coll = self.collection().await?;
        let categories = grouped_counts(&coll, "category").await?;
        let sentiments = grouped_counts(&coll, "sentiment").await?;
        let total = coll.count_documents(doc! {}).await?;
        Ok(ComplaintStats {
            categories,
            sentiments,
            total,
        })
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.database()
            .await?
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}
