//! Classification port: map complaint text onto the fixed category taxonomy.
//!
//! Same shape as the sentiment port: a trait with an in-process keyword
//! backend and a hosted zero-shot backend, both infallible by contract.
//! Whatever a backend does, the label handed back is always a member of the
//! taxonomy; errors and out-of-vocabulary labels collapse to
//! `("Customer Service", 0.5)`.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use serde::Deserialize;
use tracing::warn;

use crate::model::Category;

/// Capability interface over "classify text into one of the candidate
/// categories with a confidence score".
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str, categories: &[Category]) -> (Category, f32);
    /// Backend name for diagnostics.
    fn name(&self) -> &'static str;
}

/// Documented fallback for any classification backend failure.
pub fn classification_fallback() -> (Category, f32) {
    (Category::FALLBACK, 0.5)
}

/// Map a raw backend outcome onto the taxonomy. Errors and labels outside
/// the candidate list both resolve to the fallback pair; this is the single
/// place where the "label is always in the taxonomy" invariant is enforced
/// for remote backends.
pub fn resolve_label(
    outcome: anyhow::Result<(String, f32)>,
    categories: &[Category],
) -> (Category, f32) {
    match outcome {
        Ok((label, score)) => match Category::from_label(&label) {
            Some(category) if categories.contains(&category) => {
                (category, score.clamp(0.0, 1.0))
            }
            _ => {
                warn!(label = %label, "classifier returned label outside taxonomy, using fallback");
                counter!("classification_fallback_total").increment(1);
                classification_fallback()
            }
        },
        Err(err) => {
            warn!(error = %err, "classification backend failed, using fallback");
            counter!("classification_fallback_total").increment(1);
            classification_fallback()
        }
    }
}

// ------------------------------------------------------------
// Local keyword backend
// ------------------------------------------------------------

/// Keyword cues per category for the in-process backend. Single words only;
/// matching runs over the tokenized, normalized input.
fn cues(category: Category) -> &'static [&'static str] {
    match category {
        Category::BillingAndPayments => &[
            "bill", "billing", "charge", "charged", "charges", "payment", "invoice",
            "overcharged", "subscription", "fee", "paid",
        ],
        Category::DeliveryAndShipping => &[
            "delivery", "delivered", "shipping", "shipment", "courier", "package",
            "parcel", "tracking", "arrived", "dispatch",
        ],
        Category::TechnicalSupport => &[
            "app", "website", "login", "error", "crash", "crashes", "bug", "password",
            "loading", "server", "technical",
        ],
        Category::ProductQuality => &[
            "broken", "defective", "quality", "damaged", "faulty", "cracked",
            "malfunctioning", "product", "stopped",
        ],
        Category::CustomerService => &[
            "service", "rude", "representative", "agent", "unhelpful", "response",
            "waiting", "ignored", "hold", "callback",
        ],
        Category::RefundAndReturns => &[
            "refund", "refunded", "return", "returned", "exchange", "replacement",
            "money",
        ],
        Category::AccountIssues => &[
            "account", "locked", "suspended", "banned", "profile", "access",
            "verification", "signup",
        ],
    }
}

/// In-process classifier scoring keyword overlap per candidate category.
/// Ties break toward the earlier candidate; zero overlap resolves to the
/// fallback pair, keeping both backends contract-identical.
#[derive(Debug, Clone, Default)]
pub struct LexiconClassifier;

impl LexiconClassifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Classifier for LexiconClassifier {
    async fn classify(&self, text: &str, categories: &[Category]) -> (Category, f32) {
        let tokens: HashSet<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_lowercase())
            .collect();

        let mut best: Option<(Category, u32)> = None;
        for &category in categories {
            let hits = cues(category)
                .iter()
                .filter(|kw| tokens.contains(**kw))
                .count() as u32;
            // Strict greater-than keeps the earlier candidate on ties.
            if hits > 0 && best.map_or(true, |(_, b)| hits > b) {
                best = Some((category, hits));
            }
        }

        match best {
            Some((category, hits)) => {
                let confidence = (0.5 + 0.09 * hits.min(5) as f32).min(0.95);
                (category, confidence)
            }
            None => classification_fallback(),
        }
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}

// ------------------------------------------------------------
// Remote zero-shot backend
// ------------------------------------------------------------

const CLASSIFIER_MODEL_ID: &str = "facebook/bart-large-mnli";

/// Hosted zero-shot classification endpoint (Hugging Face Inference API).
pub struct RemoteClassifier {
    http: reqwest::Client,
    token: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct ZeroShotResponse {
    labels: Vec<String>,
    scores: Vec<f32>,
}

impl RemoteClassifier {
    pub fn new(token: String) -> Self {
        Self::with_base_url(token, "https://api-inference.huggingface.co")
    }

    /// `base_url` override exists for tests pointing at a stub server.
    pub fn with_base_url(token: String, base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("complaint-triage/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("reqwest client");
        Self {
            http,
            token,
            url: format!("{base_url}/models/{CLASSIFIER_MODEL_ID}"),
        }
    }

    async fn fetch(&self, text: &str, categories: &[Category]) -> anyhow::Result<(String, f32)> {
        let candidate_labels: Vec<&str> = categories.iter().map(Category::as_str).collect();
        let resp = self
            .http
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({
                "inputs": text,
                "parameters": { "candidate_labels": candidate_labels },
            }))
            .send()
            .await?
            .error_for_status()?;

        // Labels arrive sorted best-first, scores aligned by index.
        let body: ZeroShotResponse = resp.json().await?;
        match (body.labels.first(), body.scores.first()) {
            (Some(label), Some(score)) => Ok((label.clone(), *score)),
            _ => anyhow::bail!("empty zero-shot response"),
        }
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn classify(&self, text: &str, categories: &[Category]) -> (Category, f32) {
        resolve_label(self.fetch(text, categories).await, categories)
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
