//! Analysis pipeline entry: normalize → classify → sentiment → priority.

pub mod classify;
pub mod sentiment;

use std::sync::Arc;

use metrics::counter;
use tracing::{debug, info};

use crate::config::{AiBackend, AppConfig};
use crate::model::{AnalyzedComplaint, Category, ComplaintInput};
use crate::normalize::normalize;
use crate::priority;

pub use classify::{Classifier, LexiconClassifier, RemoteClassifier};
pub use sentiment::{LexiconSentiment, RemoteSentiment, SentimentModel};

/// Orchestrates the ports into one fully populated record. Cannot fail:
/// every sub-call has a deterministic fallback, so a submitted complaint is
/// always classified, possibly degraded, never dropped.
pub struct ComplaintAnalyzer {
    classifier: Arc<dyn Classifier>,
    sentiment: Arc<dyn SentimentModel>,
}

impl ComplaintAnalyzer {
    pub fn new(classifier: Arc<dyn Classifier>, sentiment: Arc<dyn SentimentModel>) -> Self {
        Self {
            classifier,
            sentiment,
        }
    }

    /// Classification and sentiment consume the *normalized* text; priority
    /// keyword matching intentionally runs on the raw input so punctuation-
    /// adjacent keywords still hit. That asymmetry is part of the contract.
    pub async fn analyze(&self, input: ComplaintInput) -> AnalyzedComplaint {
        let normalized = normalize(&input.text);
        debug!(chars = normalized.chars().count(), "normalized complaint text");

        // The two ports take the same input independently of each other.
        let ((category, category_confidence), (sentiment, sentiment_score)) = tokio::join!(
            self.classifier.classify(&normalized, &Category::ALL),
            self.sentiment.analyze(&normalized),
        );

        let (priority, priority_score) = priority::score(&input.text, sentiment);
        counter!("complaints_analyzed_total").increment(1);
        info!(
            category = category.as_str(),
            sentiment = sentiment.as_str(),
            priority = priority.as_str(),
            "analysis complete"
        );

        AnalyzedComplaint {
            original_text: input.text,
            category,
            category_confidence,
            sentiment,
            sentiment_score,
            priority,
            priority_score,
            customer_name: input.customer_name,
            customer_email: input.customer_email,
        }
    }

    /// One-off probe used by `/warmup`: runs a tiny sample through both
    /// ports so lazy state (lexicons, connection pools) is primed eagerly.
    pub async fn probe(&self) {
        let sample = "warmup probe: delivery of order 0 pending";
        let normalized = normalize(sample);
        let _ = tokio::join!(
            self.classifier.classify(&normalized, &Category::ALL),
            self.sentiment.analyze(&normalized),
        );
        info!(
            classifier = self.classifier.name(),
            sentiment = self.sentiment.name(),
            "analyzer probe finished"
        );
    }
}

/// Factory: build both ports according to configuration. Remote backends
/// require an inference token; without one the service runs fully local.
pub fn build_ports(config: &AppConfig) -> (Arc<dyn Classifier>, Arc<dyn SentimentModel>) {
    match config.ai_backend {
        AiBackend::Remote => {
            let token = config.hf_api_token.clone().unwrap_or_default();
            (
                Arc::new(RemoteClassifier::new(token.clone())),
                Arc::new(RemoteSentiment::new(token)),
            )
        }
        AiBackend::Local => (
            Arc::new(LexiconClassifier::new()),
            Arc::new(LexiconSentiment::new()),
        ),
    }
}
