//! Sentiment port: POSITIVE/NEGATIVE polarity with a confidence score.
//!
//! Two interchangeable backends satisfy the same contract: an in-process
//! lexicon scorer and a hosted inference endpoint. Whatever happens inside a
//! backend, callers always get a `(Sentiment, score)` pair; failures collapse
//! to `(NEGATIVE, 0.5)` at this boundary and are only visible as a warning
//! log plus a fallback counter.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::warn;

use crate::model::Sentiment;

/// Upper bound on text sent to any sentiment backend. Keeps remote calls
/// inside the model's token limit and bounds latency.
pub const MAX_SENTIMENT_CHARS: usize = 512;

/// Capability interface over "score text as POSITIVE/NEGATIVE".
/// Infallible by contract: implementations map every backend error to the
/// documented fallback pair.
#[async_trait]
pub trait SentimentModel: Send + Sync {
    async fn analyze(&self, text: &str) -> (Sentiment, f32);
    /// Backend name for diagnostics.
    fn name(&self) -> &'static str;
}

/// Documented fallback for any sentiment backend failure.
pub fn sentiment_fallback() -> (Sentiment, f32) {
    (Sentiment::FALLBACK, 0.5)
}

/// Truncate on a char boundary so multi-byte input never splits mid-codepoint.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// ------------------------------------------------------------
// Local lexicon backend
// ------------------------------------------------------------

static LEXICON: Lazy<HashMap<String, i32>> = Lazy::new(|| {
    let raw = include_str!("../../complaint_lexicon.json");
    serde_json::from_str::<HashMap<String, i32>>(raw).expect("valid complaint lexicon")
});

/// In-process scorer over a small complaint-domain lexicon with negation
/// handling. Never fails, never leaves the process.
#[derive(Debug, Clone, Default)]
pub struct LexiconSentiment;

impl LexiconSentiment {
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn word_score(&self, w: &str) -> i32 {
        *LEXICON.get(w).unwrap_or(&0)
    }

    /// Raw signed lexicon score. Negation: a negator within the previous
    /// 1..=3 tokens inverts the sign of the current word's score.
    fn raw_score(&self, text: &str) -> i32 {
        let tokens: Vec<String> = tokenize(text).collect();
        let mut score: i32 = 0;

        for i in 0..tokens.len() {
            let base = self.word_score(tokens[i].as_str());
            if base == 0 {
                continue;
            }
            let negated = (1..=3).any(|k| i >= k && is_negator(tokens[i - k].as_str()));
            score += if negated { -base } else { base };
        }

        score
    }
}

#[async_trait]
impl SentimentModel for LexiconSentiment {
    async fn analyze(&self, text: &str) -> (Sentiment, f32) {
        let text = truncate_chars(text, MAX_SENTIMENT_CHARS);
        let raw = self.raw_score(text);
        // Zero evidence reads as a negative complaint at neutral confidence,
        // the same pair the remote backend falls back to.
        let label = if raw > 0 {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        };
        let confidence = (0.5 + 0.1 * raw.unsigned_abs().min(5) as f32).min(1.0);
        (label, confidence)
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}

/// Alphanumeric tokens, lower-cased.
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not" | "no" | "never" | "isnt" | "wasnt" | "arent" | "wont" | "cant" | "cannot"
            | "without"
    )
}

// ------------------------------------------------------------
// Remote inference backend
// ------------------------------------------------------------

const SENTIMENT_MODEL_ID: &str = "distilbert-base-uncased-finetuned-sst-2-english";

/// Hosted sentiment endpoint (Hugging Face Inference API). Requires a token;
/// all network/HTTP/parse failures collapse to the fallback pair.
pub struct RemoteSentiment {
    http: reqwest::Client,
    token: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct RemoteLabel {
    label: String,
    score: f32,
}

impl RemoteSentiment {
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
            url: format!("{base_url}/models/{SENTIMENT_MODEL_ID}"),
        }
    }

    async fn fetch(&self, text: &str) -> anyhow::Result<(String, f32)> {
        let resp = self
            .http
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "inputs": text }))
            .send()
            .await?
            .error_for_status()?;

        // The hosted pipeline returns a nested array: one inner list of
        // label/score pairs per input, best first.
        let body: Vec<Vec<RemoteLabel>> = resp.json().await?;
        let top = body
            .first()
            .and_then(|inner| inner.first())
            .ok_or_else(|| anyhow::anyhow!("empty sentiment response"))?;
        Ok((top.label.clone(), top.score))
    }
}

#[async_trait]
impl SentimentModel for RemoteSentiment {
    async fn analyze(&self, text: &str) -> (Sentiment, f32) {
        let text = truncate_chars(text, MAX_SENTIMENT_CHARS);
        match self.fetch(text).await {
            Ok((label, score)) => match Sentiment::from_label(&label) {
                Some(sentiment) => (sentiment, score.clamp(0.0, 1.0)),
                None => {
                    warn!(label = %label, "sentiment backend returned unknown label, using fallback");
                    counter!("sentiment_fallback_total").increment(1);
                    sentiment_fallback()
                }
            },
            Err(err) => {
                warn!(error = %err, "sentiment backend failed, using fallback");
                counter!("sentiment_fallback_total").increment(1);
                sentiment_fallback()
            }
        }
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
