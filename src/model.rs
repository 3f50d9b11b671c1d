//! Domain types shared across the analysis pipeline, the store, and the API.
//!
//! `Category`, `Sentiment` and `Priority` are closed enumerations; the ports
//! parse backend output into them so nothing outside this fixed vocabulary
//! can ever reach the store or the wire.

use serde::{Deserialize, Serialize};

/// Fixed complaint taxonomy. Every stored record carries exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Billing and Payments")]
    BillingAndPayments,
    #[serde(rename = "Delivery and Shipping")]
    DeliveryAndShipping,
    #[serde(rename = "Technical Support")]
    TechnicalSupport,
    #[serde(rename = "Product Quality")]
    ProductQuality,
    #[serde(rename = "Customer Service")]
    CustomerService,
    #[serde(rename = "Refund and Returns")]
    RefundAndReturns,
    #[serde(rename = "Account Issues")]
    AccountIssues,
}

impl Category {
    /// Candidate list offered to classifiers, in tie-break order.
    pub const ALL: [Category; 7] = [
        Category::BillingAndPayments,
        Category::DeliveryAndShipping,
        Category::TechnicalSupport,
        Category::ProductQuality,
        Category::CustomerService,
        Category::RefundAndReturns,
        Category::AccountIssues,
    ];

    /// Deterministic fallback when a classification backend fails or returns
    /// a label outside the taxonomy.
    pub const FALLBACK: Category = Category::CustomerService;

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::BillingAndPayments => "Billing and Payments",
            Category::DeliveryAndShipping => "Delivery and Shipping",
            Category::TechnicalSupport => "Technical Support",
            Category::ProductQuality => "Product Quality",
            Category::CustomerService => "Customer Service",
            Category::RefundAndReturns => "Refund and Returns",
            Category::AccountIssues => "Account Issues",
        }
    }

    /// Case-insensitive lookup of a backend label against the taxonomy.
    pub fn from_label(label: &str) -> Option<Category> {
        let label = label.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(label))
    }
}

/// Polarity of a complaint. Wire format matches the SST-2 label set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    #[serde(rename = "POSITIVE")]
    Positive,
    #[serde(rename = "NEGATIVE")]
    Negative,
}

impl Sentiment {
    /// Fallback when a sentiment backend fails: complaints are assumed negative.
    pub const FALLBACK: Sentiment = Sentiment::Negative;

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "POSITIVE",
            Sentiment::Negative => "NEGATIVE",
        }
    }

    pub fn from_label(label: &str) -> Option<Sentiment> {
        match label.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" => Some(Sentiment::Positive),
            "NEGATIVE" => Some(Sentiment::Negative),
            _ => None,
        }
    }
}

/// Derived urgency label, computed by the priority scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

/// Request body for `POST /api/complaints`.
#[derive(Debug, Clone, Deserialize)]
pub struct ComplaintInput {
    pub text: String,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
}

/// Fully analyzed complaint, before the store assigns id/timestamp.
/// Produced once by the analyzer, never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzedComplaint {
    pub original_text: String,
    pub category: Category,
    pub category_confidence: f32,
    pub sentiment: Sentiment,
    pub sentiment_score: f32,
    pub priority: Priority,
    pub priority_score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
}

/// Persisted complaint as returned by the store: the analyzed record plus
/// the identifier and timestamps assigned at save time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredComplaint {
    pub id: String,
    #[serde(flatten)]
    pub record: AnalyzedComplaint,
    /// RFC 3339 instant in the store's fixed offset (UTC+5:30).
    pub timestamp: String,
    /// Human-readable variant of `timestamp`, e.g. "2025-01-02 13:45:10 IST".
    pub created_at: String,
    pub timezone: String,
}
