//! # Priority scorer
//! Pure, testable logic that maps `(original text, sentiment)` → `(Priority, score)`.
//! No I/O, suitable for unit tests and offline evaluation.
//!
//! Policy: negative sentiment weighs 3, positive 1; one urgent keyword hit
//! adds exactly 2 regardless of how many keywords occur. Totals of 4+ are
//! High, 2..4 Medium, below 2 Low.

use crate::model::{Priority, Sentiment};

/// Keywords checked as case-insensitive substrings of the *raw* input.
/// Matching runs against the unnormalized text so punctuation-adjacent
/// occurrences ("URGENT!!!") still hit.
pub const URGENT_KEYWORDS: [&str; 8] = [
    "urgent",
    "asap",
    "immediately",
    "emergency",
    "critical",
    "refund",
    "fraud",
    "lawsuit",
];

/// Same logic as the intake handler uses, but purely functional for testing.
pub fn score(original_text: &str, sentiment: Sentiment) -> (Priority, u32) {
    let mut priority_score: u32 = match sentiment {
        Sentiment::Negative => 3,
        Sentiment::Positive => 1,
    };

    // First keyword hit short-circuits; multiple hits never stack.
    let lowered = original_text.to_lowercase();
    if URGENT_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
        priority_score += 2;
    }

    let priority = if priority_score >= 4 {
        Priority::High
    } else if priority_score >= 2 {
        Priority::Medium
    } else {
        Priority::Low
    };

    (priority, priority_score)
}
