//! Keyword sentiment scoring.
//!
//! Each text scores `(positive - negative) / (positive + negative)` over
//! the distinct lexicon words it contains, or 0 when it contains none.

use std::collections::HashSet;

use crate::domain::error::DomainError;
use crate::domain::snapshot::SentimentReading;

const POSITIVE: [&str; 8] = [
    "up", "increase", "grow", "positive", "profit", "gain", "bull", "good",
];

const NEGATIVE: [&str; 8] = [
    "down", "decrease", "shrink", "negative", "loss", "decline", "bear", "bad",
];

/// Score one text in `[-1, 1]`.
#[must_use]
pub fn score_text(text: &str) -> f64 {
    let lowered = text.to_lowercase();
    let words: HashSet<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let positive = POSITIVE.iter().filter(|w| words.contains(*w)).count();
    let negative = NEGATIVE.iter().filter(|w| words.contains(*w)).count();
    let total = positive + negative;
    if total == 0 {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let (positive, negative, total) = (positive as f64, negative as f64, total as f64);
    positive / total - negative / total
}

/// Aggregate texts into one reading: mean score, mean absolute score, and
/// the number of texts scored.
///
/// # Errors
/// Never fails for lexicon scores; the error path is the reading's own
/// range validation.
pub fn aggregate<'a>(texts: impl IntoIterator<Item = &'a str>) -> Result<SentimentReading, DomainError> {
    let scores: Vec<f64> = texts.into_iter().map(score_text).collect();
    if scores.is_empty() {
        return Ok(SentimentReading::neutral());
    }

    #[allow(clippy::cast_precision_loss)]
    let count = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / count;
    let magnitude = scores.iter().map(|s| s.abs()).sum::<f64>() / count;
    let news_count = u32::try_from(scores.len()).unwrap_or(u32::MAX);
    SentimentReading::try_new(mean.clamp(-1.0, 1.0), magnitude.clamp(0.0, 1.0), news_count)
}
