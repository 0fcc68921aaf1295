//! Strategy predictions.
//!
//! The payload keeps the fields the decision engine depends on (`action`
//! and an optional `target_price`) typed, and carries anything else a
//! strategy wants to record in an open extension map.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::action::Action;
use super::error::DomainError;
use super::id::{AssetId, PredictionId, StrategyName};

/// Confidence in `[0, 1]`. Deserialization rejects out-of-range values.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    pub const ZERO: Confidence = Confidence(0.0);

    /// Validate a confidence value.
    pub fn try_new(value: f64) -> Result<Self, DomainError> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::InvalidConfidence { value })
        }
    }

    /// Clamp into range; NaN collapses to zero.
    #[must_use]
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Confidence {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(confidence: Confidence) -> Self {
        confidence.0
    }
}

/// Prediction payload: required fields plus an open extension map.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PredictionPayload {
    #[serde(default)]
    pub action: Action,
    #[serde(default)]
    pub target_price: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PredictionPayload {
    #[must_use]
    pub fn new(action: Action, target_price: Option<f64>) -> Self {
        Self {
            action,
            target_price,
            extra: Map::new(),
        }
    }

    /// Attach an extension field. Keys colliding with the required fields
    /// are ignored.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        if key != "action" && key != "target_price" {
            self.extra.insert(key.to_string(), value.into());
        }
        self
    }
}

/// What a strategy concluded about one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub prediction: PredictionPayload,
    pub confidence: Confidence,
    pub rationale: String,
}

impl Assessment {
    #[must_use]
    pub fn new(prediction: PredictionPayload, confidence: f64, rationale: impl Into<String>) -> Self {
        Self {
            prediction,
            confidence: Confidence::clamped(confidence),
            rationale: rationale.into(),
        }
    }

    /// Zero-confidence hold, the answer for anything a strategy cannot judge.
    #[must_use]
    pub fn abstain(rationale: impl Into<String>) -> Self {
        Self::new(PredictionPayload::new(Action::Hold, None), 0.0, rationale)
    }
}

/// A persisted prediction. Unique by `(asset, strategy, timestamp)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub id: Option<PredictionId>,
    pub asset_id: AssetId,
    pub strategy: StrategyName,
    pub timestamp: DateTime<Utc>,
    pub payload: PredictionPayload,
    pub confidence: Confidence,
    pub rationale: String,
}

impl Prediction {
    #[must_use]
    pub fn new(
        asset_id: AssetId,
        strategy: StrategyName,
        timestamp: DateTime<Utc>,
        assessment: Assessment,
    ) -> Self {
        Self {
            id: None,
            asset_id,
            strategy,
            timestamp,
            payload: assessment.prediction,
            confidence: assessment.confidence,
            rationale: assessment.rationale,
        }
    }

    #[must_use]
    pub fn action(&self) -> Action {
        self.payload.action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn confidence_clamps_and_validates() {
        assert_eq!(Confidence::clamped(1.7).value(), 1.0);
        assert_eq!(Confidence::clamped(-0.2).value(), 0.0);
        assert_eq!(Confidence::clamped(f64::NAN).value(), 0.0);
        assert!(Confidence::try_new(0.5).is_ok());
        assert!(Confidence::try_new(1.5).is_err());
    }

    #[test]
    fn confidence_deserialization_enforces_range() {
        let parsed: Confidence = serde_json::from_str("0.25").unwrap();
        assert_eq!(parsed.value(), 0.25);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "0.25");

        assert!(serde_json::from_str::<Confidence>("1.7").is_err());
        assert!(serde_json::from_str::<Confidence>("-0.1").is_err());
    }

    #[test]
    fn payload_keeps_extension_fields() {
        let payload = PredictionPayload::new(Action::Buy, Some(101.5))
            .with("timeframe", "14 days")
            .with("momentum_strength", 0.07);
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["action"], "buy");
        assert_eq!(value["target_price"], 101.5);
        assert_eq!(value["timeframe"], "14 days");

        let back: PredictionPayload = serde_json::from_value(value).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn payload_without_action_reads_as_hold() {
        let payload: PredictionPayload =
            serde_json::from_value(json!({ "note": "no call" })).unwrap();
        assert_eq!(payload.action, Action::Hold);
        assert_eq!(payload.target_price, None);
        assert_eq!(payload.extra["note"], "no call");
    }

    #[test]
    fn extension_cannot_shadow_required_fields() {
        let payload = PredictionPayload::new(Action::Sell, None).with("action", "buy");
        assert_eq!(payload.action, Action::Sell);
        assert!(payload.extra.is_empty());
    }

    #[test]
    fn abstain_is_zero_confidence_hold() {
        let assessment = Assessment::abstain("not enough data");
        assert_eq!(assessment.prediction.action, Action::Hold);
        assert_eq!(assessment.confidence, Confidence::ZERO);
    }
}
