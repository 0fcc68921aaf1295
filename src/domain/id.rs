//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Asset identifier (the ticker symbol), normalized to upper case.
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(String);

impl AssetId {
    /// Create a new `AssetId` from a ticker, trimming and upper-casing it.
    pub fn new(ticker: impl Into<String>) -> Self {
        Self(ticker.into().trim().to_ascii_uppercase())
    }

    /// Create an `AssetId`, rejecting blank tickers.
    pub fn try_new(ticker: impl Into<String>) -> Result<Self, DomainError> {
        let id = Self::new(ticker);
        if id.0.is_empty() {
            return Err(DomainError::EmptyIdentifier { kind: "asset" });
        }
        Ok(id)
    }

    /// Get the ticker as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AssetId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Strategy name - the key under which a strategy's trust weight is kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StrategyName(String);

impl StrategyName {
    /// Create a new `StrategyName` from a string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the strategy name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StrategyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for StrategyName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for StrategyName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Identifier of one analysis cycle (one fan-out to the strategies).
///
/// Generated as UUID v4 for every cycle so replies can be matched to the
/// exact fan-out that asked for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CycleId(String);

impl CycleId {
    /// Create a new `CycleId` with a generated UUID.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the cycle ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CycleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CycleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Row identifier of a persisted prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PredictionId(i64);

impl PredictionId {
    /// Wrap a raw row identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw row identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PredictionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_id_normalizes_ticker() {
        let id = AssetId::new("  aapl ");
        assert_eq!(id.as_str(), "AAPL");
        assert_eq!(id, AssetId::from("AAPL"));
    }

    #[test]
    fn asset_id_rejects_blank() {
        assert_eq!(
            AssetId::try_new("   "),
            Err(DomainError::EmptyIdentifier { kind: "asset" })
        );
    }

    #[test]
    fn cycle_ids_are_unique() {
        assert_ne!(CycleId::new(), CycleId::new());
    }

    #[test]
    fn strategy_name_display() {
        assert_eq!(StrategyName::new("momentum").to_string(), "momentum");
    }
}
