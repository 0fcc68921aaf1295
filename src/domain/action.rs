//! The three trade actions every prediction and decision resolves to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Trade action.
///
/// `Hold` is the conservative default: anything that cannot justify a
/// directional call falls back to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Buy,
    Sell,
    #[default]
    Hold,
}

impl Action {
    /// All actions in bucket order.
    pub const ALL: [Action; 3] = [Action::Buy, Action::Sell, Action::Hold];

    /// Lower-case label used in storage and messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::Hold => "hold",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            "hold" => Ok(Self::Hold),
            other => Err(DomainError::UnknownAction {
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("BUY".parse::<Action>(), Ok(Action::Buy));
        assert_eq!(" sell ".parse::<Action>(), Ok(Action::Sell));
        assert_eq!("hold".parse::<Action>(), Ok(Action::Hold));
    }

    #[test]
    fn rejects_unknown_label() {
        assert!(matches!(
            "short".parse::<Action>(),
            Err(DomainError::UnknownAction { .. })
        ));
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Action::Sell).unwrap(), "\"sell\"");
        assert_eq!(Action::default(), Action::Hold);
    }
}
