//! `[decision]` section.

use serde::Deserialize;

use crate::application::decision::engine::DEFAULT_THRESHOLD;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DecisionSettings {
    /// Minimum winning share for a buy or sell.
    pub threshold: f64,
}

impl Default for DecisionSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}
