//! Tracked assets.

use serde::{Deserialize, Serialize};

use super::id::AssetId;

/// Category assigned when none is given at registration.
pub const DEFAULT_CATEGORY: &str = "stock";

/// A tracked financial asset.
///
/// The ticker and category are fixed at registration; only the display
/// name may change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    id: AssetId,
    name: String,
    category: String,
}

impl Asset {
    /// Create an asset. A blank name falls back to the ticker, a blank
    /// category to [`DEFAULT_CATEGORY`].
    pub fn new(id: AssetId, name: impl Into<String>, category: impl Into<String>) -> Self {
        let name = name.into();
        let category = category.into();
        Self {
            name: if name.trim().is_empty() {
                id.as_str().to_string()
            } else {
                name.trim().to_string()
            },
            category: if category.trim().is_empty() {
                DEFAULT_CATEGORY.to_string()
            } else {
                category.trim().to_ascii_lowercase()
            },
            id,
        }
    }

    #[must_use]
    pub fn id(&self) -> &AssetId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Return a copy carrying a new display name.
    #[must_use]
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self::new(self.id.clone(), name, self.category.clone())
    }
}
