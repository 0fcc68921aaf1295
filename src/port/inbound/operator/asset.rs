//! Asset registry projections for operator-facing adapters.

use async_trait::async_trait;

use crate::error::Result;

/// Asset as shown to operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetView {
    pub ticker: String,
    pub name: String,
    pub category: String,
}

/// Input for `asset add`.
#[derive(Debug, Clone, Default)]
pub struct AssetRegistration {
    pub ticker: String,
    pub name: Option<String>,
    pub category: Option<String>,
}

/// Result of `asset add`.
#[derive(Debug, Clone)]
pub struct AssetAdded {
    pub asset: AssetView,
    /// `false` when the ticker was already registered.
    pub created: bool,
}

/// Asset registry use-cases for operator-facing adapters.
#[async_trait]
pub trait AssetOperator: Send + Sync {
    /// Register an asset unless its ticker exists.
    async fn add_asset(
        &self,
        database_url: &str,
        registration: AssetRegistration,
    ) -> Result<AssetAdded>;

    /// List tracked assets.
    async fn list_assets(&self, database_url: &str) -> Result<Vec<AssetView>>;

    /// Change an asset's display name. `None` for unknown tickers.
    async fn rename_asset(
        &self,
        database_url: &str,
        ticker: &str,
        name: &str,
    ) -> Result<Option<AssetView>>;
}
