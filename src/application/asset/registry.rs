//! Asset registration and renaming.

use tracing::info;

use crate::domain::asset::Asset;
use crate::domain::error::DomainError;
use crate::domain::id::AssetId;
use crate::error::Result;
use crate::port::outbound::store::{AssetStore, Insertion};

/// Outcome of a registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// The asset as stored.
    pub asset: Asset,
    /// `false` when the ticker was already tracked.
    pub created: bool,
}

/// Register an asset unless its ticker is already tracked.
///
/// An existing asset is returned unchanged; registration never renames.
///
/// # Errors
/// Returns an error for a blank ticker or a failing store.
pub async fn register_asset<S: AssetStore>(
    store: &S,
    ticker: &str,
    name: Option<&str>,
    category: Option<&str>,
) -> Result<Registration> {
    let id = AssetId::try_new(ticker)?;
    let asset = Asset::new(id, name.unwrap_or_default(), category.unwrap_or_default());

    match store.register_asset(&asset).await? {
        Insertion::Inserted => {
            info!(asset = %asset.id(), name = asset.name(), category = asset.category(), "Asset registered");
            Ok(Registration {
                asset,
                created: true,
            })
        }
        Insertion::Duplicate => {
            let stored = store.get_asset(asset.id()).await?.unwrap_or(asset);
            Ok(Registration {
                asset: stored,
                created: false,
            })
        }
    }
}

/// Change an asset's display name. Returns `None` for unknown tickers.
///
/// # Errors
/// Returns an error for a blank ticker or name, or a failing store.
pub async fn rename_asset<S: AssetStore>(
    store: &S,
    ticker: &str,
    name: &str,
) -> Result<Option<Asset>> {
    let id = AssetId::try_new(ticker)?;
    if name.trim().is_empty() {
        return Err(DomainError::EmptyIdentifier { kind: "asset name" }.into());
    }
    let Some(existing) = store.get_asset(&id).await? else {
        return Ok(None);
    };

    let renamed = existing.renamed(name);
    if !store.rename_asset(&id, renamed.name()).await? {
        return Ok(None);
    }
    info!(asset = %id, from = existing.name(), to = renamed.name(), "Asset renamed");
    Ok(Some(renamed))
}
