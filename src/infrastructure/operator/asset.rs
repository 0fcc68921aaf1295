//! Asset operator implementation.

use async_trait::async_trait;

use crate::application::asset::registry;
use crate::domain::asset::Asset;
use crate::error::Result;
use crate::port::inbound::operator::asset::{
    AssetAdded, AssetOperator, AssetRegistration, AssetView,
};
use crate::port::outbound::store::AssetStore;

use super::{entry::Operator, shared};

fn view(asset: &Asset) -> AssetView {
    AssetView {
        ticker: asset.id().to_string(),
        name: asset.name().to_string(),
        category: asset.category().to_string(),
    }
}

#[async_trait]
impl AssetOperator for Operator {
    async fn add_asset(
        &self,
        database_url: &str,
        registration: AssetRegistration,
    ) -> Result<AssetAdded> {
        let store = shared::open_store(database_url)?;
        let outcome = registry::register_asset(
            &store,
            &registration.ticker,
            registration.name.as_deref(),
            registration.category.as_deref(),
        )
        .await?;

        Ok(AssetAdded {
            asset: view(&outcome.asset),
            created: outcome.created,
        })
    }

    async fn list_assets(&self, database_url: &str) -> Result<Vec<AssetView>> {
        let store = shared::open_store(database_url)?;
        Ok(store.list_assets().await?.iter().map(view).collect())
    }

    async fn rename_asset(
        &self,
        database_url: &str,
        ticker: &str,
        name: &str,
    ) -> Result<Option<AssetView>> {
        let store = shared::open_store(database_url)?;
        let renamed = registry::rename_asset(&store, ticker, name).await?;
        Ok(renamed.as_ref().map(view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn database(dir: &TempDir) -> String {
        dir.path().join("augury.db").to_string_lossy().into_owned()
    }

    #[tokio::test]
    async fn add_then_list_round_trips_through_sqlite() {
        let dir = TempDir::new().unwrap();
        let db = database(&dir);
        let operator = Operator::new();

        let added = operator
            .add_asset(
                &db,
                AssetRegistration {
                    ticker: "eth-usd".into(),
                    name: Some("Ethereum".into()),
                    category: Some("crypto".into()),
                },
            )
            .await
            .unwrap();
        assert!(added.created);
        assert_eq!(added.asset.ticker, "ETH-USD");

        let listed = operator.list_assets(&db).await.unwrap();
        assert_eq!(listed, vec![added.asset]);
    }

    #[tokio::test]
    async fn rename_unknown_ticker_is_none() {
        let dir = TempDir::new().unwrap();
        let db = database(&dir);

        let renamed = Operator::new().rename_asset(&db, "NOPE", "Nope").await.unwrap();
        assert!(renamed.is_none());
    }
}
