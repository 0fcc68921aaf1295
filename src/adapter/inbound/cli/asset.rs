//! Handlers for the `asset` command group.

use serde_json::json;
use tabled::Tabled;

use crate::adapter::inbound::cli::command::{AssetAddArgs, AssetRenameArgs};
use crate::adapter::inbound::cli::{operator, output};
use crate::error::Result;
use crate::port::inbound::operator::asset::{AssetRegistration, AssetView};

#[derive(Tabled)]
struct AssetRow {
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
}

fn asset_json(asset: &AssetView) -> serde_json::Value {
    json!({
        "ticker": asset.ticker,
        "name": asset.name,
        "category": asset.category,
    })
}

/// Execute `asset add`.
pub async fn execute_add(database: &str, args: &AssetAddArgs) -> Result<()> {
    let added = operator::operator()
        .add_asset(
            database,
            AssetRegistration {
                ticker: args.ticker.clone(),
                name: args.name.clone(),
                category: args.category.clone(),
            },
        )
        .await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "asset.add",
            "created": added.created,
            "asset": asset_json(&added.asset),
        }));
        return Ok(());
    }

    if added.created {
        output::success(&format!("Tracking {}", output::highlight(&added.asset.ticker)));
    } else {
        output::warning(&format!("{} is already tracked", added.asset.ticker));
    }
    output::field("Name", &added.asset.name);
    output::field("Category", &added.asset.category);
    Ok(())
}

/// Execute `asset list`.
pub async fn execute_list(database: &str) -> Result<()> {
    let assets = operator::operator().list_assets(database).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "asset.list",
            "assets": assets.iter().map(asset_json).collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    output::section("Tracked assets");
    if assets.is_empty() {
        output::note("(none)");
        output::hint(&format!(
            "run {} to start tracking one",
            output::highlight("augury asset add <TICKER>")
        ));
        return Ok(());
    }

    output::table(assets.into_iter().map(|a| AssetRow {
        ticker: a.ticker,
        name: a.name,
        category: a.category,
    }));
    Ok(())
}

/// Execute `asset rename`.
pub async fn execute_rename(database: &str, args: &AssetRenameArgs) -> Result<()> {
    let renamed = operator::operator()
        .rename_asset(database, &args.ticker, &args.name)
        .await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "asset.rename",
            "found": renamed.is_some(),
            "asset": renamed.as_ref().map(asset_json),
        }));
        return Ok(());
    }

    match renamed {
        Some(asset) => {
            output::success(&format!("Renamed {} to {}", asset.ticker, asset.name));
        }
        None => {
            output::warning(&format!("{} is not tracked", args.ticker.trim().to_uppercase()));
        }
    }
    Ok(())
}
