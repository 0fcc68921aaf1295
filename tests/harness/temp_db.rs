use std::path::{Path, PathBuf};
use std::sync::Arc;

use augury::adapter::outbound::sqlite::store::SqliteStore;
use augury::domain::asset::Asset;
use augury::domain::id::AssetId;
use augury::port::outbound::store::AssetStore;
use tempfile::TempDir;

/// Migrated SQLite database in a temporary directory, removed on drop.
pub struct TempDb {
    dir: TempDir,
    path: PathBuf,
    store: Arc<SqliteStore>,
}

impl TempDb {
    pub fn create(name: &str) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join(format!("augury-{name}.db"));
        let store = SqliteStore::open(&path.to_string_lossy()).expect("open sqlite store");

        Self {
            dir,
            path,
            store: Arc::new(store),
        }
    }

    /// Like [`TempDb::create`], with each ticker registered as a stock so
    /// rows referencing it satisfy the foreign keys.
    pub async fn with_assets(name: &str, tickers: &[&str]) -> Self {
        let db = Self::create(name);
        for ticker in tickers {
            db.store
                .register_asset(&Asset::new(AssetId::new(*ticker), *ticker, "stock"))
                .await
                .expect("register asset");
        }
        db
    }

    pub fn store(&self) -> Arc<SqliteStore> {
        Arc::clone(&self.store)
    }

    /// Path to pass to `--database` or `SqliteStore::open`.
    pub fn url(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A fresh handle on the same file, as another process would see it.
    pub fn reopen(&self) -> SqliteStore {
        SqliteStore::open(&self.url()).expect("reopen sqlite store")
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}
