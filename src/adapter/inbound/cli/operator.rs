//! Inbound operator accessor for CLI handlers.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::{ConfigError, Result};
use crate::port::inbound::operator::port::OperatorPort;

use super::paths;

static OPERATOR: OnceLock<Box<dyn OperatorPort>> = OnceLock::new();

/// Installs the operator implementation used by CLI handlers.
pub fn install(operator: Box<dyn OperatorPort>) -> std::result::Result<(), Box<dyn OperatorPort>> {
    OPERATOR.set(operator)
}

/// Returns the configured operator capability surface for CLI handlers.
#[must_use]
pub fn operator() -> &'static dyn OperatorPort {
    OPERATOR
        .get()
        .expect("CLI operator not installed; call cli::operator::install from main")
        .as_ref()
}

/// Load config TOML for operator-facing use-cases.
///
/// An explicit path must exist. Without one, the default file is read if
/// present and every setting falls back to its default otherwise.
pub fn read_config_toml(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile(e).into()),
        None => {
            let default = paths::default_config();
            if default.exists() {
                std::fs::read_to_string(default).map_err(|e| ConfigError::ReadFile(e).into())
            } else {
                Ok(String::new())
            }
        }
    }
}

/// Resolve the database for history and asset commands: `--database`, then
/// `AUGURY_DATABASE`, then `~/.augury/augury.db`.
///
/// The parent directory is created so SQLite can create the file.
pub fn database_location(flag: Option<&Path>) -> Result<String> {
    let path = match flag {
        Some(path) => path.to_path_buf(),
        None => match std::env::var(paths::DATABASE_ENV) {
            Ok(value) if !value.trim().is_empty() => PathBuf::from(value),
            _ => paths::default_database(),
        },
    };
    prepare_database_dir(&path)?;
    Ok(path.to_string_lossy().into_owned())
}

/// Create the directory that will hold `path`, unless it is `:memory:`.
pub fn prepare_database_dir(path: &Path) -> Result<()> {
    if path.as_os_str() == ":memory:" {
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_database_flag_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("a.db");

        let resolved = database_location(Some(&path)).unwrap();

        assert_eq!(resolved, path.to_string_lossy());
        assert!(dir.path().join("nested").is_dir());
    }

    #[test]
    fn memory_database_needs_no_directory() {
        assert_eq!(
            database_location(Some(Path::new(":memory:"))).unwrap(),
            ":memory:"
        );
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = read_config_toml(Some(&dir.path().join("missing.toml")));
        assert!(result.is_err());
    }
}
