//! Path utilities for augury.
//!
//! All data lives under `~/.augury/`:
//! - `~/.augury/config.toml` - main configuration
//! - `~/.augury/augury.db` - snapshots, predictions, decisions and weights

use std::path::PathBuf;

/// Environment variable naming the database file when `--database` is absent.
pub const DATABASE_ENV: &str = "AUGURY_DATABASE";

/// Returns the augury home directory (`~/.augury/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".augury")
}

/// Returns the default config file path (`~/.augury/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

/// Returns the default database path (`~/.augury/augury.db`).
pub fn default_database() -> PathBuf {
    home_dir().join("augury.db")
}

/// Ensures the augury home directory exists.
pub fn ensure_home_dir() -> std::io::Result<()> {
    std::fs::create_dir_all(home_dir())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_under_augury_home() {
        let home = home_dir();
        assert!(home.to_string_lossy().contains(".augury"));
        assert!(default_config().starts_with(&home));
        assert!(default_database().starts_with(&home));
        assert!(default_database().ends_with("augury.db"));
    }
}
