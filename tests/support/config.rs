use std::fs;
use std::path::{Path, PathBuf};

/// Configuration with every setting at its default except the provider,
/// which is simulated so tests never reach the network.
pub const SIMULATED: &str = r#"
[providers]
source = "simulated"
"#;

/// Write `contents` as `config.toml` under `dir`.
pub fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("config.toml");
    fs::write(&path, contents).expect("write config");
    path
}

/// The documented template shipped with the crate.
pub fn template() -> &'static str {
    include_str!("../../config.toml.example")
}
