//! RON configuration loading shared by the wave list, the enemy catalog
//! and the arena description.

use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse RON config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Parse a RON document into any deserializable config type.
pub fn from_ron_str<T: DeserializeOwned>(source: &str) -> Result<T, ConfigError> {
    Ok(ron::de::from_str(source)?)
}

/// Read and parse a RON config file.
pub fn load_ron<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let source = std::fs::read_to_string(path)?;
    from_ron_str(&source)
}
