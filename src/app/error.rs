use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unsupported config format for {0:?} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Failed to serialize TOML: {0}")]
    TomlWrite(#[from] toml::ser::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Empty content pattern at index {0}")]
    EmptyPattern(usize),
    #[error("Invalid glob pattern `{pattern}`: {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
    #[error("Unknown variant `{name}` (built-in snapshots: {known})")]
    UnknownVariant { name: String, known: String },
}
