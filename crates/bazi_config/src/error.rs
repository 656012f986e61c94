//! Error types for configuration loading.

use thiserror::Error;

/// Errors from reading or validating a configuration file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value parsed but is outside its allowed range.
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
