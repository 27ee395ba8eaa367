use std::path::PathBuf;

use thiserror::Error;

/// A violation record that breaks the record invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidViolation {
    #[error("rule id must not be empty")]
    EmptyRuleId,
}

/// A rule id missing from the catalog.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown rule {0:?}")]
pub struct UnknownRule(pub String);

/// Failure to decode an analyzer reply payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("malformed analyzer payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
