//! Renderer configuration.
//!
//! Every field has a default, so an empty (or absent) config file yields the
//! same output as the hosted ades web page. Rule-id links are not
//! configurable; they always point at the published rules page.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Element id of the results container.
pub const DEFAULT_RESULTS_ID: &str = "results";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewConfig {
    #[serde(default = "default_results_id")]
    pub results_id: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            results_id: default_results_id(),
        }
    }
}

fn default_results_id() -> String {
    DEFAULT_RESULTS_ID.to_string()
}

impl ViewConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}
