//! Configuration file support for the sar tool

use anyhow::{Context, Result};
use sar_format::ArchiveOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Settings loaded from an optional JSON file
///
/// Archive options sit at the top level of the file:
///
/// ```json
/// { "strict": true, "compression_level": 9, "description": "assets" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Reader and builder options
    #[serde(flatten)]
    pub archive: ArchiveOptions,

    /// Description written into newly created archives
    pub description: Option<String>,
}

impl CliConfig {
    /// Load a config file, or the defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Apply command-line overrides on top of file values
    #[must_use]
    pub fn with_overrides(mut self, strict: bool, level: Option<u32>) -> Self {
        if strict {
            self.archive.strict = true;
        }
        if let Some(level) = level {
            self.archive.compression_level = level;
        }
        self
    }
}
