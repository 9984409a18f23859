// Analysis configuration.
// Read from `metricraft.toml` next to the analyzed root when present;
// CLI flags override whatever the file says.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "metricraft.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Directory names skipped during folder/workspace scans, in addition
    /// to the built-in `target` and `.git`.
    pub exclude_dirs: Vec<String>,
    /// Measure types declared inside `#[cfg(test)]` modules.
    pub include_tests: bool,
    /// Default output format when the CLI does not pass one.
    pub format: Option<String>,
    /// Worker thread count (0 or absent = auto).
    pub threads: Option<usize>,
}

impl AnalysisConfig {
    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file {}", path.display()))?;
        let config: AnalysisConfig = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Look for `metricraft.toml` under `root`; defaults when absent.
    pub fn discover(root: &Path) -> Result<Self> {
        let candidate = root.join(CONFIG_FILE_NAME);
        if candidate.exists() {
            println!("[metricraft] Using config: {}", candidate.display());
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }
}
