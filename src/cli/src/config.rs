//! Configuration for the blocktrace CLI.

use anyhow::Result;
use blocktrace_core::LedgerConfig;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Configuration for the blocktrace CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Directory holding the ledger database
    pub data_dir: String,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
    /// Ledger write policy
    pub ledger: LedgerConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        let mut dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        dir.push("blocktrace");

        Self {
            data_dir: dir.to_string_lossy().into_owned(),
            log_filter: "warn".to_string(),
            ledger: LedgerConfig::default(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Saves configuration to a file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Path of the ledger database inside the data directory.
    pub fn ledger_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join("ledger")
    }
}
