//! Import settings, optionally read from a YAML file.

use std::{fs, path::Path};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::{io_utils::DEFAULT_SNIFF_BYTES, parser::ParseOptions};

pub const MAX_ERRORS_REPORTED: usize = 50;
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportConfig {
    /// Row errors kept in detail per run; later failures are only counted.
    pub max_errors_reported: usize,
    /// Bytes inspected when sniffing the delimiter.
    pub sniff_bytes: usize,
    pub preview_rows: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_errors_reported: MAX_ERRORS_REPORTED,
            sniff_bytes: DEFAULT_SNIFF_BYTES,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl ImportConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("Reading config file {path:?}"))?;
        Self::from_yaml(&contents).with_context(|| format!("Parsing config file {path:?}"))
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(contents)?;
        config.ensure_valid()?;
        Ok(config)
    }

    pub fn ensure_valid(&self) -> Result<()> {
        ensure!(self.sniff_bytes > 0, "sniff_bytes must be positive");
        Ok(())
    }

    pub fn parse_options(&self, delimiter: Option<u8>) -> ParseOptions {
        ParseOptions {
            delimiter,
            sniff_bytes: self.sniff_bytes,
        }
    }
}
