//! Extraction configuration
//!
//! Bundles the metric and voxel settings with the batch thread count. A
//! configuration file is JSON; every field is optional and falls back to
//! its default.

use crate::{MetricsConfig, VoxelGridConfig};
use enveco_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete configuration of a feature extraction run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub metrics: MetricsConfig,
    pub voxels: VoxelGridConfig,
    /// Worker threads for batch extraction (None = one per core)
    pub threads: Option<usize>,
}

impl ExtractionConfig {
    /// Parse a configuration from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::InvalidData(format!("invalid extraction config: {e}")))
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Serialize the configuration as pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::InvalidData(format!("cannot serialize extraction config: {e}")))
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }
}
