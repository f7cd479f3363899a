use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::locate::StaffLocatorConfig;
use crate::resolve::DurationConfig;
use crate::scan::ScanConfig;
use crate::stem::StemConfig;

/// Top-level recognition configuration.
///
/// Every field falls back to its default when missing from a JSON file, so a
/// config only needs to name the thresholds it changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizeConfig {
    /// Staff-line localization.
    pub staff: StaffLocatorConfig,
    /// Sliding-window note scanning and slot merging.
    pub scan: ScanConfig,
    /// Stem detection.
    pub stem: StemConfig,
    /// Duration classification.
    pub duration: DurationConfig,
}

impl RecognizeConfig {
    /// Parse from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let json = std::fs::read_to_string(path)?;
        Ok(Self::from_json_str(&json)?)
    }

    /// Configuration that never looks for stems; every note then resolves
    /// from its fill score alone.
    pub fn without_stems() -> Self {
        let mut config = Self::default();
        config.stem.enable = false;
        config
    }
}
