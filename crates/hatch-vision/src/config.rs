//! JSON configuration for the full pipeline.

use std::{fs, path::Path};

use hatch_vision_detector::HatchDetectorParams;
use serde::{Deserialize, Serialize};

use crate::telemetry::DEFAULT_TABLE_NAME;
use crate::StabilizerParams;

#[derive(thiserror::Error, Debug)]
pub enum ConfigIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn default_table_name() -> String {
    DEFAULT_TABLE_NAME.to_owned()
}

/// Detector, cadence and telemetry settings in one file.
///
/// Every section may be omitted; missing values fall back to the deployed
/// defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HatchVisionConfig {
    #[serde(default)]
    pub detector: HatchDetectorParams,
    #[serde(default)]
    pub stabilizer: StabilizerParams,
    /// Name of the shared table telemetry is published to.
    #[serde(default = "default_table_name")]
    pub table_name: String,
}

impl Default for HatchVisionConfig {
    fn default() -> Self {
        Self {
            detector: HatchDetectorParams::default(),
            stabilizer: StabilizerParams::default(),
            table_name: default_table_name(),
        }
    }
}

impl HatchVisionConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
