use crate::ConfigError;
use markerscan_aruco::{DecoderParams, LocalizerParams};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// All detector tuning knobs. Every field has a default, so a JSON file only
/// needs to mention what it overrides.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    pub localizer: LocalizerParams,
    pub decoder: DecoderParams,
    /// Bits that may differ from a codeword. `0` means exact matching.
    pub max_hamming: u8,
}

impl DetectorParams {
    /// Parse parameters from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load parameters from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}
