//! Runtime configuration for fingerprint aggregation.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Fonts probed for availability, in reporting order.
pub const DEFAULT_FONTS: [&str; 13] = [
    "Arial",
    "Helvetica",
    "Times New Roman",
    "Courier",
    "Verdana",
    "Georgia",
    "Palatino",
    "Garamond",
    "Bookman",
    "Comic Sans MS",
    "Trebuchet MS",
    "Arial Black",
    "Impact",
];

/// How fingerprints are assembled and where they are cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerprintConfig {
    /// Key under which the digest is persisted
    pub storage_key: String,

    /// Separator placed between components before hashing
    pub separator: char,

    /// Candidate font families
    pub fonts: Vec<String>,

    /// Component used when the drawing surface is unavailable
    pub canvas_sentinel: String,

    /// Component used when audio processing is unavailable
    pub audio_sentinel: String,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            storage_key: "deviceFingerprint".to_string(),
            separator: '|',
            fonts: DEFAULT_FONTS.iter().map(|f| f.to_string()).collect(),
            canvas_sentinel: "canvas-unsupported".to_string(),
            audio_sentinel: "audio-unsupported".to_string(),
        }
    }
}

impl FingerprintConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load configuration from `path`, or the defaults if it doesn't exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
