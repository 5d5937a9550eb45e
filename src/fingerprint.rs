//! Stable per-device fingerprints.
//!
//! A fingerprint is the SHA1 of a fixed sequence of environment signals:
//!
//! ```text
//! canvas | audio | screen | hardware | browser/os | fonts
//! ```
//!
//! The order is part of the format. Where a capability is missing, its
//! component is replaced by a sentinel string rather than failing the whole
//! computation. The resulting digest is cached through a [`Storage`].

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::FingerprintConfig;
use crate::error::{Error, Result};
use crate::storage::Storage;

/// Display geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Screen {
    pub width: u32,
    pub height: u32,
    /// Device pixels per CSS pixel. Non-positive values are treated as 1.
    pub pixel_ratio: f64,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            pixel_ratio: 1.0,
        }
    }
}

impl Screen {
    /// `"{width * ratio}x{height * ratio}"`, integral values without a fraction.
    pub fn descriptor(&self) -> String {
        let ratio = if self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0 {
            self.pixel_ratio
        } else {
            1.0
        };
        format!(
            "{}x{}",
            self.width as f64 * ratio,
            self.height as f64 * ratio
        )
    }
}

/// Coarse hardware class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hardware {
    /// Logical processors
    pub concurrency: Option<u32>,
    /// Approximate memory in GiB
    pub memory_gb: Option<f64>,
}

impl Hardware {
    /// `"{concurrency}|{memory}"`, with `unknown` for absent or zero values.
    pub fn descriptor(&self) -> String {
        let concurrency = match self.concurrency {
            Some(n) if n > 0 => n.to_string(),
            _ => "unknown".to_string(),
        };
        let memory = match self.memory_gb {
            Some(m) if m > 0.0 => m.to_string(),
            _ => "unknown".to_string(),
        };
        format!("{concurrency}|{memory}")
    }
}

/// Browser family, first match wins.
pub fn browser_name(user_agent: &str) -> &'static str {
    const BROWSERS: [&str; 5] = ["Firefox", "Chrome", "Safari", "Edge", "Opera"];
    BROWSERS
        .into_iter()
        .find(|b| user_agent.contains(b))
        .unwrap_or("Unknown")
}

/// Operating system family, first match wins.
pub fn os_name(user_agent: &str) -> &'static str {
    const SYSTEMS: [(&str, &str); 5] = [
        ("Win", "Windows"),
        ("Mac", "MacOS"),
        ("Linux", "Linux"),
        ("Android", "Android"),
        ("iOS", "iOS"),
    ];
    SYSTEMS
        .into_iter()
        .find(|(needle, _)| user_agent.contains(needle))
        .map(|(_, name)| name)
        .unwrap_or("Unknown")
}

/// Source of the signals a fingerprint is built from.
pub trait Environment {
    /// Data derived from a fixed drawing on an off-screen surface.
    fn canvas(&self) -> Result<String>;
    /// Data derived from a silent oscillator run through an analyser.
    fn audio(&self) -> Result<String>;
    fn screen(&self) -> Screen;
    fn hardware(&self) -> Hardware;
    fn user_agent(&self) -> String;
    fn has_font(&self, family: &str) -> bool;
}

/// Signals collected elsewhere, e.g. posted by a client as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Signals {
    pub canvas: Option<String>,
    pub audio: Option<String>,
    pub screen: Screen,
    pub hardware: Hardware,
    pub user_agent: String,
    /// Font families known to be available
    pub fonts: Vec<String>,
}

impl Signals {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Environment for Signals {
    fn canvas(&self) -> Result<String> {
        self.canvas.clone().ok_or(Error::Unsupported("canvas"))
    }

    fn audio(&self) -> Result<String> {
        self.audio.clone().ok_or(Error::Unsupported("audio"))
    }

    fn screen(&self) -> Screen {
        self.screen
    }

    fn hardware(&self) -> Hardware {
        self.hardware
    }

    fn user_agent(&self) -> String {
        self.user_agent.clone()
    }

    fn has_font(&self, family: &str) -> bool {
        self.fonts.iter().any(|f| f == family)
    }
}

/// The ordered components of a fingerprint.
pub fn components<E: Environment + ?Sized>(env: &E, config: &FingerprintConfig) -> Vec<String> {
    let canvas = env.canvas().unwrap_or_else(|e| {
        warn!(error = %e, "canvas fingerprinting not supported");
        config.canvas_sentinel.clone()
    });
    let audio = env.audio().unwrap_or_else(|e| {
        warn!(error = %e, "audio fingerprinting not supported");
        config.audio_sentinel.clone()
    });
    let ua = env.user_agent();
    let fonts = config
        .fonts
        .iter()
        .filter(|f| env.has_font(f))
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(",");

    vec![
        canvas,
        audio,
        env.screen().descriptor(),
        env.hardware().descriptor(),
        format!("{}|{}", browser_name(&ua), os_name(&ua)),
        fonts,
    ]
}

/// Digest of the joined components, ignoring any cache.
pub fn compute_fingerprint<E: Environment + ?Sized>(env: &E, config: &FingerprintConfig) -> String {
    let mut buf = [0u8; 4];
    let sep: &str = config.separator.encode_utf8(&mut buf);
    crate::digest(components(env, config).join(sep))
}

/// Cached fingerprint for `env`.
///
/// A non-empty value stored under `config.storage_key` is returned as is.
/// Otherwise the fingerprint is computed and written back. Storage failures
/// are logged and never prevent a fresh digest from being returned.
pub fn get_fingerprint<E: Environment + ?Sized>(
    env: &E,
    storage: Option<&dyn Storage>,
    config: &FingerprintConfig,
) -> String {
    let key = config.storage_key.as_str();
    if let Some(storage) = storage {
        match storage.get(key) {
            Ok(Some(cached)) if !cached.is_empty() => {
                debug!(fingerprint = %cached, "using stored fingerprint");
                return cached;
            }
            Ok(_) => {}
            Err(e) => warn!(key, error = %e, "unable to read stored fingerprint"),
        }
    }

    let fingerprint = compute_fingerprint(env, config);
    debug!(%fingerprint, "computed fingerprint");

    if let Some(storage) = storage {
        if let Err(e) = storage.set(key, &fingerprint) {
            warn!(key, error = %e, "failed to store fingerprint");
        }
    }
    fingerprint
}

/// Configuration plus an optional cache, for repeated lookups.
pub struct Fingerprinter {
    config: FingerprintConfig,
    storage: Option<Box<dyn Storage + Send + Sync>>,
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self::new()
    }
}

impl Fingerprinter {
    /// No cache, default configuration.
    pub fn new() -> Self {
        Self {
            config: FingerprintConfig::default(),
            storage: None,
        }
    }

    pub fn with_config(mut self, config: FingerprintConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_storage(mut self, storage: impl Storage + Send + Sync + 'static) -> Self {
        self.storage = Some(Box::new(storage));
        self
    }

    pub fn fingerprint<E: Environment + ?Sized>(&self, env: &E) -> String {
        let storage = self.storage.as_deref().map(|s| s as &dyn Storage);
        get_fingerprint(env, storage, &self.config)
    }
}
