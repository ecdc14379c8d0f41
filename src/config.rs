//! Page configuration.
//!
//! The page may embed a JSON object in `<script type="application/json" id="site-config">`.
//! Every field is optional; missing fields take the defaults below.

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_CONTACT_ENDPOINT: &str = "https://api-node-backend.onrender.com/api/contact";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub contact_endpoint: String,
    pub particle_count: usize,
    pub rain: RainConfig,
    pub typewriter: TypewriterConfig,
    /// Fixed RNG seed; random per page load when absent.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RainConfig {
    pub font_px: f64,
    pub interval_ms: u32,
    pub charset: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TypewriterConfig {
    pub text: String,
    pub interval_ms: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            contact_endpoint: DEFAULT_CONTACT_ENDPOINT.to_string(),
            particle_count: 150,
            rain: RainConfig::default(),
            typewriter: TypewriterConfig::default(),
            seed: None,
        }
    }
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            font_px: 14.0,
            interval_ms: 33,
            charset: "01".to_string(),
        }
    }
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            text: "WEB DEVELOPER & DESIGNER".to_string(),
            interval_ms: 50,
        }
    }
}

impl SiteConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json(src: &str) -> Result<Self, ConfigError> {
        let cfg: SiteConfig = serde_json::from_str(src)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason| Err(ConfigError::Invalid { field, reason });
        if self.contact_endpoint.trim().is_empty() {
            return invalid("contact_endpoint", "must not be empty");
        }
        if !(self.rain.font_px.is_finite() && self.rain.font_px > 0.0) {
            return invalid("rain.font_px", "must be a positive number");
        }
        if self.rain.interval_ms == 0 {
            return invalid("rain.interval_ms", "must be greater than zero");
        }
        if self.rain.charset.is_empty() {
            return invalid("rain.charset", "must contain at least one character");
        }
        if self.typewriter.interval_ms == 0 {
            return invalid("typewriter.interval_ms", "must be greater than zero");
        }
        Ok(())
    }
}
