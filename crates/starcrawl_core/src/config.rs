//! Crawl configuration.
//!
//! # Responsibility
//! - Hold every tunable constant of the starfield, scroll and import paths.
//! - Deserialize partial JSON documents on top of the defaults.
//!
//! # Invariants
//! - A config that passed `validate()` never yields NaN or a zero divisor
//!   in the simulator.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One MiB, the default import ceiling.
pub const MIB: u64 = 1024 * 1024;

/// Configuration validation/parse failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// JSON document could not be parsed.
    Parse(String),
    /// A field holds a value outside its legal range.
    OutOfRange { field: &'static str, value: f64 },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(details) => write!(f, "invalid crawl config: {details}"),
            Self::OutOfRange { field, value } => {
                write!(f, "config field `{field}` out of range: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    pub starfield: StarfieldConfig,
    pub scroll: ScrollConfig,
    pub import: ImportConfig,
}

/// Particle field tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    /// Hard cap on the number of stars, bounding per-frame cost.
    pub max_particles: usize,
    /// Canvas pixels per star.
    pub density_divisor: f64,
    /// Distance outside the canvas a star may travel before recycling.
    pub edge_margin: f32,
    /// Share of stars in the far layer.
    pub far_share: f64,
    /// Share of stars in the mid layer; near takes the remainder.
    pub mid_share: f64,
    /// Minimum milliseconds between processed frames.
    pub frame_budget_ms: f64,
    /// Quiet period before a resize regenerates the field.
    pub resize_debounce_ms: f64,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            max_particles: 350,
            density_divisor: 2000.0,
            edge_margin: 10.0,
            far_share: 0.5,
            mid_share: 0.3,
            frame_budget_ms: 16.0,
            resize_debounce_ms: 200.0,
            seed: None,
        }
    }
}

/// Scroll coordinator tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Distance from the content bottom at which scrolling locks.
    pub edge_threshold_px: f64,
    /// Scalar at or above which the logo is shown.
    pub logo_threshold: f64,
    /// CSS perspective of the text panel.
    pub perspective_px: f64,
    /// X-axis tilt of the text panel.
    pub tilt_deg: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            edge_threshold_px: 100.0,
            logo_threshold: 500.0,
            perspective_px: 400.0,
            tilt_deg: 45.0,
        }
    }
}

/// File import limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub max_file_bytes: u64,
    /// Lowercase extensions without the dot.
    pub allowed_extensions: Vec<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: MIB,
            allowed_extensions: vec!["txt".to_string(), "md".to_string()],
        }
    }
}

impl CrawlConfig {
    /// Parses a (possibly partial) JSON document and validates it.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every numeric field against its legal range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sf = &self.starfield;
        positive("starfield.density_divisor", sf.density_divisor)?;
        non_negative("starfield.edge_margin", f64::from(sf.edge_margin))?;
        non_negative("starfield.frame_budget_ms", sf.frame_budget_ms)?;
        non_negative("starfield.resize_debounce_ms", sf.resize_debounce_ms)?;
        unit_interval("starfield.far_share", sf.far_share)?;
        unit_interval("starfield.mid_share", sf.mid_share)?;
        if sf.far_share + sf.mid_share > 1.0 {
            return Err(ConfigError::OutOfRange {
                field: "starfield.far_share + starfield.mid_share",
                value: sf.far_share + sf.mid_share,
            });
        }

        let scroll = &self.scroll;
        non_negative("scroll.edge_threshold_px", scroll.edge_threshold_px)?;
        finite("scroll.logo_threshold", scroll.logo_threshold)?;
        positive("scroll.perspective_px", scroll.perspective_px)?;
        finite("scroll.tilt_deg", scroll.tilt_deg)?;

        if self.import.max_file_bytes == 0 {
            return Err(ConfigError::OutOfRange {
                field: "import.max_file_bytes",
                value: 0.0,
            });
        }
        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

fn unit_interval(field: &'static str, value: f64) -> Result<(), ConfigError> {
    non_negative(field, value)?;
    if value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CrawlConfig, MIB};

    #[test]
    fn defaults_are_valid() {
        let config = CrawlConfig::default();
        config.validate().expect("default config should validate");
        assert_eq!(config.starfield.max_particles, 350);
        assert_eq!(config.import.max_file_bytes, MIB);
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config = CrawlConfig::from_json_str(r#"{"starfield":{"max_particles":40,"seed":7}}"#)
            .expect("partial config should parse");
        assert_eq!(config.starfield.max_particles, 40);
        assert_eq!(config.starfield.seed, Some(7));
        assert_eq!(config.scroll.logo_threshold, 500.0);
    }

    #[test]
    fn rejects_shares_above_one() {
        let err = CrawlConfig::from_json_str(r#"{"starfield":{"far_share":0.8,"mid_share":0.4}}"#)
            .expect_err("shares over 1 must be rejected");
        assert!(matches!(err, ConfigError::OutOfRange { .. }));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = CrawlConfig::from_json_str("{starfield:").expect_err("malformed json");
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
