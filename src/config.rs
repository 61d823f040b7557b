//! Pipeline configuration
//!
//! All settings have defaults matching the recording setup (5 s windows,
//! 50 Hz sampling, 95% sway confidence), so an empty JSON object is a valid
//! configuration.

use crate::error::PipelineError;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default window width in seconds
pub const DEFAULT_WINDOW_SIZE_SECONDS: f64 = 5.0;

/// Default sampling frequency in Hz
pub const DEFAULT_FREQUENCY_HZ: f64 = 50.0;

/// Confidence level the sway-area chi-square constant is tabulated for
pub const SWAY_CONFIDENCE: f64 = 0.95;

/// Missing-value imputation strategy.
///
/// Only forward fill is implemented; other strategy names are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FillMethod {
    #[default]
    ForwardFill,
}

impl FillMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            FillMethod::ForwardFill => "ffill",
        }
    }
}

impl fmt::Display for FillMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FillMethod {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ffill" | "forward" | "pad" => Ok(FillMethod::ForwardFill),
            _ => Err(PipelineError::UnsupportedFillMethod(s.to_string())),
        }
    }
}

impl TryFrom<String> for FillMethod {
    type Error = PipelineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FillMethod> for String {
    fn from(method: FillMethod) -> Self {
        method.as_str().to_string()
    }
}

/// Settings shared by every pipeline stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Missing-value imputation strategy
    pub fill_method: FillMethod,
    /// Window width for the windower (seconds)
    pub window_size_seconds: f64,
    /// Sampling rate used by every time-based integration (Hz)
    pub frequency: f64,
    /// Sway-area confidence. The chi-square constant is fixed at the 0.95
    /// level, so other values are accepted but have no effect.
    pub confidence: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fill_method: FillMethod::ForwardFill,
            window_size_seconds: DEFAULT_WINDOW_SIZE_SECONDS,
            frequency: DEFAULT_FREQUENCY_HZ,
            confidence: SWAY_CONFIDENCE,
        }
    }
}

impl PipelineConfig {
    /// Load and validate a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_window_size(mut self, seconds: f64) -> Self {
        self.window_size_seconds = seconds;
        self
    }

    pub fn with_frequency(mut self, hz: f64) -> Self {
        self.frequency = hz;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), PipelineError> {
        require_positive("window_size_seconds", self.window_size_seconds)?;
        require_positive("frequency", self.frequency)?;
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "confidence must lie in (0, 1), got {}",
                self.confidence
            )));
        }
        if (self.confidence - SWAY_CONFIDENCE).abs() > f64::EPSILON {
            warn!(
                "confidence {} ignored: sway area is always computed at the {} level",
                self.confidence, SWAY_CONFIDENCE
            );
        }
        Ok(())
    }
}

/// Reject a stage setting that is not a finite positive number
pub(crate) fn require_positive(name: &str, value: f64) -> Result<f64, PipelineError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(PipelineError::InvalidConfig(format!(
            "{name} must be positive, got {value}"
        )))
    }
}
