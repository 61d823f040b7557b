//! Gaitflux - Movement feature extraction for smartphone and smartwatch sensors
//!
//! Gaitflux turns a complete batch of timestamped accelerometer and gyroscope
//! readings into a table of per-window features through a deterministic
//! pipeline: forward fill → z-score normalization and percentile clipping →
//! fixed-width windowing → per-window feature computation.
//!
//! ## Features per window
//!
//! - **Gait**: steps and cadence from smartphone acceleration magnitude
//! - **Step kinematics**: average velocity, step length and step time residuals
//! - **Sway**: 95% confidence ellipse areas and sphere volume of gyroscope data
//! - **Integration**: mean and variance of integrated velocity / angular velocity
//! - **Statistics**: skewness, kurtosis and signal-to-noise ratio

pub mod config;
pub mod encoder;
pub mod error;
pub mod features;
pub mod normalizer;
pub mod numeric;
pub mod outlier;
pub mod pipeline;
pub mod synthetic;
pub mod types;
pub mod windower;

pub use config::{FillMethod, PipelineConfig};
pub use error::PipelineError;
pub use features::FeatureEngine;
pub use pipeline::{sensor_data_pipeline, Aggregator, FeatureProcessor};
pub use types::{
    Channel, ChannelValues, FeatureName, FeatureTable, FeatureVector, Reading, WindowedReading,
};

/// Gaitflux version embedded in encoded output
pub const GAITFLUX_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for encoded output
pub const PRODUCER_NAME: &str = "gaitflux";
