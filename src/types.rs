//! Core types for the Gaitflux pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: raw readings, window-annotated readings, and the per-window
//! feature vectors that make up the output table.

use crate::error::PipelineError;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Wearable device a channel was recorded on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Smartphone,
    Smartwatch,
}

impl Device {
    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Smartphone => "smartphone",
            Device::Smartwatch => "smartwatch",
        }
    }
}

/// Spatial axis of an inertial sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Inertial sensor kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensor {
    Acc,
    Gyro,
}

/// One named sensor channel, e.g. `acc_x_smartphone`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Channel {
    pub sensor: Sensor,
    pub axis: Axis,
    pub device: Device,
}

impl Channel {
    /// Every channel a reading must carry, in canonical column order
    pub const ALL: [Channel; 12] = [
        Channel::new(Sensor::Acc, Axis::X, Device::Smartphone),
        Channel::new(Sensor::Acc, Axis::Y, Device::Smartphone),
        Channel::new(Sensor::Acc, Axis::Z, Device::Smartphone),
        Channel::new(Sensor::Gyro, Axis::X, Device::Smartphone),
        Channel::new(Sensor::Gyro, Axis::Y, Device::Smartphone),
        Channel::new(Sensor::Gyro, Axis::Z, Device::Smartphone),
        Channel::new(Sensor::Acc, Axis::X, Device::Smartwatch),
        Channel::new(Sensor::Acc, Axis::Y, Device::Smartwatch),
        Channel::new(Sensor::Acc, Axis::Z, Device::Smartwatch),
        Channel::new(Sensor::Gyro, Axis::X, Device::Smartwatch),
        Channel::new(Sensor::Gyro, Axis::Y, Device::Smartwatch),
        Channel::new(Sensor::Gyro, Axis::Z, Device::Smartwatch),
    ];

    pub const fn new(sensor: Sensor, axis: Axis, device: Device) -> Self {
        Self {
            sensor,
            axis,
            device,
        }
    }

    /// Column name used by the recording tooling
    pub fn name(&self) -> &'static str {
        match (self.sensor, self.axis, self.device) {
            (Sensor::Acc, Axis::X, Device::Smartphone) => "acc_x_smartphone",
            (Sensor::Acc, Axis::Y, Device::Smartphone) => "acc_y_smartphone",
            (Sensor::Acc, Axis::Z, Device::Smartphone) => "acc_z_smartphone",
            (Sensor::Gyro, Axis::X, Device::Smartphone) => "gyro_x_smartphone",
            (Sensor::Gyro, Axis::Y, Device::Smartphone) => "gyro_y_smartphone",
            (Sensor::Gyro, Axis::Z, Device::Smartphone) => "gyro_z_smartphone",
            (Sensor::Acc, Axis::X, Device::Smartwatch) => "acc_x_smartwatch",
            (Sensor::Acc, Axis::Y, Device::Smartwatch) => "acc_y_smartwatch",
            (Sensor::Acc, Axis::Z, Device::Smartwatch) => "acc_z_smartwatch",
            (Sensor::Gyro, Axis::X, Device::Smartwatch) => "gyro_x_smartwatch",
            (Sensor::Gyro, Axis::Y, Device::Smartwatch) => "gyro_y_smartwatch",
            (Sensor::Gyro, Axis::Z, Device::Smartwatch) => "gyro_z_smartwatch",
        }
    }

    /// Position in [`Channel::ALL`]
    pub(crate) fn index(&self) -> usize {
        let sensor = match self.sensor {
            Sensor::Acc => 0,
            Sensor::Gyro => 3,
        };
        let axis = match self.axis {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        };
        let device = match self.device {
            Device::Smartphone => 0,
            Device::Smartwatch => 6,
        };
        device + sensor + axis
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Channel {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .iter()
            .copied()
            .find(|c| c.name() == s)
            .ok_or_else(|| PipelineError::UnknownChannel(s.to_string()))
    }
}

/// Fixed per-reading channel record.
///
/// `None` is the missing marker; there is no sentinel number.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChannelValues {
    values: [Option<f64>; 12],
}

impl ChannelValues {
    /// Build a record with every channel present
    pub fn from_array(values: [f64; 12]) -> Self {
        Self {
            values: values.map(Some),
        }
    }

    pub fn get(&self, channel: Channel) -> Option<f64> {
        self.values[channel.index()]
    }

    pub fn set(&mut self, channel: Channel, value: Option<f64>) {
        self.values[channel.index()] = value;
    }

    /// Builder-style setter
    pub fn with(mut self, channel: Channel, value: Option<f64>) -> Self {
        self.set(channel, value);
        self
    }

    /// Iterate `(channel, value)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Channel, Option<f64>)> + '_ {
        Channel::ALL.iter().map(move |c| (*c, self.get(*c)))
    }

    /// True when no channel carries the missing marker
    pub fn is_complete(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }
}

/// One timestamped multi-channel sensor sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawReading", into = "RawReading")]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub channels: ChannelValues,
}

impl Reading {
    pub fn new(timestamp: DateTime<Utc>, channels: ChannelValues) -> Self {
        Self {
            timestamp,
            channels,
        }
    }

    /// Build a reading from a named channel map.
    ///
    /// Every channel key must be present; a `None` value is a missing sample,
    /// an absent key is malformed input.
    pub fn from_map(
        timestamp: DateTime<Utc>,
        map: &HashMap<String, Option<f64>>,
    ) -> Result<Self, PipelineError> {
        let mut channels = ChannelValues::default();
        for channel in Channel::ALL {
            let value = map
                .get(channel.name())
                .ok_or_else(|| PipelineError::MissingChannel {
                    channel: channel.name().to_string(),
                    window_id: None,
                })?;
            channels.set(channel, *value);
        }
        Ok(Self::new(timestamp, channels))
    }
}

/// Parse an ISO-8601 timestamp.
///
/// Accepts RFC 3339 (with offset) and naive date-times, which are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, PipelineError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    Err(PipelineError::InvalidTimestamp(raw.to_string()))
}

/// Flat wire shape of a reading: `{"timestamp": ..., "<channel>": number|null}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawReading {
    pub timestamp: String,
    #[serde(flatten)]
    pub fields: HashMap<String, serde_json::Value>,
}

impl TryFrom<RawReading> for Reading {
    type Error = PipelineError;

    fn try_from(raw: RawReading) -> Result<Self, Self::Error> {
        let timestamp = parse_timestamp(&raw.timestamp)?;
        let mut channels = ChannelValues::default();
        for channel in Channel::ALL {
            let value = match raw.fields.get(channel.name()) {
                None => {
                    return Err(PipelineError::MissingChannel {
                        channel: channel.name().to_string(),
                        window_id: None,
                    })
                }
                Some(serde_json::Value::Null) => None,
                Some(serde_json::Value::Number(n)) => n.as_f64(),
                Some(other) => {
                    return Err(PipelineError::InvalidChannelValue {
                        channel: channel.name().to_string(),
                        value: other.to_string(),
                    })
                }
            };
            channels.set(channel, value);
        }
        Ok(Reading::new(timestamp, channels))
    }
}

impl From<Reading> for RawReading {
    fn from(reading: Reading) -> Self {
        let fields = reading
            .channels
            .iter()
            .map(|(channel, value)| {
                let json = value
                    .and_then(serde_json::Number::from_f64)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null);
                (channel.name().to_string(), json)
            })
            .collect();
        RawReading {
            timestamp: reading.timestamp.to_rfc3339(),
            fields,
        }
    }
}

/// A reading tagged with its position in the windowed stream
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedReading {
    pub reading: Reading,
    /// Elapsed seconds since the first reading of the stream
    pub seconds_since_start: f64,
    pub window_id: u64,
}

/// Output feature names
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeatureName {
    StepsSmartphone,
    CadenceSmartphone,
    AvgVelocitySmartphone,
    ResidualStepLengthSmartphone,
    AvgStepTimeSmartphone,
    ResidualStepTimeSmartphone,
    XySwayAreaSmartphone,
    YzSwayAreaSmartphone,
    XzSwayAreaSmartphone,
    SwayVolumeSmartphone,
    FrequencyRatioSmartphone,
    BandPowerSmartphone,
    SignalNoiseRatioSmartphone,
    SkewnessSmartphone,
    KurtosisSmartphone,
    TotalHarmonicDistortionSmartphone,
    VelocityMeanXSmartphone,
    VelocityVarianceXSmartphone,
    VelocityMeanYSmartphone,
    VelocityVarianceYSmartphone,
    VelocityMeanZSmartphone,
    VelocityVarianceZSmartphone,
    XySwayAreaSmartwatch,
    YzSwayAreaSmartwatch,
    XzSwayAreaSmartwatch,
    SwayVolumeSmartwatch,
    VelocityMeanXSmartwatch,
    VelocityVarianceXSmartwatch,
    VelocityMeanYSmartwatch,
    VelocityVarianceYSmartwatch,
    VelocityMeanZSmartwatch,
    VelocityVarianceZSmartwatch,
    AngularVelocityMeanXSmartwatch,
    AngularVelocityVarianceXSmartwatch,
    AngularVelocityMeanYSmartwatch,
    AngularVelocityVarianceYSmartwatch,
    AngularVelocityMeanZSmartwatch,
    AngularVelocityVarianceZSmartwatch,
}

impl FeatureName {
    pub const ALL: [FeatureName; 38] = [
        FeatureName::StepsSmartphone,
        FeatureName::CadenceSmartphone,
        FeatureName::AvgVelocitySmartphone,
        FeatureName::ResidualStepLengthSmartphone,
        FeatureName::AvgStepTimeSmartphone,
        FeatureName::ResidualStepTimeSmartphone,
        FeatureName::XySwayAreaSmartphone,
        FeatureName::YzSwayAreaSmartphone,
        FeatureName::XzSwayAreaSmartphone,
        FeatureName::SwayVolumeSmartphone,
        FeatureName::FrequencyRatioSmartphone,
        FeatureName::BandPowerSmartphone,
        FeatureName::SignalNoiseRatioSmartphone,
        FeatureName::SkewnessSmartphone,
        FeatureName::KurtosisSmartphone,
        FeatureName::TotalHarmonicDistortionSmartphone,
        FeatureName::VelocityMeanXSmartphone,
        FeatureName::VelocityVarianceXSmartphone,
        FeatureName::VelocityMeanYSmartphone,
        FeatureName::VelocityVarianceYSmartphone,
        FeatureName::VelocityMeanZSmartphone,
        FeatureName::VelocityVarianceZSmartphone,
        FeatureName::XySwayAreaSmartwatch,
        FeatureName::YzSwayAreaSmartwatch,
        FeatureName::XzSwayAreaSmartwatch,
        FeatureName::SwayVolumeSmartwatch,
        FeatureName::VelocityMeanXSmartwatch,
        FeatureName::VelocityVarianceXSmartwatch,
        FeatureName::VelocityMeanYSmartwatch,
        FeatureName::VelocityVarianceYSmartwatch,
        FeatureName::VelocityMeanZSmartwatch,
        FeatureName::VelocityVarianceZSmartwatch,
        FeatureName::AngularVelocityMeanXSmartwatch,
        FeatureName::AngularVelocityVarianceXSmartwatch,
        FeatureName::AngularVelocityMeanYSmartwatch,
        FeatureName::AngularVelocityVarianceYSmartwatch,
        FeatureName::AngularVelocityMeanZSmartwatch,
        FeatureName::AngularVelocityVarianceZSmartwatch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureName::StepsSmartphone => "steps_smartphone",
            FeatureName::CadenceSmartphone => "cadence_smartphone",
            FeatureName::AvgVelocitySmartphone => "avg_velocity_smartphone",
            FeatureName::ResidualStepLengthSmartphone => "residual_step_length_smartphone",
            FeatureName::AvgStepTimeSmartphone => "avg_step_time_smartphone",
            FeatureName::ResidualStepTimeSmartphone => "residual_step_time_smartphone",
            FeatureName::XySwayAreaSmartphone => "XY_sway_area_smartphone",
            FeatureName::YzSwayAreaSmartphone => "YZ_sway_area_smartphone",
            FeatureName::XzSwayAreaSmartphone => "XZ_sway_area_smartphone",
            FeatureName::SwayVolumeSmartphone => "sway_volume_smartphone",
            FeatureName::FrequencyRatioSmartphone => "frequency_ratio_smartphone",
            FeatureName::BandPowerSmartphone => "band_power_smartphone",
            FeatureName::SignalNoiseRatioSmartphone => "signal_noise_ratio_smartphone",
            FeatureName::SkewnessSmartphone => "skewness_smartphone",
            FeatureName::KurtosisSmartphone => "kurtosis_smartphone",
            FeatureName::TotalHarmonicDistortionSmartphone => {
                "total_harmonic_distortion_smartphone"
            }
            FeatureName::VelocityMeanXSmartphone => "velocity_mean_X_smartphone",
            FeatureName::VelocityVarianceXSmartphone => "velocity_variance_X_smartphone",
            FeatureName::VelocityMeanYSmartphone => "velocity_mean_Y_smartphone",
            FeatureName::VelocityVarianceYSmartphone => "velocity_variance_Y_smartphone",
            FeatureName::VelocityMeanZSmartphone => "velocity_mean_Z_smartphone",
            FeatureName::VelocityVarianceZSmartphone => "velocity_variance_Z_smartphone",
            FeatureName::XySwayAreaSmartwatch => "XY_sway_area_smartwatch",
            FeatureName::YzSwayAreaSmartwatch => "YZ_sway_area_smartwatch",
            FeatureName::XzSwayAreaSmartwatch => "XZ_sway_area_smartwatch",
            FeatureName::SwayVolumeSmartwatch => "sway_volume_smartwatch",
            FeatureName::VelocityMeanXSmartwatch => "velocity_mean_X_smartwatch",
            FeatureName::VelocityVarianceXSmartwatch => "velocity_variance_X_smartwatch",
            FeatureName::VelocityMeanYSmartwatch => "velocity_mean_Y_smartwatch",
            FeatureName::VelocityVarianceYSmartwatch => "velocity_variance_Y_smartwatch",
            FeatureName::VelocityMeanZSmartwatch => "velocity_mean_Z_smartwatch",
            FeatureName::VelocityVarianceZSmartwatch => "velocity_variance_Z_smartwatch",
            FeatureName::AngularVelocityMeanXSmartwatch => "angular_velocity_mean_X_smartwatch",
            FeatureName::AngularVelocityVarianceXSmartwatch => {
                "angular_velocity_variance_X_smartwatch"
            }
            FeatureName::AngularVelocityMeanYSmartwatch => "angular_velocity_mean_Y_smartwatch",
            FeatureName::AngularVelocityVarianceYSmartwatch => {
                "angular_velocity_variance_Y_smartwatch"
            }
            FeatureName::AngularVelocityMeanZSmartwatch => "angular_velocity_mean_Z_smartwatch",
            FeatureName::AngularVelocityVarianceZSmartwatch => {
                "angular_velocity_variance_Z_smartwatch"
            }
        }
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("unknown feature name: {s}"))
    }
}

impl Serialize for FeatureName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FeatureName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Named scalar features for one window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub window_id: u64,
    pub values: BTreeMap<FeatureName, f64>,
}

impl FeatureVector {
    /// A vector with every feature present and set to zero
    pub fn zeroed(window_id: u64) -> Self {
        Self {
            window_id,
            values: FeatureName::ALL.iter().map(|name| (*name, 0.0)).collect(),
        }
    }

    pub fn get(&self, name: FeatureName) -> f64 {
        self.values.get(&name).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, name: FeatureName, value: f64) {
        self.values.insert(name, value);
    }

    /// True when every enumerated feature is present
    pub fn is_complete(&self) -> bool {
        FeatureName::ALL.iter().all(|name| self.values.contains_key(name))
    }
}

/// Feature vectors for every observed window, ascending by `window_id`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    pub rows: Vec<FeatureVector>,
}

impl FeatureTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn window_ids(&self) -> Vec<u64> {
        self.rows.iter().map(|row| row.window_id).collect()
    }

    pub fn get(&self, window_id: u64) -> Option<&FeatureVector> {
        self.rows.iter().find(|row| row.window_id == window_id)
    }
}
