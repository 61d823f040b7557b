//! Synthetic smartphone + smartwatch trajectories
//!
//! Produces reproducible walking-trajectory streams for demos and tests:
//! zero-mean Gaussian noise per channel, scaled per sensor, sampled at a fixed
//! rate. The impairment label is carried as metadata only; it does not change
//! the generated signal.

use crate::types::{Channel, ChannelValues, Device, Reading, Sensor};
use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Blood-alcohol range label of a trajectory (g/ml)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpairmentLabel {
    #[serde(rename = "[0.00]")]
    Sober,
    #[serde(rename = "(0.00-0.05)")]
    Minimal,
    #[serde(rename = "[0.05-0.08)")]
    Mild,
    #[serde(rename = "[0.08-0.15)")]
    Moderate,
    #[serde(rename = "[0.15-0.25)")]
    Severe,
    #[serde(rename = "[0.25+)")]
    LifeThreatening,
}

impl ImpairmentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpairmentLabel::Sober => "[0.00]",
            ImpairmentLabel::Minimal => "(0.00-0.05)",
            ImpairmentLabel::Mild => "[0.05-0.08)",
            ImpairmentLabel::Moderate => "[0.08-0.15)",
            ImpairmentLabel::Severe => "[0.15-0.25)",
            ImpairmentLabel::LifeThreatening => "[0.25+)",
        }
    }
}

/// Noise scale per sensor and device
fn noise_scale(channel: Channel) -> f64 {
    match (channel.sensor, channel.device) {
        (Sensor::Acc, Device::Smartphone) => 0.75,
        (Sensor::Gyro, Device::Smartphone) => 0.35,
        (Sensor::Acc, Device::Smartwatch) => 1.0,
        (Sensor::Gyro, Device::Smartwatch) => 0.5,
    }
}

/// Generator settings for one trajectory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticTrajectory {
    /// Seed for the noise generator; equal seeds give equal streams
    pub seed: u64,
    pub duration_seconds: u32,
    /// Sampling rate (Hz)
    pub frequency: u32,
    pub label: ImpairmentLabel,
    pub start: DateTime<Utc>,
}

impl SyntheticTrajectory {
    /// 50 Hz trajectory starting 2024-01-01T00:00:00Z
    pub fn new(seed: u64, duration_seconds: u32, label: ImpairmentLabel) -> Self {
        Self {
            seed,
            duration_seconds,
            frequency: 50,
            label,
            start: Utc
                .timestamp_opt(1_704_067_200, 0)
                .single()
                .unwrap_or_default(),
        }
    }

    pub fn with_frequency(mut self, frequency: u32) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = start;
        self
    }

    pub fn sample_count(&self) -> usize {
        self.duration_seconds as usize * self.frequency as usize
    }

    /// Generate the reading stream
    pub fn generate(&self) -> Vec<Reading> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let frequency = f64::from(self.frequency.max(1));

        (0..self.sample_count())
            .map(|i| {
                let mut channels = ChannelValues::default();
                for channel in Channel::ALL {
                    let value = standard_normal(&mut rng) * noise_scale(channel);
                    channels.set(channel, Some(value));
                }
                let offset_ns = (i as f64 * 1e9 / frequency).round() as i64;
                let timestamp = self.start + Duration::nanoseconds(offset_ns);
                Reading::new(timestamp, channels)
            })
            .collect()
    }
}

/// Box-Muller transform over two uniform draws
fn standard_normal<R: Rng>(rng: &mut R) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{mean, std_dev};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sample_count_and_spacing() {
        let readings = SyntheticTrajectory::new(1, 3, ImpairmentLabel::Sober).generate();
        assert_eq!(readings.len(), 150);
        let gap = readings[1].timestamp - readings[0].timestamp;
        assert_eq!(gap, Duration::milliseconds(20));
        assert!(readings.iter().all(|r| r.channels.is_complete()));
    }

    #[test]
    fn test_offsets_follow_sample_index() {
        let start = Utc.with_ymd_and_hms(2023, 6, 1, 8, 30, 0).unwrap();
        let readings = SyntheticTrajectory::new(2, 10, ImpairmentLabel::Mild)
            .with_frequency(3)
            .with_start(start)
            .generate();

        assert_eq!(readings.len(), 30);
        assert_eq!(readings[0].timestamp, start);
        assert_eq!(readings[3].timestamp - start, Duration::seconds(1));
        assert_eq!(readings[29].timestamp - start, Duration::nanoseconds(9_666_666_667));
    }

    #[test]
    fn test_seed_reproducibility() {
        let a = SyntheticTrajectory::new(42, 2, ImpairmentLabel::Severe).generate();
        let b = SyntheticTrajectory::new(42, 2, ImpairmentLabel::Severe).generate();
        let c = SyntheticTrajectory::new(43, 2, ImpairmentLabel::Severe).generate();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_noise_scale() {
        let readings = SyntheticTrajectory::new(5, 100, ImpairmentLabel::Sober).generate();
        for channel in Channel::ALL {
            let column: Vec<f64> = readings
                .iter()
                .filter_map(|r| r.channels.get(channel))
                .collect();
            assert!(mean(&column).abs() < 0.1);
            assert!((std_dev(&column) / noise_scale(channel) - 1.0).abs() < 0.1);
        }
    }

    #[test]
    fn test_label_strings() {
        assert_eq!(ImpairmentLabel::Moderate.as_str(), "[0.08-0.15)");
        assert_eq!(
            serde_json::to_string(&ImpairmentLabel::LifeThreatening).unwrap(),
            "\"[0.25+)\""
        );
    }
}
