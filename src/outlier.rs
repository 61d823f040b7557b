//! Outlier filtering
//!
//! Two passes over the whole stream:
//! 1. z-score normalization of every channel (population statistics)
//! 2. removal of readings with any normalized value outside the channel's
//!    [p1, p99] nearest-rank percentile bounds
//!
//! Bounds come from the full dataset, never per window.

use crate::numeric::{mean, quantile, std_dev};
use crate::types::{Channel, ChannelValues, Reading};
use log::debug;

/// Lower clipping percentile
pub const LOWER_PERCENTILE: f64 = 0.01;

/// Upper clipping percentile
pub const UPPER_PERCENTILE: f64 = 0.99;

/// Inclusive percentile bounds of one normalized channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelBounds {
    pub channel: Channel,
    pub lower: f64,
    pub upper: f64,
}

impl ChannelBounds {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Z-score normalizer and percentile clipper
pub struct OutlierFilter;

impl OutlierFilter {
    /// Normalize and clip a stream. Empty input passes through unchanged.
    pub fn filter(readings: &[Reading]) -> Vec<Reading> {
        if readings.is_empty() {
            return Vec::new();
        }
        let normalized = Self::zscore(readings);
        let bounds = Self::percentile_bounds(&normalized);
        let kept = Self::clip(normalized, &bounds);

        debug!(
            "outlier filter: kept {} of {} readings",
            kept.len(),
            readings.len()
        );
        kept
    }

    /// Replace every value with `(value - mean) / std`, or 0 for a constant
    /// channel. Missing values stay missing and are ignored by the statistics.
    pub fn zscore(readings: &[Reading]) -> Vec<Reading> {
        let stats: Vec<(Channel, f64, f64)> = Channel::ALL
            .iter()
            .map(|channel| {
                let column = present_column(readings, *channel);
                (*channel, mean(&column), std_dev(&column))
            })
            .collect();

        readings
            .iter()
            .map(|reading| {
                let mut channels = ChannelValues::default();
                for (channel, m, s) in &stats {
                    let value = reading.channels.get(*channel).map(|v| {
                        if *s == 0.0 {
                            0.0
                        } else {
                            (v - m) / s
                        }
                    });
                    channels.set(*channel, value);
                }
                Reading::new(reading.timestamp, channels)
            })
            .collect()
    }

    /// Nearest-rank [p1, p99] bounds for every channel
    pub fn percentile_bounds(readings: &[Reading]) -> Vec<ChannelBounds> {
        Channel::ALL
            .iter()
            .map(|channel| {
                let column = present_column(readings, *channel);
                ChannelBounds {
                    channel: *channel,
                    lower: quantile(&column, LOWER_PERCENTILE),
                    upper: quantile(&column, UPPER_PERCENTILE),
                }
            })
            .collect()
    }

    /// Keep readings whose every channel lies inside its bounds, in order.
    ///
    /// A reading that still carries a missing value cannot be placed inside
    /// the bounds and is dropped.
    pub fn clip(readings: Vec<Reading>, bounds: &[ChannelBounds]) -> Vec<Reading> {
        readings
            .into_iter()
            .filter(|reading| {
                bounds.iter().all(|b| {
                    reading
                        .channels
                        .get(b.channel)
                        .map_or(false, |v| b.contains(v))
                })
            })
            .collect()
    }
}

fn present_column(readings: &[Reading], channel: Channel) -> Vec<f64> {
    readings
        .iter()
        .filter_map(|r| r.channels.get(channel))
        .collect()
}
