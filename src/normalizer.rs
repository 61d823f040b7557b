//! Reading normalization
//!
//! Fills missing channel values by carrying the last observed value forward,
//! per channel and independently. Leading gaps (no earlier observation) stay
//! missing; later stages decide what to do with them.

use crate::config::FillMethod;
use crate::types::{Channel, ChannelValues, Reading};
use log::{debug, warn};

/// Normalizer for filling gaps in a reading stream
pub struct Normalizer;

impl Normalizer {
    /// Fill missing values using the configured method
    pub fn normalize(readings: &[Reading], method: FillMethod) -> Vec<Reading> {
        match method {
            FillMethod::ForwardFill => Self::forward_fill(readings),
        }
    }

    /// Replace each missing value with the most recent observed value of the
    /// same channel at or before it
    pub fn forward_fill(readings: &[Reading]) -> Vec<Reading> {
        let mut last_seen = ChannelValues::default();
        let mut filled_count = 0usize;
        let mut unfillable_count = 0usize;

        let filled: Vec<Reading> = readings
            .iter()
            .map(|reading| {
                let mut channels = reading.channels;
                for channel in Channel::ALL {
                    match channels.get(channel) {
                        Some(value) => last_seen.set(channel, Some(value)),
                        None => match last_seen.get(channel) {
                            Some(previous) => {
                                channels.set(channel, Some(previous));
                                filled_count += 1;
                            }
                            None => unfillable_count += 1,
                        },
                    }
                }
                Reading::new(reading.timestamp, channels)
            })
            .collect();

        debug!(
            "forward fill: {} readings, {} values filled",
            filled.len(),
            filled_count
        );
        if unfillable_count > 0 {
            warn!(
                "forward fill: {} leading values have no earlier observation",
                unfillable_count
            );
        }

        filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Axis, Device, Sensor};
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn acc_x() -> Channel {
        Channel::new(Sensor::Acc, Axis::X, Device::Smartphone)
    }

    fn gyro_z() -> Channel {
        Channel::new(Sensor::Gyro, Axis::Z, Device::Smartwatch)
    }

    fn stream(acc: &[Option<f64>], gyro: &[Option<f64>]) -> Vec<Reading> {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        acc.iter()
            .zip(gyro)
            .enumerate()
            .map(|(i, (a, g))| {
                let channels = ChannelValues::from_array([1.0; 12])
                    .with(acc_x(), *a)
                    .with(gyro_z(), *g);
                Reading::new(start + Duration::milliseconds(20 * i as i64), channels)
            })
            .collect()
    }

    #[test]
    fn test_forward_fill_carries_last_value() {
        let readings = stream(
            &[Some(1.0), None, None, Some(4.0), None],
            &[Some(9.0), Some(8.0), None, None, Some(5.0)],
        );
        let filled = Normalizer::forward_fill(&readings);

        let acc: Vec<Option<f64>> = filled.iter().map(|r| r.channels.get(acc_x())).collect();
        let gyro: Vec<Option<f64>> = filled.iter().map(|r| r.channels.get(gyro_z())).collect();
        assert_eq!(acc, vec![Some(1.0), Some(1.0), Some(1.0), Some(4.0), Some(4.0)]);
        assert_eq!(gyro, vec![Some(9.0), Some(8.0), Some(8.0), Some(8.0), Some(5.0)]);
    }

    #[test]
    fn test_leading_gap_is_preserved() {
        let readings = stream(&[None, None, Some(2.0)], &[Some(1.0), None, None]);
        let filled = Normalizer::forward_fill(&readings);

        assert_eq!(filled[0].channels.get(acc_x()), None);
        assert_eq!(filled[1].channels.get(acc_x()), None);
        assert_eq!(filled[2].channels.get(acc_x()), Some(2.0));
        assert_eq!(filled[2].channels.get(gyro_z()), Some(1.0));
    }

    #[test]
    fn test_length_order_and_input_untouched() {
        let readings = stream(&[Some(1.0), None], &[None, Some(2.0)]);
        let snapshot = readings.clone();
        let filled = Normalizer::normalize(&readings, FillMethod::ForwardFill);

        assert_eq!(readings, snapshot);
        assert_eq!(filled.len(), readings.len());
        for (a, b) in filled.iter().zip(&readings) {
            assert_eq!(a.timestamp, b.timestamp);
        }
    }

    #[test]
    fn test_empty_stream() {
        assert!(Normalizer::forward_fill(&[]).is_empty());
    }
}
