//! Pipeline orchestration
//!
//! This module provides the public API for Gaitflux. It runs a batch of
//! readings through every stage and aggregates per-window features.

use crate::config::PipelineConfig;
use crate::encoder::FeatureTableEncoder;
use crate::error::PipelineError;
use crate::features::FeatureEngine;
use crate::normalizer::Normalizer;
use crate::outlier::OutlierFilter;
use crate::types::{FeatureTable, FeatureVector, RawReading, Reading, WindowedReading};
use crate::windower::Windower;
use log::debug;
use std::collections::BTreeMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Groups windowed readings and runs the feature engine once per window
pub struct Aggregator;

impl Aggregator {
    /// One feature vector per observed `window_id`, ascending
    pub fn aggregate(
        engine: &FeatureEngine,
        windowed: &[WindowedReading],
    ) -> Result<FeatureTable, PipelineError> {
        let mut groups: BTreeMap<u64, Vec<&Reading>> = BTreeMap::new();
        for w in windowed {
            groups.entry(w.window_id).or_default().push(&w.reading);
        }
        let groups: Vec<(u64, Vec<&Reading>)> = groups.into_iter().collect();

        let rows = compute_groups(engine, &groups)?;
        debug!("aggregator: {} windows", rows.len());
        Ok(FeatureTable { rows })
    }
}

#[cfg(not(feature = "parallel"))]
fn compute_groups(
    engine: &FeatureEngine,
    groups: &[(u64, Vec<&Reading>)],
) -> Result<Vec<FeatureVector>, PipelineError> {
    groups
        .iter()
        .map(|(window_id, readings)| engine.compute(*window_id, readings.iter().copied()))
        .collect()
}

#[cfg(feature = "parallel")]
fn compute_groups(
    engine: &FeatureEngine,
    groups: &[(u64, Vec<&Reading>)],
) -> Result<Vec<FeatureVector>, PipelineError> {
    groups
        .par_iter()
        .map(|(window_id, readings)| engine.compute(*window_id, readings.iter().copied()))
        .collect()
}

/// Run the full pipeline on a complete batch of readings (stateless, one-shot).
///
/// Pipeline stages:
/// 1. Normalizer - fill missing values
/// 2. OutlierFilter - z-score and percentile clipping
/// 3. Windower - tag readings with window ids
/// 4. Aggregator - compute one feature vector per window
///
/// # Example
/// ```ignore
/// let table = sensor_data_pipeline(&readings, &PipelineConfig::default())?;
/// ```
pub fn sensor_data_pipeline(
    readings: &[Reading],
    config: &PipelineConfig,
) -> Result<FeatureTable, PipelineError> {
    config.validate()?;

    // Stage 1: Fill gaps
    let filled = Normalizer::normalize(readings, config.fill_method);

    // Stage 2: Normalize and drop outliers
    let cleaned = OutlierFilter::filter(&filled);

    // Stage 3: Segment into windows
    let windowed = Windower::new(config.window_size_seconds)?.segment(cleaned)?;

    // Stage 4: Per-window features
    let engine = FeatureEngine::new(config.frequency)?;
    Aggregator::aggregate(&engine, &windowed)
}

/// Reusable processor bound to one validated configuration.
///
/// Holds no state between calls; the same input always gives the same table.
pub struct FeatureProcessor {
    config: PipelineConfig,
    encoder: FeatureTableEncoder,
}

impl Default for FeatureProcessor {
    fn default() -> Self {
        Self {
            config: PipelineConfig::default(),
            encoder: FeatureTableEncoder::new(),
        }
    }
}

impl FeatureProcessor {
    /// Create a processor with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a processor with a specific configuration
    pub fn with_config(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            config,
            encoder: FeatureTableEncoder::new(),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Extract features from readings
    pub fn process(&self, readings: &[Reading]) -> Result<FeatureTable, PipelineError> {
        sensor_data_pipeline(readings, &self.config)
    }

    /// Extract features from a JSON array of readings.
    ///
    /// One malformed element fails the whole batch.
    pub fn process_json(&self, readings_json: &str) -> Result<FeatureTable, PipelineError> {
        let raw: Vec<RawReading> = serde_json::from_str(readings_json)?;
        let readings = raw
            .into_iter()
            .map(Reading::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        self.process(&readings)
    }

    /// Extract features and encode the table as a JSON document
    pub fn process_to_json(&self, readings: &[Reading]) -> Result<String, PipelineError> {
        let table = self.process(readings)?;
        self.encoder.encode_to_json(&table, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::{ImpairmentLabel, SyntheticTrajectory};
    use crate::types::{Axis, Channel, ChannelValues, Device, FeatureName, Sensor};
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    /// 20 readings, 0.5 s apart, spanning 10 s
    fn twenty_sample_stream() -> Vec<Reading> {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        (0..20)
            .map(|i| {
                let t = i as f64;
                let mut values = [0.0; 12];
                for (k, v) in values.iter_mut().enumerate() {
                    *v = (t * 0.9 + k as f64).sin() * (1.0 + k as f64 * 0.1);
                }
                Reading::new(
                    start + Duration::milliseconds(500 * i as i64),
                    ChannelValues::from_array(values),
                )
            })
            .collect()
    }

    #[test]
    fn test_two_windows_end_to_end() {
        let table =
            sensor_data_pipeline(&twenty_sample_stream(), &PipelineConfig::default()).unwrap();

        assert_eq!(table.window_ids(), vec![0, 1]);
        for row in &table.rows {
            assert_eq!(row.values.len(), FeatureName::ALL.len());
            assert!(row.is_complete());
            assert!(row.values.values().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_idempotent() {
        let readings = twenty_sample_stream();
        let snapshot = readings.clone();
        let processor = FeatureProcessor::new();

        let first = processor.process(&readings).unwrap();
        let second = processor.process(&readings).unwrap();
        assert_eq!(first, second);
        assert_eq!(readings, snapshot);
    }

    #[test]
    fn test_empty_input() {
        let table = sensor_data_pipeline(&[], &PipelineConfig::default()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_gaps_are_filled_before_filtering() {
        let mut readings = twenty_sample_stream();
        let acc_y = Channel::new(Sensor::Acc, Axis::Y, Device::Smartwatch);
        readings[7].channels.set(acc_y, None);
        readings[12].channels.set(acc_y, None);

        let table = sensor_data_pipeline(&readings, &PipelineConfig::default()).unwrap();
        assert_eq!(table.window_ids(), vec![0, 1]);
    }

    #[test]
    fn test_leading_gap_row_is_dropped() {
        let mut readings = twenty_sample_stream();
        let gyro_x = Channel::new(Sensor::Gyro, Axis::X, Device::Smartphone);
        readings[0].channels.set(gyro_x, None);

        // The unfillable first row is removed, so the origin moves to 0.5 s
        let table = sensor_data_pipeline(&readings, &PipelineConfig::default()).unwrap();
        assert_eq!(table.window_ids(), vec![0, 1]);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = PipelineConfig::default().with_window_size(-1.0);
        assert!(matches!(
            sensor_data_pipeline(&twenty_sample_stream(), &config),
            Err(PipelineError::InvalidConfig(_))
        ));
        assert!(FeatureProcessor::with_config(config).is_err());
    }

    #[test]
    fn test_synthetic_minute() {
        let readings = SyntheticTrajectory::new(7, 60, ImpairmentLabel::Sober).generate();
        let table = FeatureProcessor::new().process(&readings).unwrap();

        assert_eq!(table.window_ids(), (0..12).collect::<Vec<u64>>());
        for row in &table.rows {
            assert!(row.values.values().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_window_size_changes_row_count() {
        let readings = SyntheticTrajectory::new(3, 20, ImpairmentLabel::Mild).generate();
        let config = PipelineConfig::default().with_window_size(2.0);
        let table = FeatureProcessor::with_config(config)
            .unwrap()
            .process(&readings)
            .unwrap();
        assert_eq!(table.len(), 10);
    }

    #[test]
    fn test_process_json() {
        let readings = twenty_sample_stream();
        let json = serde_json::to_string(&readings).unwrap();
        let processor = FeatureProcessor::new();

        let from_json = processor.process_json(&json).unwrap();
        let direct = processor.process(&readings).unwrap();
        assert_eq!(from_json.window_ids(), direct.window_ids());

        assert!(processor.process_json("not json").is_err());
    }

    #[test]
    fn test_absent_channel_key_aborts_batch() {
        let mut rows: Vec<serde_json::Value> =
            serde_json::from_str(&serde_json::to_string(&twenty_sample_stream()).unwrap())
                .unwrap();
        rows[13]
            .as_object_mut()
            .unwrap()
            .remove("acc_y_smartwatch");
        let json = serde_json::to_string(&rows).unwrap();

        match FeatureProcessor::new().process_json(&json) {
            Err(PipelineError::MissingChannel { channel, window_id }) => {
                assert_eq!(channel, "acc_y_smartwatch");
                assert_eq!(window_id, None);
            }
            other => panic!("expected missing channel, got {other:?}"),
        }
    }

    #[test]
    fn test_aggregator_groups_by_key() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let reading = |ms: i64| {
            Reading::new(
                start + Duration::milliseconds(ms),
                ChannelValues::from_array([1.0; 12]),
            )
        };
        let windowed: Vec<WindowedReading> = [(0, 0), (100, 3), (200, 0)]
            .into_iter()
            .map(|(ms, window_id)| WindowedReading {
                reading: reading(ms),
                seconds_since_start: ms as f64 / 1000.0,
                window_id,
            })
            .collect();
        let engine = FeatureEngine::new(50.0).unwrap();
        let table = Aggregator::aggregate(&engine, &windowed).unwrap();
        assert_eq!(table.window_ids(), vec![0, 3]);
        assert_eq!(
            table.get(0).unwrap().get(FeatureName::BandPowerSmartphone),
            2.0
        );
    }
}
