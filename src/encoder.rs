//! Feature table encoding
//!
//! This module encodes a feature table into the JSON shapes consumed by
//! downstream modeling: a single document with producer metadata, or NDJSON
//! with one flat row per window. Output is deterministic for a given table.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::types::{FeatureName, FeatureTable, FeatureVector};
use crate::{GAITFLUX_VERSION, PRODUCER_NAME};
use serde::Serialize;
use std::collections::BTreeMap;

/// Producer metadata
#[derive(Debug, Clone, Serialize)]
pub struct Producer {
    pub name: String,
    pub version: String,
}

/// One flat output row: `window_id` plus every feature
#[derive(Debug, Clone, Serialize)]
pub struct EncodedWindow<'a> {
    pub window_id: u64,
    #[serde(flatten)]
    pub values: &'a BTreeMap<FeatureName, f64>,
}

impl<'a> From<&'a FeatureVector> for EncodedWindow<'a> {
    fn from(vector: &'a FeatureVector) -> Self {
        Self {
            window_id: vector.window_id,
            values: &vector.values,
        }
    }
}

/// Complete feature document
#[derive(Debug, Clone, Serialize)]
pub struct FeatureDocument<'a> {
    pub producer: Producer,
    pub window_size_seconds: f64,
    pub frequency: f64,
    pub feature_count: usize,
    pub windows: Vec<EncodedWindow<'a>>,
}

/// Encoder for feature tables
pub struct FeatureTableEncoder {
    producer: Producer,
}

impl Default for FeatureTableEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureTableEncoder {
    pub fn new() -> Self {
        Self {
            producer: Producer {
                name: PRODUCER_NAME.to_string(),
                version: GAITFLUX_VERSION.to_string(),
            },
        }
    }

    /// Build the document for a table
    pub fn encode<'a>(
        &self,
        table: &'a FeatureTable,
        config: &PipelineConfig,
    ) -> FeatureDocument<'a> {
        FeatureDocument {
            producer: self.producer.clone(),
            window_size_seconds: config.window_size_seconds,
            frequency: config.frequency,
            feature_count: FeatureName::ALL.len(),
            windows: table.rows.iter().map(EncodedWindow::from).collect(),
        }
    }

    /// Encode to a pretty JSON document
    pub fn encode_to_json(
        &self,
        table: &FeatureTable,
        config: &PipelineConfig,
    ) -> Result<String, PipelineError> {
        let document = self.encode(table, config);
        serde_json::to_string_pretty(&document).map_err(PipelineError::JsonError)
    }

    /// Encode to NDJSON, one window per line
    pub fn encode_to_ndjson(&self, table: &FeatureTable) -> Result<String, PipelineError> {
        let mut out = String::new();
        for row in &table.rows {
            let line = serde_json::to_string(&EncodedWindow::from(row))
                .map_err(|e| PipelineError::EncodingError(e.to_string()))?;
            out.push_str(&line);
            out.push('\n');
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_table() -> FeatureTable {
        let mut first = FeatureVector::zeroed(0);
        first.set(FeatureName::CadenceSmartphone, 96.0);
        let mut second = FeatureVector::zeroed(1);
        second.set(FeatureName::XySwayAreaSmartwatch, 0.25);
        FeatureTable {
            rows: vec![first, second],
        }
    }

    #[test]
    fn test_encode_document() {
        let encoder = FeatureTableEncoder::new();
        let json = encoder
            .encode_to_json(&sample_table(), &PipelineConfig::default())
            .unwrap();
        let payload: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(payload["producer"]["name"], "gaitflux");
        assert_eq!(payload["window_size_seconds"], 5.0);
        assert_eq!(payload["feature_count"], 38);
        assert_eq!(payload["windows"][0]["window_id"], 0);
        assert_eq!(payload["windows"][0]["cadence_smartphone"], 96.0);
        assert_eq!(payload["windows"][1]["XY_sway_area_smartwatch"], 0.25);
    }

    #[test]
    fn test_every_feature_key_is_written() {
        let json = FeatureTableEncoder::new()
            .encode_to_ndjson(&sample_table())
            .unwrap();
        let lines: Vec<&str> = json.lines().collect();
        assert_eq!(lines.len(), 2);

        let row: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        let object = row.as_object().unwrap();
        assert_eq!(object.len(), FeatureName::ALL.len() + 1);
        for name in FeatureName::ALL {
            assert!(object.contains_key(name.as_str()), "missing {name}");
        }
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let encoder = FeatureTableEncoder::new();
        let config = PipelineConfig::default();
        let table = sample_table();
        assert_eq!(
            encoder.encode_to_json(&table, &config).unwrap(),
            encoder.encode_to_json(&table, &config).unwrap()
        );
    }
}
