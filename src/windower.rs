//! Fixed-width temporal windowing
//!
//! The first reading defines the origin; each reading is tagged with its
//! elapsed seconds and `window_id = floor(elapsed / window_size)`.

use crate::config::require_positive;
use crate::error::PipelineError;
use crate::types::{Reading, WindowedReading};
use log::debug;

/// Tags readings with their window
pub struct Windower {
    window_size_seconds: f64,
}

impl Windower {
    /// Fails with `InvalidConfig` unless the window size is finite and positive
    pub fn new(window_size_seconds: f64) -> Result<Self, PipelineError> {
        Ok(Self {
            window_size_seconds: require_positive("window_size_seconds", window_size_seconds)?,
        })
    }

    /// Annotate a time-ordered stream.
    ///
    /// Fails with `UnorderedStream` if a reading is earlier than its
    /// predecessor.
    pub fn segment(&self, readings: Vec<Reading>) -> Result<Vec<WindowedReading>, PipelineError> {
        let Some(origin) = readings.first().map(|r| r.timestamp) else {
            return Ok(Vec::new());
        };

        let mut windowed = Vec::with_capacity(readings.len());
        let mut previous = origin;
        for (index, reading) in readings.into_iter().enumerate() {
            if reading.timestamp < previous {
                return Err(PipelineError::UnorderedStream { index });
            }
            previous = reading.timestamp;

            let elapsed = reading.timestamp - origin;
            let seconds_since_start = elapsed
                .num_microseconds()
                .map(|us| us as f64 / 1e6)
                .unwrap_or_else(|| elapsed.num_milliseconds() as f64 / 1e3);
            let window_id = (seconds_since_start / self.window_size_seconds).floor() as u64;

            windowed.push(WindowedReading {
                reading,
                seconds_since_start,
                window_id,
            });
        }

        debug!(
            "windower: {} readings over {} windows of {}s",
            windowed.len(),
            windowed.last().map_or(0, |w| w.window_id + 1),
            self.window_size_seconds
        );
        Ok(windowed)
    }
}
