//! Per-window feature computation
//!
//! The engine turns the readings of one window into a complete
//! [`FeatureVector`]. Each window is computed from its own samples only.
//!
//! - Gait (smartphone acceleration magnitude): steps, cadence
//! - Step kinematics (smartphone z acceleration): velocity, step length and
//!   step time residuals
//! - Sway (gyroscope, both devices): XY/YZ/XZ ellipse areas, sphere volume
//! - Integrated velocity (acceleration, both devices) and angular velocity
//!   (smartwatch gyroscope): per-axis mean and variance
//! - Statistics (smartphone z acceleration): skewness, kurtosis, SNR, and the
//!   spectral placeholders

pub mod gait;
pub mod kinematics;
pub mod statistics;
pub mod sway;
pub mod velocity;

use crate::config::require_positive;
use crate::error::PipelineError;
use crate::types::{Axis, Channel, Device, FeatureName, FeatureVector, Reading, Sensor};
use velocity::IntegratedAxis;

/// Channel columns of one window, indexed like [`Channel::ALL`]
struct WindowColumns {
    columns: Vec<Vec<f64>>,
}

impl WindowColumns {
    fn collect<'a, I>(readings: I, window_id: u64) -> Result<Self, PipelineError>
    where
        I: IntoIterator<Item = &'a Reading>,
    {
        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); Channel::ALL.len()];
        for reading in readings {
            for (column, channel) in columns.iter_mut().zip(Channel::ALL) {
                let value = reading.channels.get(channel).ok_or_else(|| {
                    PipelineError::MissingChannel {
                        channel: channel.name().to_string(),
                        window_id: Some(window_id),
                    }
                })?;
                column.push(value);
            }
        }
        Ok(Self { columns })
    }

    fn get(&self, sensor: Sensor, axis: Axis, device: Device) -> &[f64] {
        &self.columns[Channel::new(sensor, axis, device).index()]
    }

    fn xyz(&self, sensor: Sensor, device: Device) -> (&[f64], &[f64], &[f64]) {
        (
            self.get(sensor, Axis::X, device),
            self.get(sensor, Axis::Y, device),
            self.get(sensor, Axis::Z, device),
        )
    }
}

/// Feature engine for a fixed sampling frequency
#[derive(Debug, Clone, Copy)]
pub struct FeatureEngine {
    frequency: f64,
    /// Sample spacing (s)
    dt: f64,
}

impl FeatureEngine {
    /// Fails with `InvalidConfig` unless the frequency is finite and positive
    pub fn new(frequency: f64) -> Result<Self, PipelineError> {
        let frequency = require_positive("frequency", frequency)?;
        Ok(Self {
            frequency,
            dt: 1.0 / frequency,
        })
    }

    /// Compute every feature for one window.
    ///
    /// Fails with `MissingChannel` if any reading lacks a channel value.
    pub fn compute<'a, I>(
        &self,
        window_id: u64,
        readings: I,
    ) -> Result<FeatureVector, PipelineError>
    where
        I: IntoIterator<Item = &'a Reading>,
    {
        let columns = WindowColumns::collect(readings, window_id)?;
        let dt = self.dt;
        let mut vector = FeatureVector::zeroed(window_id);

        // Smartphone gait and step kinematics
        let (ax, ay, az) = columns.xyz(Sensor::Acc, Device::Smartphone);
        let gait = gait::gait_features(ax, ay, az, self.frequency);
        vector.set(FeatureName::StepsSmartphone, gait.steps as f64);
        vector.set(FeatureName::CadenceSmartphone, gait.cadence);

        let steps = kinematics::step_kinematics(az, dt);
        vector.set(FeatureName::AvgVelocitySmartphone, steps.avg_velocity);
        vector.set(
            FeatureName::ResidualStepLengthSmartphone,
            steps.residual_step_length,
        );
        vector.set(FeatureName::AvgStepTimeSmartphone, steps.avg_step_time);
        vector.set(
            FeatureName::ResidualStepTimeSmartphone,
            steps.residual_step_time,
        );

        // Smartphone z statistics
        vector.set(
            FeatureName::FrequencyRatioSmartphone,
            statistics::frequency_ratio(az),
        );
        vector.set(FeatureName::BandPowerSmartphone, statistics::band_power(az));
        vector.set(
            FeatureName::SignalNoiseRatioSmartphone,
            statistics::signal_noise_ratio(az),
        );
        vector.set(FeatureName::SkewnessSmartphone, statistics::skewness(az));
        vector.set(FeatureName::KurtosisSmartphone, statistics::kurtosis(az));
        vector.set(
            FeatureName::TotalHarmonicDistortionSmartphone,
            statistics::total_harmonic_distortion(az),
        );

        // Sway, both devices
        for (device, names) in [
            (
                Device::Smartphone,
                [
                    FeatureName::XySwayAreaSmartphone,
                    FeatureName::YzSwayAreaSmartphone,
                    FeatureName::XzSwayAreaSmartphone,
                    FeatureName::SwayVolumeSmartphone,
                ],
            ),
            (
                Device::Smartwatch,
                [
                    FeatureName::XySwayAreaSmartwatch,
                    FeatureName::YzSwayAreaSmartwatch,
                    FeatureName::XzSwayAreaSmartwatch,
                    FeatureName::SwayVolumeSmartwatch,
                ],
            ),
        ] {
            let (gx, gy, gz) = columns.xyz(Sensor::Gyro, device);
            vector.set(names[0], sway::ellipse_area(gx, gy));
            vector.set(names[1], sway::ellipse_area(gy, gz));
            vector.set(names[2], sway::ellipse_area(gx, gz));
            vector.set(names[3], sway::sway_volume(gx, gy, gz));
        }

        // Integrated velocity, both devices
        set_axes(
            &mut vector,
            velocity::integrated_axes(ax, ay, az, dt),
            [
                (
                    FeatureName::VelocityMeanXSmartphone,
                    FeatureName::VelocityVarianceXSmartphone,
                ),
                (
                    FeatureName::VelocityMeanYSmartphone,
                    FeatureName::VelocityVarianceYSmartphone,
                ),
                (
                    FeatureName::VelocityMeanZSmartphone,
                    FeatureName::VelocityVarianceZSmartphone,
                ),
            ],
        );

        let (wx, wy, wz) = columns.xyz(Sensor::Acc, Device::Smartwatch);
        set_axes(
            &mut vector,
            velocity::integrated_axes(wx, wy, wz, dt),
            [
                (
                    FeatureName::VelocityMeanXSmartwatch,
                    FeatureName::VelocityVarianceXSmartwatch,
                ),
                (
                    FeatureName::VelocityMeanYSmartwatch,
                    FeatureName::VelocityVarianceYSmartwatch,
                ),
                (
                    FeatureName::VelocityMeanZSmartwatch,
                    FeatureName::VelocityVarianceZSmartwatch,
                ),
            ],
        );

        // Angular velocity, smartwatch
        let (rx, ry, rz) = columns.xyz(Sensor::Gyro, Device::Smartwatch);
        set_axes(
            &mut vector,
            velocity::integrated_axes(rx, ry, rz, dt),
            [
                (
                    FeatureName::AngularVelocityMeanXSmartwatch,
                    FeatureName::AngularVelocityVarianceXSmartwatch,
                ),
                (
                    FeatureName::AngularVelocityMeanYSmartwatch,
                    FeatureName::AngularVelocityVarianceYSmartwatch,
                ),
                (
                    FeatureName::AngularVelocityMeanZSmartwatch,
                    FeatureName::AngularVelocityVarianceZSmartwatch,
                ),
            ],
        );

        Ok(vector)
    }
}

fn set_axes(
    vector: &mut FeatureVector,
    axes: [IntegratedAxis; 3],
    names: [(FeatureName, FeatureName); 3],
) {
    for (axis, (mean_name, variance_name)) in axes.iter().zip(names) {
        vector.set(mean_name, axis.mean);
        vector.set(variance_name, axis.variance);
    }
}
