//! Configuration for a conversion run.
//!
//! This module provides the [`ConversionConfig`] struct which carries every
//! parameter of a run explicitly: subject and trial labels, output directory,
//! sensor list, nominal sample rate and sensor mapping.
//!
//! # Example
//!
//! ```
//! use imu_opensense::ConversionConfig;
//!
//! let config = ConversionConfig::new("NLS002", "SelfPace", "out")
//!     .with_sensors(["L_Ankle", "R_Ankle"])
//!     .with_sample_rate(100.0);
//! assert!(config.validate().is_ok());
//! ```

use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};
use crate::mapping::SensorMapping;

/// Nominal sample rate of the recordings (Hz).
pub const DEFAULT_SAMPLE_RATE: f64 = 100.0;

/// Sensors of the FDA Parkinson's disease IMU dataset.
pub const DEFAULT_SENSORS: [&str; 13] = [
    "LowerBack",
    "R_DorsalFoot",
    "R_Wrist",
    "L_DorsalFoot",
    "L_Wrist",
    "R_Ankle",
    "R_MidLatThigh",
    "L_Ankle",
    "L_MidLatThigh",
    "Xiphoid",
    "R_LatShank",
    "Forehead",
    "L_LatShank",
];

/// Parameters of one conversion run.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionConfig {
    /// Subject label, first component of every output file name.
    pub subject: String,

    /// Trial label, second component of every output file name.
    pub trial: String,

    /// Directory receiving the output files. Created if missing.
    pub output_dir: PathBuf,

    /// Sensors exported as individual vendor-format files.
    pub sensors: Vec<String>,

    /// Nominal sample rate (Hz) used to synthesize motion-file timestamps.
    pub sample_rate: f64,

    /// Source to OpenSim sensor mapping for the motion file.
    pub mapping: SensorMapping,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            subject: String::new(),
            trial: String::new(),
            output_dir: PathBuf::from("."),
            sensors: DEFAULT_SENSORS.iter().map(|s| (*s).to_string()).collect(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            mapping: SensorMapping::opensim(),
        }
    }
}

impl ConversionConfig {
    /// Create a configuration with the default sensors, rate and mapping.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        trial: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            subject: subject.into(),
            trial: trial.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a label is empty, the sensor list is empty, the
    /// sample rate is not a positive finite number, or the mapping is invalid.
    pub fn validate(&self) -> Result<()> {
        self.validate_labels()?;
        if self.sensors.is_empty() {
            return Err(ConvertError::invalid_config(
                "at least one sensor is required",
            ));
        }
        if self.sensors.iter().any(String::is_empty) {
            return Err(ConvertError::invalid_config(
                "sensor identifiers must not be empty",
            ));
        }
        self.validate_sample_rate()?;
        self.mapping.validate()
    }

    /// Validate the parts used by the motion export; the sensor list is
    /// not consulted there.
    ///
    /// # Errors
    ///
    /// Returns an error if a label is empty, the sample rate is not a
    /// positive finite number, or the mapping is invalid.
    pub fn validate_for_motion(&self) -> Result<()> {
        self.validate_labels()?;
        self.validate_sample_rate()?;
        self.mapping.validate()
    }

    fn validate_labels(&self) -> Result<()> {
        if self.subject.is_empty() {
            return Err(ConvertError::invalid_config("subject must not be empty"));
        }
        if self.trial.is_empty() {
            return Err(ConvertError::invalid_config("trial must not be empty"));
        }
        Ok(())
    }

    fn validate_sample_rate(&self) -> Result<()> {
        if self.sample_rate.is_finite() && self.sample_rate > 0.0 {
            Ok(())
        } else {
            Err(ConvertError::invalid_config("sample_rate must be positive"))
        }
    }

    /// Set the sensor list.
    #[must_use]
    pub fn with_sensors<I, S>(mut self, sensors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sensors = sensors.into_iter().map(Into::into).collect();
        self
    }

    /// Set the nominal sample rate.
    #[must_use]
    pub fn with_sample_rate(mut self, rate: f64) -> Self {
        self.sample_rate = rate;
        self
    }

    /// Set the sensor mapping.
    #[must_use]
    pub fn with_mapping(mut self, mapping: SensorMapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// Path of the vendor-format file for `sensor`.
    #[must_use]
    pub fn sensor_file_path(&self, sensor: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}_{}.txt", self.subject, self.trial, sensor))
    }

    /// Path of the motion file for the trial.
    #[must_use]
    pub fn motion_file_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}.sto", self.subject, self.trial))
    }

    /// Default output directory for a subject: `{input_dir}/OpenSense/{subject}`.
    #[must_use]
    pub fn default_output_dir(input_dir: &Path, subject: &str) -> PathBuf {
        input_dir.join("OpenSense").join(subject)
    }
}
