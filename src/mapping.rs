//! Sensor identifier mapping for OpenSim motion files.
//!
//! Each source sensor identifier (as it appears in the recording's column
//! names) maps to the IMU frame name expected by the OpenSim model. The
//! order of the pairs fixes the column order of the motion file.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};

/// Version tag of [`OPENSIM_IMU_MAPPING`].
pub const OPENSIM_IMU_MAPPING_VERSION: u32 = 1;

/// Recording sensor identifier to OpenSim IMU frame, in motion-file order.
pub const OPENSIM_IMU_MAPPING: [(&str, &str); 12] = [
    ("L_Ankle", "talus_l_imu"),
    ("L_DorsalFoot", "calcn_l_imu"),
    ("L_LatShank", "tibia_l_imu"),
    ("L_MidLatThigh", "femur_l_imu"),
    ("L_Wrist", "radius_l_imu"),
    ("LowerBack", "pelvis_imu"),
    ("R_Ankle", "talus_r_imu"),
    ("R_DorsalFoot", "calcn_r_imu"),
    ("R_LatShank", "tibia_r_imu"),
    ("R_MidLatThigh", "femur_r_imu"),
    ("R_Wrist", "radius_r_imu"),
    ("Xiphoid", "torso_imu"),
];

/// One source to destination identifier pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorPair {
    pub source: String,
    pub destination: String,
}

/// Ordered source to destination sensor mapping.
///
/// Serialized as a JSON array of objects with `source` and `destination`
/// fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorMapping {
    pairs: Vec<SensorPair>,
}

impl Default for SensorMapping {
    fn default() -> Self {
        Self::opensim()
    }
}

impl SensorMapping {
    /// The standard mapping onto the OpenSim full-body IMU model.
    #[must_use]
    pub fn opensim() -> Self {
        Self::from_pairs(OPENSIM_IMU_MAPPING)
    }

    /// Build a mapping from ordered pairs.
    pub fn from_pairs<I, S, D>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, D)>,
        S: Into<String>,
        D: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(s, d)| SensorPair {
                    source: s.into(),
                    destination: d.into(),
                })
                .collect(),
        }
    }

    /// Load and validate a mapping override from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails [`SensorMapping::validate`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let mapping: Self = serde_json::from_reader(BufReader::new(file))?;
        mapping.validate()?;
        Ok(mapping)
    }

    /// Check that the mapping is non-empty and has no repeated identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> Result<()> {
        if self.pairs.is_empty() {
            return Err(ConvertError::invalid_config("sensor mapping is empty"));
        }

        let mut sources = HashSet::new();
        let mut destinations = HashSet::new();
        for pair in &self.pairs {
            if pair.source.is_empty() || pair.destination.is_empty() {
                return Err(ConvertError::invalid_config(
                    "sensor mapping contains an empty identifier",
                ));
            }
            if !sources.insert(pair.source.as_str()) {
                return Err(ConvertError::invalid_config(format!(
                    "duplicate source sensor '{}'",
                    pair.source
                )));
            }
            if !destinations.insert(pair.destination.as_str()) {
                return Err(ConvertError::invalid_config(format!(
                    "duplicate destination sensor '{}'",
                    pair.destination
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SensorPair> {
        self.pairs.iter()
    }

    /// Destination identifiers in mapping order.
    pub fn destinations(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|p| p.destination.as_str())
    }

    /// Destination for a source identifier.
    #[must_use]
    pub fn destination_of(&self, source: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|p| p.source == source)
            .map(|p| p.destination.as_str())
    }
}
