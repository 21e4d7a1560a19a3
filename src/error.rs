//! Error types for IMU conversion operations.
//!
//! Every failure is reported at the point of detection; nothing is retried
//! and no partial output file is left behind.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for conversion operations.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// No free-acceleration or quaternion column mentions the sensor.
    #[error("No data for Free Acceleration or Orientation were found for the {sensor} sensor")]
    MissingSensorData { sensor: String },

    /// Required columns are absent from the table.
    #[error("Missing required columns: {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    /// No input table matches the discovery criteria.
    #[error("No input table matching '{pattern}' was found in '{}'", .dir.display())]
    InputNotFound { dir: PathBuf, pattern: String },

    /// More than one column qualifies for a single slot.
    #[error("Ambiguous column for sensor {sensor} (suffix '{suffix}'): {}", .candidates.join(", "))]
    AmbiguousColumn {
        sensor: String,
        suffix: String,
        candidates: Vec<String>,
    },

    /// A cell that must be numeric is not.
    #[error("Non-numeric value '{value}' in column '{column}' at row {row}")]
    InvalidCell {
        column: String,
        row: usize,
        value: String,
    },

    /// Columns of a table have different lengths.
    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    RaggedTable {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited-text parsing failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Mapping file parsing failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;

impl ConvertError {
    /// Create a missing sensor data error.
    #[must_use]
    pub fn missing_sensor_data(sensor: impl Into<String>) -> Self {
        Self::MissingSensorData {
            sensor: sensor.into(),
        }
    }

    /// Create a missing columns error.
    #[must_use]
    pub const fn missing_columns(columns: Vec<String>) -> Self {
        Self::MissingColumns { columns }
    }

    /// Create an input not found error.
    #[must_use]
    pub fn input_not_found(dir: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        Self::InputNotFound {
            dir: dir.into(),
            pattern: pattern.into(),
        }
    }

    /// Create an invalid cell error.
    #[must_use]
    pub fn invalid_cell(column: impl Into<String>, row: usize, value: impl Into<String>) -> Self {
        Self::InvalidCell {
            column: column.into(),
            row,
            value: value.into(),
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Whether the error comes from resolving one sensor's columns, as
    /// opposed to configuration or filesystem failures.
    #[must_use]
    pub const fn is_column_resolution(&self) -> bool {
        matches!(
            self,
            Self::MissingSensorData { .. }
                | Self::MissingColumns { .. }
                | Self::AmbiguousColumn { .. }
        )
    }
}
