//! Conversion entry points.
//!
//! Two independent pipelines:
//!
//! - **Sensor export**: one Xsens-style text file per sensor with free
//!   acceleration and rotation matrix ([`export_sensor_files`]).
//! - **Motion export**: one OpenSim `.sto` file with the quaternion of every
//!   mapped sensor per frame ([`export_motion_file`]).
//!
//! Both take the loaded table and an explicit [`ConversionConfig`]; the
//! `run_*` variants also locate and load the input table.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::config::ConversionConfig;
use crate::discovery::{find_trial_table, subject_trial_table};
use crate::error::{ConvertError, Result};
use crate::frames::build_motion_frames;
use crate::mapping::{SensorMapping, OPENSIM_IMU_MAPPING_VERSION};
use crate::motion_file::write_motion_file;
use crate::output::ensure_dir;
use crate::records::build_sensor_records;
use crate::table::Table;
use crate::vendor_format::write_sensor_file;

/// Outcome of a sensor export that continues past failing sensors.
#[derive(Debug, Default)]
pub struct SensorExportReport {
    /// Files written, in sensor order.
    pub written: Vec<PathBuf>,
    /// Sensors skipped for missing or ambiguous columns, with the reason.
    pub failed: Vec<(String, ConvertError)>,
}

impl SensorExportReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Build and write the vendor-format file of a single sensor.
///
/// The output directory must already exist.
///
/// # Errors
///
/// Returns column resolution errors for the sensor, or an I/O error.
pub fn convert_sensor(table: &Table, sensor: &str, config: &ConversionConfig) -> Result<PathBuf> {
    let records = build_sensor_records(table, sensor)?;
    write_sensor_file(&config.sensor_file_path(sensor), &records, config.sample_rate)
}

/// Write one vendor-format file per configured sensor, stopping at the first
/// failure.
///
/// # Errors
///
/// Returns the first configuration, column resolution or I/O error.
pub fn export_sensor_files(table: &Table, config: &ConversionConfig) -> Result<Vec<PathBuf>> {
    config.validate()?;
    ensure_dir(&config.output_dir)?;

    config
        .sensors
        .iter()
        .map(|sensor| convert_sensor(table, sensor, config))
        .collect()
}

/// Write one vendor-format file per configured sensor, skipping sensors whose
/// columns cannot be resolved.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or on the first I/O
/// failure; column resolution failures are recorded in the report instead.
pub fn export_sensor_files_lenient(
    table: &Table,
    config: &ConversionConfig,
) -> Result<SensorExportReport> {
    config.validate()?;
    ensure_dir(&config.output_dir)?;

    let mut report = SensorExportReport::default();
    for sensor in &config.sensors {
        match convert_sensor(table, sensor, config) {
            Ok(path) => report.written.push(path),
            Err(e) if e.is_column_resolution() => {
                warn!("Skipping sensor {sensor}: {e}");
                report.failed.push((sensor.clone(), e));
            }
            Err(e) => return Err(e),
        }
    }
    Ok(report)
}

/// Write the trial's motion file.
///
/// All frames are built before anything is written, so a missing column
/// leaves no file behind.
///
/// # Errors
///
/// Returns configuration errors, [`ConvertError::MissingColumns`],
/// [`ConvertError::InvalidCell`], or an I/O error.
pub fn export_motion_file(table: &Table, config: &ConversionConfig) -> Result<PathBuf> {
    config.validate_for_motion()?;
    if config.mapping == SensorMapping::opensim() {
        debug!("Using OpenSim IMU mapping v{OPENSIM_IMU_MAPPING_VERSION}");
    } else {
        info!("Using custom sensor mapping with {} pairs", config.mapping.len());
    }

    let frames = build_motion_frames(table, &config.mapping, config.sample_rate)?;
    ensure_dir(&config.output_dir)?;
    write_motion_file(
        &config.motion_file_path(),
        &frames,
        &config.mapping,
        config.sample_rate,
    )
}

/// Locate the trial table in `input_dir`, then run [`export_sensor_files`].
///
/// # Errors
///
/// Returns [`ConvertError::InputNotFound`] before any processing if no
/// table matches the trial, otherwise as [`export_sensor_files`].
pub fn run_sensor_export(input_dir: &Path, config: &ConversionConfig) -> Result<Vec<PathBuf>> {
    let table = load_trial_table(input_dir, config)?;
    export_sensor_files(&table, config)
}

/// Locate `{subject}/{subject}_{trial}.csv` under `input_dir`, then run
/// [`export_motion_file`].
///
/// # Errors
///
/// Returns [`ConvertError::InputNotFound`] if the table does not exist,
/// otherwise as [`export_motion_file`].
pub fn run_motion_export(input_dir: &Path, config: &ConversionConfig) -> Result<PathBuf> {
    let path = subject_trial_table(input_dir, &config.subject, &config.trial)?;
    info!("Reading {}", path.display());
    let table = Table::from_csv_path(&path)?;
    export_motion_file(&table, config)
}

/// Locate and load the trial table used by the sensor export.
///
/// # Errors
///
/// Returns [`ConvertError::InputNotFound`] or a load error.
pub fn load_trial_table(input_dir: &Path, config: &ConversionConfig) -> Result<Table> {
    let path = find_trial_table(input_dir, &config.trial)?;
    info!("Reading {}", path.display());
    Table::from_csv_path(&path)
}
