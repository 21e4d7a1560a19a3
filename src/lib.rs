//! IMU to OpenSense conversion library.
//!
//! Converts wide multi-sensor IMU recordings (one row per sample, one column
//! group per body-worn sensor) into the text formats read by OpenSim's
//! OpenSense workflow.
//!
//! # Features
//!
//! - **Sensor export**: one Xsens-style file per sensor with free
//!   acceleration and a column-major rotation matrix per sample
//! - **Motion export**: one `.sto` file with every mapped sensor's
//!   quaternion per frame
//! - **Column resolution**: sensor columns are resolved once and every
//!   missing column is reported in a single error
//! - **Atomic output**: files are written to a temporary path and renamed
//!
//! # Quick Start
//!
//! ```
//! use imu_opensense::{build_sensor_records, Cell, Table};
//!
//! let table = Table::from_columns(vec![
//!     ("L_Ankle_FreeAcc_X", vec![Cell::from(0.1)]),
//!     ("L_Ankle_FreeAcc_Y", vec![Cell::from(0.2)]),
//!     ("L_Ankle_FreeAcc_Z", vec![Cell::from(9.7)]),
//!     ("L_Ankle_OriInc_q0", vec![Cell::from(1.0)]),
//!     ("L_Ankle_OriInc_q1", vec![Cell::from(0.0)]),
//!     ("L_Ankle_OriInc_q2", vec![Cell::from(0.0)]),
//!     ("L_Ankle_OriInc_q3", vec![Cell::from(0.0)]),
//! ])?;
//!
//! let records = build_sensor_records(&table, "L_Ankle")?;
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].fields().len(), 26);
//! # Ok::<(), imu_opensense::ConvertError>(())
//! ```
//!
//! # Output Files
//!
//! | Pipeline | File name | Content |
//! |----------|-----------|---------|
//! | Sensor export | `{subject}_{trial}_{sensor}.txt` | Acc + rotation matrix |
//! | Motion export | `{subject}_{trial}.sto` | Quaternion per mapped sensor |

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]

pub mod config;
pub mod discovery;
pub mod error;
pub mod frames;
pub mod layout;
pub mod mapping;
pub mod math;
pub mod motion_file;
pub mod output;
pub mod pipeline;
pub mod records;
pub mod table;
pub mod vendor_format;

// Re-exports for convenient access
pub use config::{ConversionConfig, DEFAULT_SAMPLE_RATE, DEFAULT_SENSORS};
pub use error::{ConvertError, Result};
pub use frames::{build_motion_frames, MotionFrame};
pub use layout::{MappedQuaternionColumns, SensorColumns};
pub use mapping::{SensorMapping, SensorPair, OPENSIM_IMU_MAPPING, OPENSIM_IMU_MAPPING_VERSION};
pub use math::{quaternion_to_rotation_matrix, QuaternionComponents};
pub use pipeline::{
    convert_sensor, export_motion_file, export_sensor_files, export_sensor_files_lenient,
    run_motion_export, run_sensor_export, SensorExportReport,
};
pub use records::{build_sensor_records, SensorRecord};
pub use table::{Cell, Table};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    fn trial_table(n_rows: usize) -> Table {
        let mut cols = Vec::new();
        for pair in SensorMapping::opensim().iter() {
            for axis in ["X", "Y", "Z"] {
                cols.push((
                    format!("{}_FreeAcc_{axis}", pair.source),
                    vec![Cell::from(0.0); n_rows],
                ));
            }
            for c in 0..4 {
                let v = if c == 0 { 1.0 } else { 0.0 };
                cols.push((
                    format!("{}_OriInc_q{c}", pair.source),
                    vec![Cell::from(v); n_rows],
                ));
            }
        }
        Table::from_columns(cols).unwrap()
    }

    #[test]
    fn test_full_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let table = trial_table(5);
        let sensors: Vec<String> = SensorMapping::opensim()
            .iter()
            .map(|p| p.source.clone())
            .collect();
        let config = ConversionConfig::new("HC100", "SelfPace", dir.path()).with_sensors(sensors);

        let written = export_sensor_files(&table, &config).unwrap();
        assert_eq!(written.len(), 12);

        let sto = export_motion_file(&table, &config).unwrap();
        let text = std::fs::read_to_string(sto).unwrap();
        assert_eq!(text.lines().count(), 6 + 5);
    }

    #[test]
    fn test_default_sensor_list_includes_unmapped_forehead() {
        assert!(DEFAULT_SENSORS.contains(&"Forehead"));
        assert!(SensorMapping::opensim().destination_of("Forehead").is_none());
    }
}
