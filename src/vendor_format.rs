//! Xsens-style per-sensor text export.
//!
//! Layout: five `//` comment lines, a tab-separated header line, then one
//! tab-separated line per record. Absent values are empty fields.

use std::path::{Path, PathBuf};

use log::info;

use crate::error::Result;
use crate::output::write_atomic;
use crate::records::{SensorRecord, RECORD_FIELD_COUNT};

/// Column header of the export, tab-joined on output.
pub const VENDOR_HEADER: [&str; 26] = [
    "PacketCounter",
    "SampleTimeFine",
    "Year",
    "Month",
    "Day",
    "Second",
    "UTC_Nano",
    "UTC_Year",
    "UTC_Month",
    "UTC_Day",
    "UTC_Hour",
    "UTC_Minute",
    "UTC_Second",
    "UTC_Valid",
    "Acc_X",
    "Acc_Y",
    "Acc_Z",
    "Mat[1][1]",
    "Mat[2][1]",
    "Mat[3][1]",
    "Mat[1][2]",
    "Mat[2][2]",
    "Mat[3][2]",
    "Mat[1][3]",
    "Mat[2][3]",
    "Mat[3][3]",
];

const _: () = assert!(
    RECORD_FIELD_COUNT == VENDOR_HEADER.len(),
    "record fields must line up with the header"
);

const FILTER_PROFILE: &str = "human (46.1)";
const OPTION_FLAGS: &str = "AHS Disabled ICC Disabled";
const FIRMWARE_VERSION: &str = "4.0.2";

/// The comment lines preceding the header, without line terminators.
#[must_use]
pub fn preamble(update_rate: f64) -> [String; 5] {
    [
        "// Start Time: Unknown".to_string(),
        format!("// Update Rate: {update_rate:.2} Hz"),
        format!("// Filter Profile: {FILTER_PROFILE}"),
        format!("// Option Flags: {OPTION_FLAGS}"),
        format!("// Firmware Version: {FIRMWARE_VERSION}"),
    ]
}

/// Render a complete export file.
#[must_use]
pub fn render(records: &[SensorRecord], update_rate: f64) -> String {
    let mut out = String::new();
    for line in preamble(update_rate) {
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str(&VENDOR_HEADER.join("\t"));
    out.push('\n');

    for record in records {
        out.push_str(&record.fields().join("\t"));
        out.push('\n');
    }
    out
}

/// Write one sensor's records to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_sensor_file(
    path: &Path,
    records: &[SensorRecord],
    update_rate: f64,
) -> Result<PathBuf> {
    write_atomic(path, render(records, update_rate).as_bytes())?;
    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(path.to_path_buf())
}
