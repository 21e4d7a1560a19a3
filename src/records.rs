//! Per-sensor output records.
//!
//! One [`SensorRecord`] is produced for every row of the table: the
//! pass-through metadata/time fields, the free acceleration and the rotation
//! matrix derived from the row's orientation quaternion.

use log::{debug, warn};
use nalgebra::Matrix3;

use crate::error::{ConvertError, Result};
use crate::layout::SensorColumns;
use crate::math::rotation::{column_major, quaternion_to_rotation_matrix};
use crate::table::{Cell, Table};

/// Metadata and time columns copied by exact name, in output order.
pub const METADATA_COLUMNS: [&str; 14] = [
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
];

/// Total number of fields in a rendered record.
pub const RECORD_FIELD_COUNT: usize = METADATA_COLUMNS.len() + 3 + 9;

/// One output row for one sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorRecord {
    /// Metadata fields in [`METADATA_COLUMNS`] order; `None` when the column
    /// is absent from the table.
    pub metadata: [Option<Cell>; 14],

    /// Free acceleration X/Y/Z.
    pub free_acc: [Option<f64>; 3],

    /// Rotation matrix, `None` when the row's quaternion is not numeric.
    pub orientation: Option<Matrix3<f64>>,
}

impl SensorRecord {
    /// Render every field as text; absent values become empty strings.
    #[must_use]
    pub fn fields(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(RECORD_FIELD_COUNT);

        out.extend(
            self.metadata
                .iter()
                .map(|cell| cell.as_ref().map(ToString::to_string).unwrap_or_default()),
        );
        out.extend(
            self.free_acc
                .iter()
                .map(|v| v.map(|v| v.to_string()).unwrap_or_default()),
        );
        match &self.orientation {
            Some(m) => out.extend(column_major(m).iter().map(ToString::to_string)),
            None => out.extend(std::iter::repeat(String::new()).take(9)),
        }

        out
    }
}

/// Build the records of one sensor, in table row order.
///
/// `PacketCounter` falls back to the zero-based row index when the table
/// has no such column.
///
/// # Errors
///
/// Propagates column resolution failures from [`SensorColumns::resolve`].
pub fn build_sensor_records(table: &Table, sensor: &str) -> Result<Vec<SensorRecord>> {
    let columns = SensorColumns::resolve(table, sensor)?;

    let metadata: Vec<Option<&[Cell]>> = METADATA_COLUMNS
        .iter()
        .map(|name| table.column(name))
        .collect();

    let free_acc = columns
        .free_acc
        .iter()
        .map(|name| name.as_deref().map(|n| lookup(table, n)).transpose())
        .collect::<Result<Vec<_>>>()?;

    let quaternion = columns
        .quaternion
        .iter()
        .map(|n| lookup(table, n))
        .collect::<Result<Vec<_>>>()?;

    let mut records = Vec::with_capacity(table.n_rows());
    let mut unusable_rows = 0usize;

    for row in 0..table.n_rows() {
        let mut record_metadata: [Option<Cell>; 14] = Default::default();
        for (slot, column) in record_metadata.iter_mut().zip(&metadata) {
            *slot = column.map(|cells| cells[row].clone());
        }
        if record_metadata[0].is_none() {
            record_metadata[0] = Some(Cell::Number(row as f64));
        }

        let mut record_acc = [None; 3];
        for (slot, column) in record_acc.iter_mut().zip(&free_acc) {
            *slot = column.and_then(|cells| cells[row].as_f64());
        }

        let q = [
            quaternion[0][row].as_f64(),
            quaternion[1][row].as_f64(),
            quaternion[2][row].as_f64(),
            quaternion[3][row].as_f64(),
        ];
        let orientation = match q {
            [Some(q0), Some(q1), Some(q2), Some(q3)] => {
                Some(quaternion_to_rotation_matrix([q0, q1, q2, q3]))
            }
            _ => {
                unusable_rows += 1;
                None
            }
        };

        records.push(SensorRecord {
            metadata: record_metadata,
            free_acc: record_acc,
            orientation,
        });
    }

    if unusable_rows > 0 {
        warn!(
            "Sensor {sensor}: {unusable_rows} rows without a numeric quaternion, \
             rotation left empty"
        );
    }
    debug!("Sensor {sensor}: built {} records", records.len());

    Ok(records)
}

fn lookup<'a>(table: &'a Table, name: &str) -> Result<&'a [Cell]> {
    table
        .column(name)
        .ok_or_else(|| ConvertError::missing_columns(vec![name.to_string()]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::rotation::orthonormality_error;

    fn sensor_table(sensor: &str, quats: &[[f64; 4]]) -> Vec<(String, Vec<Cell>)> {
        let mut cols = Vec::new();
        for (i, axis) in ["X", "Y", "Z"].iter().enumerate() {
            cols.push((
                format!("{sensor}_FreeAcc_{axis}"),
                (0..quats.len()).map(|r| Cell::from((r * 10 + i) as f64)).collect(),
            ));
        }
        for c in 0..4 {
            cols.push((
                format!("{sensor}_OriInc_q{c}"),
                quats.iter().map(|q| Cell::from(q[c])).collect(),
            ));
        }
        cols
    }

    #[test]
    fn test_record_count_and_defaults() {
        let quats = [[1.0, 0.0, 0.0, 0.0]; 4];
        let table = Table::from_columns(sensor_table("L_Ankle", &quats)).unwrap();
        let records = build_sensor_records(&table, "L_Ankle").unwrap();

        assert_eq!(records.len(), 4);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.metadata[0], Some(Cell::Number(i as f64)));
            assert!(record.metadata[1..].iter().all(Option::is_none));
            assert_eq!(record.orientation, Some(Matrix3::identity()));
        }
        assert_eq!(records[2].free_acc, [Some(20.0), Some(21.0), Some(22.0)]);
    }

    #[test]
    fn test_missing_metadata_renders_empty() {
        let quats = [[1.0, 0.0, 0.0, 0.0]];
        let table = Table::from_columns(sensor_table("L_Ankle", &quats)).unwrap();
        let records = build_sensor_records(&table, "L_Ankle").unwrap();
        let fields = records[0].fields();

        assert_eq!(fields.len(), RECORD_FIELD_COUNT);
        assert_eq!(fields[0], "0");
        assert!(fields[1..14].iter().all(String::is_empty));
        assert_eq!(&fields[14..17], &["0", "1", "2"]);
        assert_eq!(&fields[17..], &["1", "0", "0", "0", "1", "0", "0", "0", "1"]);
    }

    #[test]
    fn test_metadata_passthrough() {
        let quats = [[1.0, 0.0, 0.0, 0.0]; 2];
        let mut cols = sensor_table("R_Wrist", &quats);
        cols.push(("PacketCounter".to_string(), vec![Cell::from(100.0), Cell::from(101.0)]));
        cols.push(("UTC_Valid".to_string(), vec![Cell::from("yes"), Cell::Empty]));
        let table = Table::from_columns(cols).unwrap();

        let records = build_sensor_records(&table, "R_Wrist").unwrap();
        assert_eq!(records[1].metadata[0], Some(Cell::Number(101.0)));
        assert_eq!(records[0].metadata[13], Some(Cell::Text("yes".into())));

        let fields = records[1].fields();
        assert_eq!(fields[0], "101");
        assert_eq!(fields[13], "");
    }

    #[test]
    fn test_nan_metadata_renders_empty() {
        let csv = "PacketCounter,UTC_Nano,L_Ankle_FreeAcc_X,\
                   L_Ankle_OriInc_q0,L_Ankle_OriInc_q1,L_Ankle_OriInc_q2,L_Ankle_OriInc_q3\n\
                   nan,1e3,NaN,1,0,0,0\n";
        let table = Table::from_reader(csv.as_bytes()).unwrap();
        let records = build_sensor_records(&table, "L_Ankle").unwrap();
        let fields = records[0].fields();

        assert_eq!(fields[0], "");
        assert_eq!(fields[6], "1000");
        assert_eq!(fields[14], "");
        assert!(fields.iter().all(|f| !f.eq_ignore_ascii_case("nan")));
    }

    #[test]
    fn test_rotation_column_major() {
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let table = Table::from_columns(sensor_table("Xiphoid", &[[h, 0.0, 0.0, h]])).unwrap();
        let records = build_sensor_records(&table, "Xiphoid").unwrap();
        let m = records[0].orientation.unwrap();
        assert!(orthonormality_error(&m) < 1e-9);

        let fields = records[0].fields();
        // Mat[2][1] is R[1][0] = 1, Mat[1][2] is R[0][1] = -1.
        let mat21: f64 = fields[18].parse().unwrap();
        let mat12: f64 = fields[20].parse().unwrap();
        assert!((mat21 - 1.0).abs() < 1e-9);
        assert!((mat12 + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_numeric_quaternion_row() {
        let mut cols = sensor_table("L_Wrist", &[[1.0, 0.0, 0.0, 0.0]; 2]);
        cols[3].1[1] = Cell::Empty;
        let table = Table::from_columns(cols).unwrap();

        let records = build_sensor_records(&table, "L_Wrist").unwrap();
        assert!(records[0].orientation.is_some());
        assert!(records[1].orientation.is_none());
        assert!(records[1].fields()[17..].iter().all(String::is_empty));
    }

    #[test]
    fn test_missing_sensor() {
        let table = Table::from_columns(sensor_table("L_Ankle", &[[1.0, 0.0, 0.0, 0.0]])).unwrap();
        assert!(matches!(
            build_sensor_records(&table, "Z_NotPresent"),
            Err(ConvertError::MissingSensorData { .. })
        ));
    }

    #[test]
    fn test_empty_table_rows() {
        let table = Table::from_columns(sensor_table("L_Ankle", &[])).unwrap();
        let records = build_sensor_records(&table, "L_Ankle").unwrap();
        assert!(records.is_empty());
    }
}
