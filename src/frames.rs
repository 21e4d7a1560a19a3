//! Multi-sensor quaternion frames for OpenSim motion files.
//!
//! Every table row becomes one [`MotionFrame`] holding the orientation of
//! each mapped sensor. Timestamps are synthesized from the row index and the
//! nominal sample rate; source time columns are ignored.

use log::debug;

use crate::error::{ConvertError, Result};
use crate::layout::{quaternion_column_name, MappedQuaternionColumns};
use crate::mapping::SensorMapping;
use crate::math::rotation::QuaternionComponents;
use crate::table::Table;

/// One motion-file row.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionFrame {
    /// Seconds since the first sample.
    pub time: f64,
    /// Quaternion per mapped sensor, in mapping order.
    pub orientations: Vec<QuaternionComponents>,
}

impl MotionFrame {
    /// Render the time and one comma-joined quaternion per sensor.
    #[must_use]
    pub fn fields(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.orientations.len() + 1);
        out.push(format_time(self.time));
        out.extend(self.orientations.iter().map(format_quaternion));
        out
    }
}

/// Time field, six decimals.
#[must_use]
pub fn format_time(seconds: f64) -> String {
    format!("{seconds:.6}")
}

/// Quaternion field, ten decimals per component, comma separated.
#[must_use]
pub fn format_quaternion(q: &QuaternionComponents) -> String {
    format!("{:.10},{:.10},{:.10},{:.10}", q[0], q[1], q[2], q[3])
}

/// Synthesized timestamp of row `index`.
#[must_use]
pub fn frame_time(index: usize, sample_rate: f64) -> f64 {
    index as f64 / sample_rate
}

/// Build one frame per table row.
///
/// # Errors
///
/// - [`ConvertError::MissingColumns`] if any mapped sensor lacks one of its
///   four quaternion columns; every absent column is listed.
/// - [`ConvertError::InvalidCell`] if a quaternion cell is not numeric.
pub fn build_motion_frames(
    table: &Table,
    mapping: &SensorMapping,
    sample_rate: f64,
) -> Result<Vec<MotionFrame>> {
    let columns = MappedQuaternionColumns::resolve(table, mapping)?;

    let mut frames = Vec::with_capacity(table.n_rows());
    for row in 0..table.n_rows() {
        let mut orientations = Vec::with_capacity(columns.sensors.len());
        for (pair, sensor) in mapping.iter().zip(&columns.sensors) {
            let mut q = [0.0; 4];
            for (component, (value, cells)) in q.iter_mut().zip(sensor).enumerate() {
                let cell = &cells[row];
                *value = cell.as_f64().ok_or_else(|| {
                    ConvertError::invalid_cell(
                        quaternion_column_name(&pair.source, component),
                        row,
                        cell.to_string(),
                    )
                })?;
            }
            orientations.push(q);
        }
        frames.push(MotionFrame {
            time: frame_time(row, sample_rate),
            orientations,
        });
    }

    debug!("Built {} motion frames for {} sensors", frames.len(), mapping.len());
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn mapped_table(mapping: &SensorMapping, n_rows: usize) -> Table {
        let mut cols = Vec::new();
        for (s, pair) in mapping.iter().enumerate() {
            for c in 0..4 {
                cols.push((
                    quaternion_column_name(&pair.source, c),
                    (0..n_rows)
                        .map(|r| Cell::from((s * 100 + r * 10 + c) as f64 / 1000.0))
                        .collect(),
                ));
            }
        }
        Table::from_columns(cols).unwrap()
    }

    #[test]
    fn test_time_synthesis() {
        assert_eq!(format_time(frame_time(250, 100.0)), "2.500000");
        assert_eq!(format_time(frame_time(0, 100.0)), "0.000000");
        assert_eq!(format_time(frame_time(1, 100.0)), "0.010000");
    }

    #[test]
    fn test_quaternion_format() {
        assert_eq!(
            format_quaternion(&[1.0, 0.0, -0.5, 0.123_456_789_01]),
            "1.0000000000,0.0000000000,-0.5000000000,0.1234567890"
        );
    }

    #[test]
    fn test_build_frames() {
        let mapping = SensorMapping::opensim();
        let table = mapped_table(&mapping, 300);
        let frames = build_motion_frames(&table, &mapping, 100.0).unwrap();

        assert_eq!(frames.len(), 300);
        assert_eq!(frames[250].fields()[0], "2.500000");
        assert_eq!(frames[0].orientations.len(), 12);
        assert_eq!(frames[2].orientations[1], [0.12, 0.121, 0.122, 0.123]);
        assert_eq!(frames[0].fields().len(), 13);
    }

    #[test]
    fn test_column_order_follows_mapping() {
        let mapping = SensorMapping::from_pairs([("B", "b_imu"), ("A", "a_imu")]);
        // Columns laid out A first, B second.
        let cols = ["A", "B"]
            .iter()
            .flat_map(|s| {
                (0..4).map(move |c| {
                    let v = if *s == "A" { 0.1 } else { 0.2 };
                    (quaternion_column_name(s, c), vec![Cell::from(v)])
                })
            })
            .collect::<Vec<_>>();
        let table = Table::from_columns(cols).unwrap();

        let frames = build_motion_frames(&table, &mapping, 100.0).unwrap();
        assert_eq!(frames[0].orientations[0], [0.2; 4]);
        assert_eq!(frames[0].orientations[1], [0.1; 4]);
    }

    #[test]
    fn test_missing_q3() {
        let mapping = SensorMapping::opensim();
        let table = mapped_table(&mapping, 2);
        let cols: Vec<(String, Vec<Cell>)> = table
            .column_names()
            .filter(|n| *n != "R_Wrist_OriInc_q3")
            .map(|n| (n.to_string(), table.column(n).unwrap().to_vec()))
            .collect();
        let table = Table::from_columns(cols).unwrap();

        match build_motion_frames(&table, &mapping, 100.0) {
            Err(ConvertError::MissingColumns { columns }) => {
                assert_eq!(columns, vec!["R_Wrist_OriInc_q3"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_cell() {
        let mapping = SensorMapping::from_pairs([("A", "a_imu")]);
        let cols = (0..4)
            .map(|c| {
                let cell = if c == 2 { Cell::Empty } else { Cell::from(0.5) };
                (quaternion_column_name("A", c), vec![cell])
            })
            .collect::<Vec<_>>();
        let table = Table::from_columns(cols).unwrap();

        match build_motion_frames(&table, &mapping, 100.0) {
            Err(ConvertError::InvalidCell { column, row, .. }) => {
                assert_eq!(column, "A_OriInc_q2");
                assert_eq!(row, 0);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
