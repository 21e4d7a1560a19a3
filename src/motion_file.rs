//! OpenSim quaternion motion file (`.sto`) writer.
//!
//! Layout: a `key=value` header closed by `endheader`, a tab-separated column
//! line (`time` then the destination sensor names), then one line per frame.

use std::path::{Path, PathBuf};

use log::info;

use crate::error::Result;
use crate::frames::MotionFrame;
use crate::mapping::SensorMapping;
use crate::output::write_atomic;

const DATA_TYPE: &str = "Quaternion";
const FILE_VERSION: u32 = 3;
const OPENSIM_VERSION: &str = "4.5";

/// Header lines up to and including `endheader`.
#[must_use]
pub fn preamble(sample_rate: f64) -> [String; 5] {
    [
        format!("DataRate={sample_rate:.6}"),
        format!("DataType={DATA_TYPE}"),
        format!("version={FILE_VERSION}"),
        format!("OpenSimVersion={OPENSIM_VERSION}"),
        "endheader".to_string(),
    ]
}

/// Column labels: `time` followed by destination sensors in mapping order.
#[must_use]
pub fn column_labels(mapping: &SensorMapping) -> Vec<&str> {
    std::iter::once("time").chain(mapping.destinations()).collect()
}

/// Render a complete motion file.
#[must_use]
pub fn render(frames: &[MotionFrame], mapping: &SensorMapping, sample_rate: f64) -> String {
    let mut out = String::new();
    for line in preamble(sample_rate) {
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str(&column_labels(mapping).join("\t"));
    out.push('\n');

    for frame in frames {
        out.push_str(&frame.fields().join("\t"));
        out.push('\n');
    }
    out
}

/// Write the motion file to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_motion_file(
    path: &Path,
    frames: &[MotionFrame],
    mapping: &SensorMapping,
    sample_rate: f64,
) -> Result<PathBuf> {
    write_atomic(path, render(frames, mapping, sample_rate).as_bytes())?;
    info!("Wrote {} frames to {}", frames.len(), path.display());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preamble_text() {
        assert_eq!(
            preamble(100.0),
            [
                "DataRate=100.000000",
                "DataType=Quaternion",
                "version=3",
                "OpenSimVersion=4.5",
                "endheader",
            ]
        );
    }

    #[test]
    fn test_column_labels() {
        let mapping = SensorMapping::opensim();
        let labels = column_labels(&mapping);
        assert_eq!(labels.len(), 13);
        assert_eq!(labels[0], "time");
        assert_eq!(labels[1], "talus_l_imu");
        assert_eq!(labels[6], "pelvis_imu");
        assert_eq!(labels[12], "torso_imu");
    }

    #[test]
    fn test_render() {
        let mapping = SensorMapping::from_pairs([("A", "a_imu"), ("B", "b_imu")]);
        let frames = vec![
            MotionFrame {
                time: 0.0,
                orientations: vec![[1.0, 0.0, 0.0, 0.0], [0.5, 0.5, 0.5, 0.5]],
            },
            MotionFrame {
                time: 0.01,
                orientations: vec![[1.0, 0.0, 0.0, 0.0], [0.5, 0.5, 0.5, 0.5]],
            },
        ];
        let text = render(&frames, &mapping, 100.0);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 8);
        assert_eq!(lines[4], "endheader");
        assert_eq!(lines[5], "time\ta_imu\tb_imu");
        assert_eq!(
            lines[7],
            "0.010000\t1.0000000000,0.0000000000,0.0000000000,0.0000000000\t\
             0.5000000000,0.5000000000,0.5000000000,0.5000000000"
        );
    }

    #[test]
    fn test_write_motion_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("S_T.sto");
        let mapping = SensorMapping::opensim();
        write_motion_file(&path, &[], &mapping, 100.0).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("DataRate=100.000000\n"));
        assert_eq!(text.lines().count(), 6);
    }
}
