//! Column resolution.
//!
//! Maps a wide table onto per-sensor column slots once, up front. A column
//! belongs to a sensor slot when its name contains the sensor identifier and
//! ends with the slot suffix. When several columns qualify, the one named
//! `{sensor}_...` wins; if that still leaves more than one, resolution fails
//! instead of guessing. Missing columns are collected and reported together.

use log::debug;

use crate::error::{ConvertError, Result};
use crate::mapping::SensorMapping;
use crate::table::{Cell, Table};

/// Suffixes of the free-acceleration columns, X/Y/Z.
pub const FREE_ACC_SUFFIXES: [&str; 3] = ["FreeAcc_X", "FreeAcc_Y", "FreeAcc_Z"];

/// Suffixes of the quaternion columns, scalar first.
pub const QUATERNION_SUFFIXES: [&str; 4] = ["_q0", "_q1", "_q2", "_q3"];

/// Column-name infix of incremental orientation quaternions.
pub const ORIENTATION_INFIX: &str = "OriInc";

/// Canonical name of a sensor's quaternion component column.
#[must_use]
pub fn quaternion_column_name(sensor: &str, component: usize) -> String {
    format!("{sensor}_{ORIENTATION_INFIX}{}", QUATERNION_SUFFIXES[component])
}

/// Columns holding one sensor's data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorColumns {
    pub sensor: String,
    /// Free acceleration X/Y/Z; absent axes are rendered empty.
    pub free_acc: [Option<String>; 3],
    /// Quaternion components q0..q3.
    pub quaternion: [String; 4],
}

impl SensorColumns {
    /// Resolve the columns of `sensor` in `table`.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::MissingSensorData`] if no free-acceleration or
    ///   quaternion column mentions the sensor.
    /// - [`ConvertError::MissingColumns`] naming every absent quaternion column.
    /// - [`ConvertError::AmbiguousColumn`] if a slot cannot be decided.
    pub fn resolve(table: &Table, sensor: &str) -> Result<Self> {
        let candidates: Vec<&str> = table
            .column_names()
            .filter(|name| name.contains(sensor))
            .collect();

        let relevant = candidates.iter().any(|name| {
            FREE_ACC_SUFFIXES
                .iter()
                .chain(QUATERNION_SUFFIXES.iter())
                .any(|suffix| name.ends_with(suffix))
        });
        if !relevant {
            return Err(ConvertError::missing_sensor_data(sensor));
        }

        let mut free_acc: [Option<String>; 3] = Default::default();
        for (slot, suffix) in free_acc.iter_mut().zip(FREE_ACC_SUFFIXES) {
            *slot = select_slot(&candidates, sensor, suffix)?;
        }

        let mut found: [Option<String>; 4] = Default::default();
        for (slot, suffix) in found.iter_mut().zip(QUATERNION_SUFFIXES) {
            *slot = select_slot(&candidates, sensor, suffix)?;
        }

        // Name the absent components after the stem of a present one so the
        // error lists the columns the recording would have used.
        let stem = found
            .iter()
            .zip(QUATERNION_SUFFIXES)
            .find_map(|(name, suffix)| name.as_deref().and_then(|n| n.strip_suffix(suffix)))
            .map_or_else(
                || format!("{sensor}_{ORIENTATION_INFIX}"),
                str::to_string,
            );

        let mut quaternion: [String; 4] = Default::default();
        let mut missing = Vec::new();
        for ((slot, name), suffix) in quaternion.iter_mut().zip(found).zip(QUATERNION_SUFFIXES) {
            match name {
                Some(name) => *slot = name,
                None => missing.push(format!("{stem}{suffix}")),
            }
        }
        if !missing.is_empty() {
            return Err(ConvertError::missing_columns(missing));
        }

        debug!("Sensor {sensor}: free acc {free_acc:?}, quaternion {quaternion:?}");

        Ok(Self {
            sensor: sensor.to_string(),
            free_acc,
            quaternion,
        })
    }
}

fn select_slot(candidates: &[&str], sensor: &str, suffix: &str) -> Result<Option<String>> {
    let matches: Vec<&str> = candidates
        .iter()
        .copied()
        .filter(|name| name.ends_with(suffix))
        .collect();

    match matches.as_slice() {
        [] => Ok(None),
        [only] => Ok(Some((*only).to_string())),
        _ => {
            let prefix = format!("{sensor}_");
            let preferred: Vec<&str> = matches
                .iter()
                .copied()
                .filter(|name| name.starts_with(&prefix))
                .collect();
            match preferred.as_slice() {
                [only] => Ok(Some((*only).to_string())),
                _ => Err(ConvertError::AmbiguousColumn {
                    sensor: sensor.to_string(),
                    suffix: suffix.to_string(),
                    candidates: matches.iter().map(|s| (*s).to_string()).collect(),
                }),
            }
        }
    }
}

/// Quaternion columns of every mapped sensor, in mapping order.
#[derive(Debug)]
pub struct MappedQuaternionColumns<'a> {
    pub sensors: Vec<[&'a [Cell]; 4]>,
}

impl<'a> MappedQuaternionColumns<'a> {
    /// Look up `{source}_OriInc_q0..q3` for every mapped source sensor.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::MissingColumns`] naming every absent column.
    pub fn resolve(table: &'a Table, mapping: &SensorMapping) -> Result<Self> {
        let mut sensors = Vec::with_capacity(mapping.len());
        let mut missing = Vec::new();

        for pair in mapping.iter() {
            let empty: &[Cell] = &[];
            let mut columns = [empty; 4];
            for (component, slot) in columns.iter_mut().enumerate() {
                let name = quaternion_column_name(&pair.source, component);
                match table.column(&name) {
                    Some(cells) => *slot = cells,
                    None => missing.push(name),
                }
            }
            sensors.push(columns);
        }

        if !missing.is_empty() {
            return Err(ConvertError::missing_columns(missing));
        }
        Ok(Self { sensors })
    }
}
