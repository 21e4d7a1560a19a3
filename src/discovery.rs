//! Locating input tables on disk.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::{ConvertError, Result};

/// Extension of exported recording tables.
pub const TABLE_EXTENSION: &str = "csv";

/// Find the recording of `trial` in `input_dir`.
///
/// Candidates are files with the `.csv` extension whose name contains the
/// trial label. The first one in name order is returned.
///
/// # Errors
///
/// Returns [`ConvertError::InputNotFound`] if no file matches, or an I/O
/// error if the directory cannot be listed.
pub fn find_trial_table(input_dir: &Path, trial: &str) -> Result<PathBuf> {
    let mut matches: Vec<PathBuf> = fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| {
            let has_ext = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(TABLE_EXTENSION));
            let has_label = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.contains(trial));
            has_ext && has_label
        })
        .collect();
    matches.sort();

    match matches.len() {
        0 => Err(ConvertError::input_not_found(
            input_dir,
            format!("*{trial}*.{TABLE_EXTENSION}"),
        )),
        1 => Ok(matches.remove(0)),
        n => {
            warn!(
                "{n} tables match trial '{trial}' in {}, using {}",
                input_dir.display(),
                matches[0].display()
            );
            Ok(matches.remove(0))
        }
    }
}

/// Path of a subject's trial table: `{input_dir}/{subject}/{subject}_{trial}.csv`.
///
/// # Errors
///
/// Returns [`ConvertError::InputNotFound`] if the file does not exist.
pub fn subject_trial_table(input_dir: &Path, subject: &str, trial: &str) -> Result<PathBuf> {
    let name = format!("{subject}_{trial}.{TABLE_EXTENSION}");
    let path = input_dir.join(subject).join(&name);
    if path.is_file() {
        debug!("Using input table {}", path.display());
        Ok(path)
    } else {
        Err(ConvertError::input_not_found(input_dir.join(subject), name))
    }
}
