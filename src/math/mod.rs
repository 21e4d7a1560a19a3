//! Mathematical utilities for orientation data.
//!
//! This module provides:
//! - [`rotation`]: quaternion to rotation matrix conversion

pub mod rotation;

pub use rotation::{
    column_major, orthonormality_error, quaternion_to_rotation_matrix, QuaternionComponents,
};
