//! Quaternion to rotation matrix conversion.
//!
//! Quaternions are scalar-first `[q0, q1, q2, q3]` and are used as given:
//! no normalization happens here, so a non-unit input yields a matrix that
//! is not orthonormal.

use nalgebra::Matrix3;

/// Scalar-first orientation quaternion `[q0, q1, q2, q3]`.
pub type QuaternionComponents = [f64; 4];

/// Convert a scalar-first quaternion into a 3x3 rotation matrix.
///
/// # Arguments
///
/// * `q` - Quaternion components `[q0, q1, q2, q3]`, expected to be unit length
///
/// # Returns
///
/// Rotation matrix `R` with `R[(row, col)]` following the standard formula.
#[must_use]
pub fn quaternion_to_rotation_matrix(q: QuaternionComponents) -> Matrix3<f64> {
    let [q0, q1, q2, q3] = q;

    Matrix3::new(
        1.0 - 2.0 * (q2 * q2 + q3 * q3),
        2.0 * (q1 * q2 - q0 * q3),
        2.0 * (q1 * q3 + q0 * q2),
        2.0 * (q1 * q2 + q0 * q3),
        1.0 - 2.0 * (q1 * q1 + q3 * q3),
        2.0 * (q2 * q3 - q0 * q1),
        2.0 * (q1 * q3 - q0 * q2),
        2.0 * (q2 * q3 + q0 * q1),
        1.0 - 2.0 * (q1 * q1 + q2 * q2),
    )
}

/// Flatten a rotation matrix in column-major order.
///
/// The result is `Mat[1][1], Mat[2][1], Mat[3][1], Mat[1][2], ...`, the order
/// used by the vendor export columns.
#[must_use]
pub fn column_major(m: &Matrix3<f64>) -> [f64; 9] {
    // nalgebra stores matrices column-major.
    let mut out = [0.0; 9];
    out.copy_from_slice(m.as_slice());
    out
}

/// Largest absolute deviation of `R * R^T` from the identity.
#[must_use]
pub fn orthonormality_error(m: &Matrix3<f64>) -> f64 {
    (m * m.transpose() - Matrix3::identity()).amax()
}
