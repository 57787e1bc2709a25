use crate::error::SceneError;

/// Tolerance for the orthonormality and determinant checks.
const ROTATION_TOLERANCE: f64 = 1e-6;

/// Position and orientation of a camera in the world frame.
///
/// The rotation is stored as a row-major 3x3 matrix and is validated at
/// construction to be orthonormal with determinant +1 within a small
/// numerical tolerance. A constructed pose is immutable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    rotation: [[f64; 3]; 3],
    translation: [f64; 3],
}

impl Pose {
    /// The identity pose: no rotation, zero translation.
    pub const IDENTITY: Self = Self {
        rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        translation: [0.0, 0.0, 0.0],
    };

    /// Creates a new Pose from a rotation matrix and a translation vector.
    ///
    /// # Arguments
    ///
    /// * `rotation` - Row-major 3x3 rotation matrix.
    /// * `translation` - Translation vector `[x, y, z]`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidRotation`] if `R^T * R` deviates
    /// from identity, `det(R)` deviates from +1 beyond tolerance, or
    /// any entry is not finite.
    pub fn new(rotation: [[f64; 3]; 3], translation: [f64; 3]) -> Result<Self, SceneError> {
        let finite = rotation.iter().flatten().all(|v| v.is_finite())
            && translation.iter().all(|v| v.is_finite());
        if !finite {
            return Err(SceneError::InvalidRotation(
                "non-finite entry in rotation or translation".to_string(),
            ));
        }

        let gram_deviation = gram_identity_deviation(&rotation);
        if gram_deviation > ROTATION_TOLERANCE {
            return Err(SceneError::InvalidRotation(format!(
                "matrix is not orthonormal, max |R^T*R - I| = {:e}",
                gram_deviation
            )));
        }

        let det = det3(&rotation);
        if (det - 1.0).abs() > ROTATION_TOLERANCE {
            return Err(SceneError::InvalidRotation(format!(
                "determinant is {} instead of +1",
                det
            )));
        }

        Ok(Self {
            rotation,
            translation,
        })
    }

    /// The row-major 3x3 rotation matrix.
    pub fn rotation(&self) -> &[[f64; 3]; 3] {
        &self.rotation
    }

    /// The translation vector `[x, y, z]`.
    pub fn translation(&self) -> &[f64; 3] {
        &self.translation
    }
}

/// Largest absolute deviation of `R^T * R` from the identity matrix.
fn gram_identity_deviation(r: &[[f64; 3]; 3]) -> f64 {
    let mut max_dev: f64 = 0.0;
    for i in 0..3 {
        for j in 0..3 {
            // (R^T * R)[i][j] = sum_k R[k][i] * R[k][j]
            let mut acc = 0.0;
            for row in r {
                acc += row[i] * row[j];
            }
            let expected = if i == j { 1.0 } else { 0.0 };
            max_dev = max_dev.max((acc - expected).abs());
        }
    }
    max_dev
}

/// Determinant of a 3x3 row-major matrix.
fn det3(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rotation_z(angle: f64) -> [[f64; 3]; 3] {
        let (s, c) = angle.sin_cos();
        [[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]]
    }

    #[test]
    fn accept_identity() -> Result<(), SceneError> {
        let pose = Pose::new(Pose::IDENTITY.rotation, [1.0, 2.0, 3.0])?;
        assert_relative_eq!(pose.translation()[0], 1.0);
        assert_relative_eq!(pose.rotation()[0][0], 1.0);
        Ok(())
    }

    #[test]
    fn accept_proper_rotation() -> Result<(), SceneError> {
        let pose = Pose::new(rotation_z(0.7), [0.0, 0.0, 0.0])?;
        assert_relative_eq!(det3(pose.rotation()), 1.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn reject_non_orthonormal_matrix() {
        let mut r = rotation_z(0.7);
        r[0][0] += 1e-3;
        assert!(matches!(
            Pose::new(r, [0.0, 0.0, 0.0]),
            Err(SceneError::InvalidRotation(_))
        ));
    }

    #[test]
    fn reject_reflection() {
        // orthonormal but determinant -1
        let r = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1.0]];
        assert!(matches!(
            Pose::new(r, [0.0, 0.0, 0.0]),
            Err(SceneError::InvalidRotation(_))
        ));
    }

    #[test]
    fn reject_non_finite_entries() {
        let mut r = Pose::IDENTITY.rotation;
        r[1][1] = f64::NAN;
        assert!(Pose::new(r, [0.0, 0.0, 0.0]).is_err());
        assert!(Pose::new(Pose::IDENTITY.rotation, [f64::INFINITY, 0.0, 0.0]).is_err());
    }

    #[test]
    fn tolerate_small_numerical_noise() -> Result<(), SceneError> {
        let mut r = rotation_z(1.1);
        r[0][0] += 1e-9;
        Pose::new(r, [0.0, 0.0, 0.0])?;
        Ok(())
    }
}
