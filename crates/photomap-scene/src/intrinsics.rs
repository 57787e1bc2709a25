use crate::error::SceneError;

/// Intrinsic parameters of a pinhole camera.
///
/// Construction validates that both focal lengths are positive and
/// finite; a constructed value never violates that invariant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntrinsics {
    fx: f64,
    fy: f64,
    ox: f64,
    oy: f64,
}

impl CameraIntrinsics {
    /// Creates a new CameraIntrinsics from focal lengths and principal point.
    ///
    /// # Arguments
    ///
    /// * `fx`, `fy` - The focal lengths in pixels, strictly positive.
    /// * `ox`, `oy` - The principal point offsets in pixels.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidIntrinsics`] if any value is not
    /// finite or a focal length is not strictly positive.
    pub fn new(fx: f64, fy: f64, ox: f64, oy: f64) -> Result<Self, SceneError> {
        if !(fx.is_finite() && fy.is_finite() && ox.is_finite() && oy.is_finite()) {
            return Err(SceneError::InvalidIntrinsics(format!(
                "non-finite parameter (fx={}, fy={}, ox={}, oy={})",
                fx, fy, ox, oy
            )));
        }
        if fx <= 0.0 || fy <= 0.0 {
            return Err(SceneError::InvalidIntrinsics(format!(
                "focal lengths must be positive (fx={}, fy={})",
                fx, fy
            )));
        }
        Ok(Self { fx, fy, ox, oy })
    }

    /// The focal length along x in pixels.
    pub fn fx(&self) -> f64 {
        self.fx
    }

    /// The focal length along y in pixels.
    pub fn fy(&self) -> f64 {
        self.fy
    }

    /// The principal point offset along x in pixels.
    pub fn ox(&self) -> f64 {
        self.ox
    }

    /// The principal point offset along y in pixels.
    pub fn oy(&self) -> f64 {
        self.oy
    }

    /// Returns the 3x3 row-major camera projection matrix.
    ///
    /// ```text
    /// [fx  0 ox]
    /// [ 0 fy oy]
    /// [ 0  0  1]
    /// ```
    pub fn matrix(&self) -> [[f64; 3]; 3] {
        [
            [self.fx, 0.0, self.ox],
            [0.0, self.fy, self.oy],
            [0.0, 0.0, 1.0],
        ]
    }
}
