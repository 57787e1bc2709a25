use std::path::{Path, PathBuf};

use crate::intrinsics::CameraIntrinsics;
use crate::pose::Pose;

/// One fully localized camera.
///
/// Owns its pose and intrinsics by value; `image_path` is a reference
/// to an externally managed image file, not ownership of its bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalizedImage {
    image_path: PathBuf,
    camera_pose: Pose,
    camera_intrinsics: CameraIntrinsics,
}

impl LocalizedImage {
    /// Creates a new LocalizedImage from its components.
    pub fn new(
        image_path: impl Into<PathBuf>,
        camera_pose: Pose,
        camera_intrinsics: CameraIntrinsics,
    ) -> Self {
        Self {
            image_path: image_path.into(),
            camera_pose,
            camera_intrinsics,
        }
    }

    /// Path of the image this camera was localized from.
    pub fn image_path(&self) -> &Path {
        &self.image_path
    }

    /// The camera pose in the world frame.
    pub fn camera_pose(&self) -> &Pose {
        &self.camera_pose
    }

    /// The pinhole camera intrinsics.
    pub fn camera_intrinsics(&self) -> &CameraIntrinsics {
        &self.camera_intrinsics
    }
}
