use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SceneError;
use crate::intrinsics::CameraIntrinsics;
use crate::localized::LocalizedImage;
use crate::pose::Pose;

/// Flat per-image record as produced by the reconstruction engine.
///
/// Wire schema: intrinsics `fx, fy, ox, oy`, translation `px, py, pz`
/// and the row-major 3x3 rotation matrix `r00..r22`. All fields are
/// required; a record with a missing or non-numeric field fails to
/// deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct ImageRecord {
    /// Focal length along x in pixels.
    pub fx: f64,
    /// Focal length along y in pixels.
    pub fy: f64,
    /// Principal point offset along x in pixels.
    pub ox: f64,
    /// Principal point offset along y in pixels.
    pub oy: f64,
    /// Translation x.
    pub px: f64,
    /// Translation y.
    pub py: f64,
    /// Translation z.
    pub pz: f64,
    /// Rotation matrix entry at row 0, column 0.
    pub r00: f64,
    /// Rotation matrix entry at row 0, column 1.
    pub r01: f64,
    /// Rotation matrix entry at row 0, column 2.
    pub r02: f64,
    /// Rotation matrix entry at row 1, column 0.
    pub r10: f64,
    /// Rotation matrix entry at row 1, column 1.
    pub r11: f64,
    /// Rotation matrix entry at row 1, column 2.
    pub r12: f64,
    /// Rotation matrix entry at row 2, column 0.
    pub r20: f64,
    /// Rotation matrix entry at row 2, column 1.
    pub r21: f64,
    /// Rotation matrix entry at row 2, column 2.
    pub r22: f64,
}

/// Reads an [`ImageRecord`] from a JSON file.
///
/// # Errors
///
/// Returns [`SceneError::FileError`] if the file cannot be read, or
/// [`SceneError::MalformedRecord`] if a field is missing or not a
/// number.
pub fn read_record(path: impl AsRef<Path>) -> Result<ImageRecord, SceneError> {
    let contents = std::fs::read_to_string(path)?;
    let record = serde_json::from_str(&contents)?;
    Ok(record)
}

/// Serializes a path as a forward-slash separated string, independent
/// of the host path convention.
pub fn posix_path(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        match component {
            std::path::Component::RootDir => out.push('/'),
            other => {
                if !out.is_empty() && !out.ends_with('/') {
                    out.push('/');
                }
                out.push_str(&other.as_os_str().to_string_lossy());
            }
        }
    }
    out
}

impl CameraIntrinsics {
    /// Builds validated intrinsics from the flat record fields.
    pub fn from_record(record: &ImageRecord) -> Result<Self, SceneError> {
        Self::new(record.fx, record.fy, record.ox, record.oy)
    }
}

impl Pose {
    /// Builds a validated pose from the flat record fields.
    pub fn from_record(record: &ImageRecord) -> Result<Self, SceneError> {
        Self::new(
            [
                [record.r00, record.r01, record.r02],
                [record.r10, record.r11, record.r12],
                [record.r20, record.r21, record.r22],
            ],
            [record.px, record.py, record.pz],
        )
    }
}

impl LocalizedImage {
    /// Composes a localized image from an image path and a flat record.
    ///
    /// The first invariant violation found in the record is propagated.
    pub fn from_record(
        image_path: impl Into<std::path::PathBuf>,
        record: &ImageRecord,
    ) -> Result<Self, SceneError> {
        let camera_intrinsics = CameraIntrinsics::from_record(record)?;
        let camera_pose = Pose::from_record(record)?;
        Ok(Self::new(image_path, camera_pose, camera_intrinsics))
    }

    /// Reads the per-image JSON record at `json_path` and composes a
    /// localized image referencing `image_path`.
    pub fn from_json_file(
        image_path: impl Into<std::path::PathBuf>,
        json_path: impl AsRef<Path>,
    ) -> Result<Self, SceneError> {
        let record = read_record(json_path)?;
        Self::from_record(image_path, &record)
    }

    /// Flattens this localized image back into the wire record form.
    pub fn to_record(&self) -> ImageRecord {
        let r = self.camera_pose().rotation();
        let t = self.camera_pose().translation();
        let k = self.camera_intrinsics();
        ImageRecord {
            fx: k.fx(),
            fy: k.fy(),
            ox: k.ox(),
            oy: k.oy(),
            px: t[0],
            py: t[1],
            pz: t[2],
            r00: r[0][0],
            r01: r[0][1],
            r02: r[0][2],
            r10: r[1][0],
            r11: r[1][1],
            r12: r[1][2],
            r20: r[2][0],
            r21: r[2][1],
            r22: r[2][2],
        }
    }

    /// Serializes to a JSON value with the translation as a 3-list,
    /// the rotation as a row-major 3x3 nested list and the image path
    /// as a forward-slash string.
    pub fn to_json_value(&self) -> serde_json::Value {
        let k = self.camera_intrinsics();
        serde_json::json!({
            "image_path": posix_path(self.image_path()),
            "camera_pose": {
                "translation": self.camera_pose().translation(),
                "rotation": self.camera_pose().rotation(),
            },
            "camera_intrinsics": {
                "fx": k.fx(),
                "fy": k.fy(),
                "ox": k.ox(),
                "oy": k.oy(),
            },
        })
    }
}
