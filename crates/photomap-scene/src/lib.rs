#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the scene data model.
pub mod error;

/// Pinhole camera intrinsics.
pub mod intrinsics;

/// A fully localized camera: image reference, pose and intrinsics.
pub mod localized;

/// Camera pose as a validated rotation and translation.
pub mod pose;

/// Flat wire records and JSON (de)serialization.
pub mod record;

/// Reconstruction model: localized images plus a sparse point cloud.
pub mod reconstruction;

pub use error::SceneError;
pub use intrinsics::CameraIntrinsics;
pub use localized::LocalizedImage;
pub use pose::Pose;
pub use record::ImageRecord;
pub use reconstruction::Reconstruction;
