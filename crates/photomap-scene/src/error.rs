/// An error type for the scene data model.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// Focal lengths must be positive and finite.
    #[error("Invalid camera intrinsics: {0}")]
    InvalidIntrinsics(String),

    /// Rotation matrix is not orthonormal with determinant +1.
    #[error("Invalid rotation matrix: {0}")]
    InvalidRotation(String),

    /// External record is missing fields or carries non-numeric values.
    #[error("Malformed image record. {0}")]
    MalformedRecord(#[from] serde_json::Error),

    /// A reconstruction already holds an entry for this image path.
    #[error("Duplicate image in reconstruction: {0}")]
    DuplicateImage(std::path::PathBuf),

    /// Error reading or writing a file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Failed to encode the binary reconstruction model.
    #[error("Failed to encode reconstruction. {0}")]
    EncodeError(#[from] bincode::error::EncodeError),

    /// Failed to decode the binary reconstruction model.
    #[error("Failed to decode reconstruction. {0}")]
    DecodeError(#[from] bincode::error::DecodeError),
}
