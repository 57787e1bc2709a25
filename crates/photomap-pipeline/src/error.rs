use std::path::PathBuf;

use photomap_scene::SceneError;

/// An error type for the mapping pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Input path does not exist or is not a directory.
    #[error("Input path is not a directory: {0}")]
    InvalidInput(PathBuf),

    /// Input directory holds no supported image files.
    #[error("No supported images found in {0}")]
    EmptyInput(PathBuf),

    /// An artifact a stage depends on is missing or unreadable.
    #[error("Stage '{stage}' expected artifact at {path} but it is missing")]
    StageIo {
        /// Name of the stage whose artifact is affected.
        stage: &'static str,
        /// Expected artifact path.
        path: PathBuf,
    },

    /// A stage aborted; artifacts of completed stages stay on disk.
    #[error("Stage '{stage}' failed. {source}")]
    StageFailed {
        /// Name of the failing stage.
        stage: &'static str,
        /// Underlying failure.
        #[source]
        source: Box<PipelineError>,
    },

    /// The wrapped external engine reported a failure.
    #[error("External engine error: {0}")]
    ExternalEngine(String),

    /// Error from the scene data model.
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Error reading or writing a file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),
}
