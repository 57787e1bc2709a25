use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::PipelineError;

/// Artifact paths of one pipeline run under its output root.
///
/// Every artifact path is a pure function of the root, which is what
/// makes a run resumable: re-running over the same root finds the
/// artifacts of completed stages exactly where they were left.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    /// Opens (and creates if absent) a layout at an explicit root.
    ///
    /// Use this to resume a previous run.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, PipelineError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Creates a fresh, timestamp-named run root inside `input_folder`.
    ///
    /// The unix-seconds suffix keeps concurrent runs over the same
    /// input folder from sharing a root.
    pub fn create_timestamped(input_folder: &Path) -> Result<Self, PipelineError> {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self::new(input_folder.join(format!("photomap_output_{}", secs)))
    }

    /// The run's output root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Pairs artifact for structure-from-motion.
    pub fn sfm_pairs(&self) -> PathBuf {
        self.root.join("pairs-sfm.txt")
    }

    /// Pairs artifact for later localization queries.
    pub fn loc_pairs(&self) -> PathBuf {
        self.root.join("pairs-loc.txt")
    }

    /// Feature store artifact.
    pub fn features(&self) -> PathBuf {
        self.root.join("features.h5")
    }

    /// Match store artifact.
    pub fn matches(&self) -> PathBuf {
        self.root.join("matches.h5")
    }

    /// Directory holding the binary-serialized reconstruction model.
    pub fn sfm_dir(&self) -> PathBuf {
        self.root.join("sfm")
    }
}
