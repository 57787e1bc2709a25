use std::io::Write;
use std::path::Path;

use photomap_scene::Reconstruction;

use crate::error::PipelineError;

/// Feature extraction over an ordered image list.
///
/// Must be idempotent given identical inputs and leave the feature
/// store at `feature_path` on success.
pub trait FeatureExtractor {
    /// Extracts features for every image in `image_list`.
    ///
    /// # Arguments
    ///
    /// * `image_dir` - Directory the image references are relative to.
    /// * `image_list` - Ordered, folder-relative image references.
    /// * `feature_path` - Where to write the feature store.
    fn extract(
        &self,
        image_dir: &Path,
        image_list: &[String],
        feature_path: &Path,
    ) -> Result<(), PipelineError>;
}

/// Generation of the image pairs to attempt matching on.
pub trait PairGenerator {
    /// Writes the pairs file for `image_list` to `pairs_path`.
    fn generate(&self, pairs_path: &Path, image_list: &[String]) -> Result<(), PipelineError>;
}

/// Matching of features across the listed image pairs.
pub trait FeatureMatcher {
    /// Matches features for every pair in `pairs_path`.
    ///
    /// # Arguments
    ///
    /// * `pairs_path` - Pairs file produced by a [`PairGenerator`].
    /// * `feature_path` - Feature store produced by a [`FeatureExtractor`].
    /// * `match_path` - Where to write the match store.
    fn match_features(
        &self,
        pairs_path: &Path,
        feature_path: &Path,
        match_path: &Path,
    ) -> Result<(), PipelineError>;
}

/// Incremental structure-from-motion over extracted features and matches.
pub trait Reconstructor {
    /// Runs the reconstruction and returns the in-memory model.
    ///
    /// Engine-side outputs go into `sfm_dir`; the returned model is
    /// persisted separately by the orchestrator.
    #[allow(clippy::too_many_arguments)]
    fn reconstruct(
        &self,
        sfm_dir: &Path,
        image_dir: &Path,
        pairs_path: &Path,
        feature_path: &Path,
        match_path: &Path,
        image_list: &[String],
    ) -> Result<Reconstruction, PipelineError>;
}

/// Exhaustive all-pairs generation over the ordered image list.
///
/// Emits one `name_a name_b` line for every unordered pair `(i, j)`
/// with `i < j`, which is `n * (n - 1) / 2` lines for `n` images. The
/// ordering of the input list fully determines the file contents.
#[derive(Debug, Default)]
pub struct ExhaustivePairs;

impl PairGenerator for ExhaustivePairs {
    fn generate(&self, pairs_path: &Path, image_list: &[String]) -> Result<(), PipelineError> {
        let file = std::fs::File::create(pairs_path)?;
        let mut writer = std::io::BufWriter::new(file);
        for (i, a) in image_list.iter().enumerate() {
            for b in &image_list[i + 1..] {
                writeln!(writer, "{} {}", a, b)?;
            }
        }
        writer.flush()?;
        Ok(())
    }
}
