use std::path::Path;

use photomap_scene::{reconstruction::MODEL_FILE_NAME, Reconstruction};

use crate::discovery::{discover_images, relative_references};
use crate::engine::{FeatureExtractor, FeatureMatcher, PairGenerator, Reconstructor};
use crate::error::PipelineError;
use crate::layout::OutputLayout;
use crate::stage::{PipelineObserver, Stage};

/// Progress of one pipeline run.
///
/// Transitions strictly in order; the stage cache's "already complete"
/// shortcut is internal and never skips a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// No run has started yet.
    NotStarted,
    /// Scanning the input folder for images.
    Discovering,
    /// Extracting per-image features.
    Extracting,
    /// Generating the image pairs to match.
    Pairing,
    /// Matching features across pairs.
    Matching,
    /// Running incremental structure-from-motion.
    Reconstructing,
    /// The run completed and the model was persisted.
    Done,
    /// A stage failed; completed artifacts remain on disk.
    Failed,
}

/// Sequences the mapping stages against the external engines.
///
/// Each expensive stage is gated through a [`Stage`], so re-running
/// over the same output root recomputes nothing that already
/// completed. The orchestrator holds no state beyond the output
/// layout handed to [`Self::run`]; the first stage failure aborts the
/// remaining sequence.
pub struct MappingPipeline<'a> {
    extractor: &'a dyn FeatureExtractor,
    pair_generator: &'a dyn PairGenerator,
    matcher: &'a dyn FeatureMatcher,
    reconstructor: &'a dyn Reconstructor,
    observer: &'a mut dyn PipelineObserver,
    state: PipelineState,
}

impl<'a> MappingPipeline<'a> {
    /// Creates a pipeline over the given engines and observer.
    pub fn new(
        extractor: &'a dyn FeatureExtractor,
        pair_generator: &'a dyn PairGenerator,
        matcher: &'a dyn FeatureMatcher,
        reconstructor: &'a dyn Reconstructor,
        observer: &'a mut dyn PipelineObserver,
    ) -> Self {
        Self {
            extractor,
            pair_generator,
            matcher,
            reconstructor,
            observer,
            state: PipelineState::NotStarted,
        }
    }

    /// The current pipeline state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Runs the full pipeline over `image_dir`, staging every artifact
    /// under `layout`, and returns the persisted reconstruction model.
    ///
    /// # Errors
    ///
    /// Fails fast on the first stage error; artifacts of stages that
    /// completed earlier (in this run or a previous one) stay on disk
    /// so a later invocation over the same layout resumes where this
    /// one stopped.
    pub fn run(
        &mut self,
        image_dir: &Path,
        layout: &OutputLayout,
    ) -> Result<Reconstruction, PipelineError> {
        let result = self.run_stages(image_dir, layout);
        self.state = match result {
            Ok(_) => PipelineState::Done,
            Err(_) => PipelineState::Failed,
        };
        result
    }

    fn run_stages(
        &mut self,
        image_dir: &Path,
        layout: &OutputLayout,
    ) -> Result<Reconstruction, PipelineError> {
        // Discovery is never cached: it is cheap and must reflect the
        // current folder contents.
        self.state = PipelineState::Discovering;
        let images = discover_images(image_dir)?;
        let references = relative_references(image_dir, &images);
        log::info!("found {} images in {}", references.len(), image_dir.display());

        self.state = PipelineState::Extracting;
        let extractor = self.extractor;
        Stage::new("extract-features", layout.features()).run_if_needed(
            &mut *self.observer,
            |out| extractor.extract(image_dir, &references, out),
        )?;

        self.state = PipelineState::Pairing;
        let pair_generator = self.pair_generator;
        Stage::new("generate-pairs", layout.sfm_pairs())
            .run_if_needed(&mut *self.observer, |out| {
                pair_generator.generate(out, &references)
            })?;

        self.state = PipelineState::Matching;
        ensure_artifact("match-features", &layout.sfm_pairs())?;
        ensure_artifact("match-features", &layout.features())?;
        let matcher = self.matcher;
        Stage::new("match-features", layout.matches()).run_if_needed(
            &mut *self.observer,
            |out| matcher.match_features(&layout.sfm_pairs(), &layout.features(), out),
        )?;

        self.state = PipelineState::Reconstructing;
        ensure_artifact("reconstruct", &layout.sfm_pairs())?;
        ensure_artifact("reconstruct", &layout.features())?;
        ensure_artifact("reconstruct", &layout.matches())?;
        let reconstructor = self.reconstructor;
        let mut fresh_model = None;
        Stage::new("reconstruct", layout.sfm_dir()).run_if_needed(
            &mut *self.observer,
            |out| {
                std::fs::create_dir_all(out)?;
                let model = reconstructor.reconstruct(
                    out,
                    image_dir,
                    &layout.sfm_pairs(),
                    &layout.features(),
                    &layout.matches(),
                    &references,
                )?;
                // persisted inside the staged directory, so the model
                // and its stage publish together
                model.write_binary(out)?;
                fresh_model = Some(model);
                Ok(())
            },
        )?;

        let model = match fresh_model {
            Some(model) => model,
            // completed in a previous run; recover the persisted model
            None => {
                ensure_artifact("reconstruct", &layout.sfm_dir().join(MODEL_FILE_NAME))?;
                Reconstruction::read_binary(layout.sfm_dir())?
            }
        };

        log::info!(
            "mapping completed with {} localized images, model saved in {}",
            model.len(),
            layout.sfm_dir().display()
        );
        Ok(model)
    }
}

fn ensure_artifact(stage: &'static str, path: &Path) -> Result<(), PipelineError> {
    if path.exists() {
        Ok(())
    } else {
        Err(PipelineError::StageIo {
            stage,
            path: path.to_path_buf(),
        })
    }
}
