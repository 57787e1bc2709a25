use argh::FromArgs;
use std::path::{Path, PathBuf};

use photomap::pipeline::engine::{
    ExhaustivePairs, FeatureExtractor, FeatureMatcher, Reconstructor,
};
use photomap::pipeline::layout::OutputLayout;
use photomap::pipeline::mapping::MappingPipeline;
use photomap::pipeline::stage::LogObserver;
use photomap::pipeline::PipelineError;
use photomap::scene::Reconstruction;

#[derive(FromArgs)]
/// Run the staged mapping pipeline on a folder of images
struct Args {
    /// path to the folder containing images to process
    #[argh(option, short = 'i')]
    input: PathBuf,
}

/// Placeholder engine used until a feature/matching/reconstruction
/// backend is linked into this build. The real engines are external
/// collaborators; the binary's job is the staged, resumable driver
/// around them.
struct UnconfiguredEngine;

impl UnconfiguredEngine {
    fn unavailable(what: &str) -> PipelineError {
        PipelineError::ExternalEngine(format!("no {} backend is linked into this build", what))
    }
}

impl FeatureExtractor for UnconfiguredEngine {
    fn extract(&self, _: &Path, _: &[String], _: &Path) -> Result<(), PipelineError> {
        Err(Self::unavailable("feature extraction"))
    }
}

impl FeatureMatcher for UnconfiguredEngine {
    fn match_features(&self, _: &Path, _: &Path, _: &Path) -> Result<(), PipelineError> {
        Err(Self::unavailable("feature matching"))
    }
}

impl Reconstructor for UnconfiguredEngine {
    fn reconstruct(
        &self,
        _: &Path,
        _: &Path,
        _: &Path,
        _: &Path,
        _: &Path,
        _: &[String],
    ) -> Result<Reconstruction, PipelineError> {
        Err(Self::unavailable("reconstruction"))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    if !args.input.is_dir() {
        return Err(Box::new(PipelineError::InvalidInput(args.input)));
    }

    let layout = OutputLayout::create_timestamped(&args.input)?;
    log::info!("writing run artifacts to {}", layout.root().display());

    let engine = UnconfiguredEngine;
    let mut observer = LogObserver;
    let mut pipeline =
        MappingPipeline::new(&engine, &ExhaustivePairs, &engine, &engine, &mut observer);

    let model = pipeline.run(&args.input, &layout)?;
    log::info!("localized {} cameras", model.len());
    Ok(())
}
