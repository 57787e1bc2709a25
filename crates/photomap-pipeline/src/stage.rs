use std::path::{Path, PathBuf};

use crate::error::PipelineError;

/// What happened to a stage when the pipeline reached it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    /// The stage's artifact is absent; its work is starting.
    Started,
    /// The stage ran and published its artifact.
    Computed,
    /// The artifact already existed; the stage was skipped.
    Cached,
}

/// Informational event emitted on every stage transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageEvent {
    /// Name of the stage.
    pub stage: &'static str,
    /// What happened.
    pub status: StageStatus,
}

/// Observer invoked by the pipeline on stage transitions.
///
/// Injected instead of relying on process-wide logging state; the
/// default [`LogObserver`] forwards to the `log` facade.
pub trait PipelineObserver {
    /// Called once per stage transition.
    fn on_event(&mut self, event: &StageEvent);
}

/// Default observer reporting stage transitions through `log`.
#[derive(Debug, Default)]
pub struct LogObserver;

impl PipelineObserver for LogObserver {
    fn on_event(&mut self, event: &StageEvent) {
        match event.status {
            StageStatus::Started => log::debug!("stage '{}' started", event.stage),
            StageStatus::Computed => log::info!("stage '{}' computed", event.stage),
            StageStatus::Cached => log::info!("stage '{}' cached, skipping", event.stage),
        }
    }
}

/// One unit of pipeline work producing exactly one declared artifact.
///
/// A stage is complete exactly when its artifact exists. Work runs
/// against a staging path next to the artifact and is only renamed to
/// the published name on success, so a crash mid-stage never leaves a
/// half-written artifact that a later run would mistake for complete.
#[derive(Debug, Clone)]
pub struct Stage {
    name: &'static str,
    artifact: PathBuf,
}

impl Stage {
    /// Creates a stage from its name and declared artifact path.
    pub fn new(name: &'static str, artifact: impl Into<PathBuf>) -> Self {
        Self {
            name,
            artifact: artifact.into(),
        }
    }

    /// Name of the stage, used in events and errors.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The declared output artifact path.
    pub fn artifact(&self) -> &Path {
        &self.artifact
    }

    /// Whether the artifact has been published.
    pub fn is_complete(&self) -> bool {
        self.artifact.exists()
    }

    /// Runs `work` unless the artifact already exists.
    ///
    /// `work` receives the staging path and must leave its output
    /// there; the stage publishes it atomically. On failure any
    /// staging leftovers are removed and the error is wrapped in
    /// [`PipelineError::StageFailed`] with the stage name.
    pub fn run_if_needed<F>(
        &self,
        observer: &mut dyn PipelineObserver,
        work: F,
    ) -> Result<(), PipelineError>
    where
        F: FnOnce(&Path) -> Result<(), PipelineError>,
    {
        if self.is_complete() {
            observer.on_event(&StageEvent {
                stage: self.name,
                status: StageStatus::Cached,
            });
            return Ok(());
        }

        observer.on_event(&StageEvent {
            stage: self.name,
            status: StageStatus::Started,
        });

        let staging = self.staging_path();
        // leftovers from a crashed run
        remove_path(&staging)?;

        match work(&staging) {
            Ok(()) => {
                if !staging.exists() {
                    return Err(PipelineError::StageIo {
                        stage: self.name,
                        path: staging,
                    });
                }
                std::fs::rename(&staging, &self.artifact)?;
                observer.on_event(&StageEvent {
                    stage: self.name,
                    status: StageStatus::Computed,
                });
                Ok(())
            }
            Err(source) => {
                let _ = remove_path(&staging);
                Err(PipelineError::StageFailed {
                    stage: self.name,
                    source: Box::new(source),
                })
            }
        }
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .artifact
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".part");
        self.artifact.with_file_name(name)
    }
}

fn remove_path(path: &Path) -> Result<(), PipelineError> {
    let result = if path.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    match result {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every event for assertions.
    #[derive(Debug, Default)]
    struct RecordingObserver {
        events: Vec<StageEvent>,
    }

    impl PipelineObserver for RecordingObserver {
        fn on_event(&mut self, event: &StageEvent) {
            self.events.push(*event);
        }
    }

    #[test]
    fn computes_once_then_caches() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let stage = Stage::new("extract-features", tmp_dir.path().join("features.h5"));
        let mut observer = RecordingObserver::default();
        let mut runs = 0;

        stage.run_if_needed(&mut observer, |out| {
            runs += 1;
            std::fs::write(out, b"features")?;
            Ok(())
        })?;
        stage.run_if_needed(&mut observer, |out| {
            runs += 1;
            std::fs::write(out, b"features")?;
            Ok(())
        })?;

        assert_eq!(runs, 1);
        assert!(stage.is_complete());
        assert_eq!(
            observer.events.iter().map(|e| e.status).collect::<Vec<_>>(),
            [StageStatus::Started, StageStatus::Computed, StageStatus::Cached]
        );
        Ok(())
    }

    #[test]
    fn failure_publishes_nothing() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let stage = Stage::new("match-features", tmp_dir.path().join("matches.h5"));
        let mut observer = RecordingObserver::default();

        let result = stage.run_if_needed(&mut observer, |out| {
            // partial write before the failure
            std::fs::write(out, b"partial")?;
            Err(PipelineError::ExternalEngine("matcher crashed".to_string()))
        });

        assert!(matches!(
            result,
            Err(PipelineError::StageFailed {
                stage: "match-features",
                ..
            })
        ));
        assert!(!stage.is_complete());
        assert!(!stage.staging_path().exists());
        Ok(())
    }

    #[test]
    fn stale_staging_leftover_is_not_complete() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let stage = Stage::new("extract-features", tmp_dir.path().join("features.h5"));
        // simulate a crash that left a half-written staging file
        std::fs::write(stage.staging_path(), b"half")?;
        assert!(!stage.is_complete());

        let mut observer = RecordingObserver::default();
        stage.run_if_needed(&mut observer, |out| {
            std::fs::write(out, b"full")?;
            Ok(())
        })?;

        assert_eq!(std::fs::read(stage.artifact())?, b"full");
        Ok(())
    }

    #[test]
    fn missing_output_after_success_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let stage = Stage::new("generate-pairs", tmp_dir.path().join("pairs-sfm.txt"));
        let mut observer = RecordingObserver::default();

        let result = stage.run_if_needed(&mut observer, |_| Ok(()));
        assert!(matches!(result, Err(PipelineError::StageIo { .. })));
        assert!(!stage.is_complete());
        Ok(())
    }

    #[test]
    fn directory_artifacts_are_supported() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let stage = Stage::new("reconstruct", tmp_dir.path().join("sfm"));
        let mut observer = RecordingObserver::default();

        stage.run_if_needed(&mut observer, |out| {
            std::fs::create_dir_all(out)?;
            std::fs::write(out.join("model.bin"), b"model")?;
            Ok(())
        })?;

        assert!(stage.artifact().join("model.bin").exists());
        Ok(())
    }
}
