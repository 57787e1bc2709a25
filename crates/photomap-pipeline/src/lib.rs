#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Image set discovery over an input folder.
pub mod discovery;

/// Interfaces to the external structure-from-motion engines.
pub mod engine;

/// Error types for the pipeline.
pub mod error;

/// Output directory layout of one pipeline run.
pub mod layout;

/// Orchestration of the staged mapping pipeline.
pub mod mapping;

/// Existence-gated pipeline stages with atomic artifact publishing.
pub mod stage;

pub use error::PipelineError;
