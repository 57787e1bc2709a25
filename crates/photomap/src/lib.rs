#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use photomap_scene as scene;

#[doc(inline)]
pub use photomap_pipeline as pipeline;
