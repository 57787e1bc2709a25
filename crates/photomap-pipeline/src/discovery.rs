use std::path::{Path, PathBuf};

use photomap_scene::record::posix_path;

use crate::error::PipelineError;

/// File extensions recognized as images, compared case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "tif", "tiff", "bmp", "webp"];

/// Lists the supported image files in `folder`.
///
/// The result is sorted lexicographically by path so that downstream
/// pairing, matching and output ordering are reproducible across runs
/// and platforms; the filesystem iteration order is never exposed.
///
/// # Arguments
///
/// * `folder` - Directory containing the images to process.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidInput`] if `folder` does not exist
/// or is not a directory, and [`PipelineError::EmptyInput`] if no
/// supported image file is found.
pub fn discover_images(folder: impl AsRef<Path>) -> Result<Vec<PathBuf>, PipelineError> {
    let folder = folder.as_ref();
    if !folder.is_dir() {
        return Err(PipelineError::InvalidInput(folder.to_path_buf()));
    }

    let mut images = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        if path.is_file() && is_supported_image(&path) {
            images.push(path);
        }
    }

    if images.is_empty() {
        return Err(PipelineError::EmptyInput(folder.to_path_buf()));
    }

    images.sort();
    Ok(images)
}

/// Turns discovered image paths into folder-relative, forward-slash
/// references as consumed by the external engines.
pub fn relative_references(folder: &Path, images: &[PathBuf]) -> Vec<String> {
    images
        .iter()
        .map(|path| posix_path(path.strip_prefix(folder).unwrap_or(path)))
        .collect()
}

fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
