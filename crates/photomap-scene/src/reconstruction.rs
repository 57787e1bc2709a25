use std::path::{Path, PathBuf};

use crate::error::SceneError;
use crate::localized::LocalizedImage;
use crate::record::{posix_path, ImageRecord};

/// File name of the binary-serialized model inside its directory.
pub const MODEL_FILE_NAME: &str = "reconstruction.bin";

/// Result of an incremental structure-from-motion run: localized
/// cameras plus a sparse 3D point cloud.
///
/// Holds at most one entry per distinct image path; iteration order is
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconstruction {
    images: Vec<LocalizedImage>,
    points: Vec<[f64; 3]>,
}

/// On-disk form of the model. Paths are stored as forward-slash
/// strings; geometry is revalidated when loading.
#[derive(bincode::Encode, bincode::Decode)]
struct ReconstructionFile {
    images: Vec<(String, ImageRecord)>,
    points: Vec<[f64; 3]>,
}

impl Reconstruction {
    /// Creates an empty reconstruction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a localized image to the model.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::DuplicateImage`] if the model already
    /// holds an entry for the same image path.
    pub fn insert(&mut self, image: LocalizedImage) -> Result<(), SceneError> {
        if self.get(image.image_path()).is_some() {
            return Err(SceneError::DuplicateImage(image.image_path().to_path_buf()));
        }
        self.images.push(image);
        Ok(())
    }

    /// Appends a sparse 3D point to the model.
    pub fn add_point(&mut self, point: [f64; 3]) {
        self.points.push(point);
    }

    /// Looks up the localized image registered for `path`.
    pub fn get(&self, path: &Path) -> Option<&LocalizedImage> {
        self.images.iter().find(|img| img.image_path() == path)
    }

    /// The localized images in insertion order.
    pub fn images(&self) -> &[LocalizedImage] {
        &self.images
    }

    /// The sparse 3D point cloud. May be empty.
    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    /// Number of localized images in the model.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether the model holds no localized images.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Serializes the model into `dir` as [`MODEL_FILE_NAME`].
    ///
    /// The file is written to a temporary sibling first and only
    /// renamed into place on success, so a crash mid-write never
    /// leaves a truncated model under the published name.
    pub fn write_binary(&self, dir: impl AsRef<Path>) -> Result<(), SceneError> {
        let file = ReconstructionFile {
            images: self
                .images
                .iter()
                .map(|img| (posix_path(img.image_path()), img.to_record()))
                .collect(),
            points: self.points.clone(),
        };
        let encoded = bincode::encode_to_vec(&file, bincode::config::standard())?;

        let final_path = dir.as_ref().join(MODEL_FILE_NAME);
        let staging_path = dir.as_ref().join(format!("{}.part", MODEL_FILE_NAME));
        std::fs::write(&staging_path, &encoded)?;
        std::fs::rename(&staging_path, &final_path)?;
        Ok(())
    }

    /// Deserializes a model previously written by [`Self::write_binary`].
    ///
    /// Every pose and intrinsics entry is revalidated while loading; a
    /// tampered or corrupt file cannot produce an invalid model.
    pub fn read_binary(dir: impl AsRef<Path>) -> Result<Self, SceneError> {
        let bytes = std::fs::read(dir.as_ref().join(MODEL_FILE_NAME))?;
        let (file, _): (ReconstructionFile, usize) =
            bincode::decode_from_slice(&bytes, bincode::config::standard())?;

        let mut model = Self::new();
        for (path, record) in &file.images {
            model.insert(LocalizedImage::from_record(PathBuf::from(path), record)?)?;
        }
        model.points = file.points;
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intrinsics::CameraIntrinsics;
    use crate::pose::Pose;
    use approx::assert_relative_eq;

    fn localized(name: &str, tx: f64) -> Result<LocalizedImage, SceneError> {
        Ok(LocalizedImage::new(
            name,
            Pose::new(*Pose::IDENTITY.rotation(), [tx, 0.0, 0.0])?,
            CameraIntrinsics::new(600.0, 600.0, 320.0, 240.0)?,
        ))
    }

    #[test]
    fn insert_rejects_duplicate_path() -> Result<(), SceneError> {
        let mut model = Reconstruction::new();
        model.insert(localized("a.jpg", 0.0)?)?;
        model.insert(localized("b.jpg", 1.0)?)?;
        assert!(matches!(
            model.insert(localized("a.jpg", 2.0)?),
            Err(SceneError::DuplicateImage(_))
        ));
        assert_eq!(model.len(), 2);
        Ok(())
    }

    #[test]
    fn lookup_by_path() -> Result<(), SceneError> {
        let mut model = Reconstruction::new();
        model.insert(localized("a.jpg", 0.5)?)?;
        let found = model.get(Path::new("a.jpg")).expect("entry exists");
        assert_relative_eq!(found.camera_pose().translation()[0], 0.5);
        assert!(model.get(Path::new("b.jpg")).is_none());
        Ok(())
    }

    #[test]
    fn binary_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let mut model = Reconstruction::new();
        model.insert(localized("a.jpg", 0.0)?)?;
        model.insert(localized("b.jpg", 1.0)?)?;
        model.add_point([0.1, 0.2, 0.3]);

        model.write_binary(tmp_dir.path())?;
        let loaded = Reconstruction::read_binary(tmp_dir.path())?;
        assert_eq!(loaded, model);
        Ok(())
    }

    #[test]
    fn read_rejects_corrupt_model() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        std::fs::write(tmp_dir.path().join(MODEL_FILE_NAME), b"not a model")?;
        assert!(Reconstruction::read_binary(tmp_dir.path()).is_err());
        Ok(())
    }

    #[test]
    fn read_rejects_tampered_rotation() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let mut model = Reconstruction::new();
        model.insert(localized("a.jpg", 0.0)?)?;
        model.write_binary(tmp_dir.path())?;

        // break the rotation inside an otherwise decodable file
        let path = tmp_dir.path().join(MODEL_FILE_NAME);
        let bytes = std::fs::read(&path)?;
        let (mut file, _): (ReconstructionFile, usize) =
            bincode::decode_from_slice(&bytes, bincode::config::standard())?;
        file.images[0].1.r00 = 2.0;
        std::fs::write(
            &path,
            bincode::encode_to_vec(&file, bincode::config::standard())?,
        )?;

        let result = Reconstruction::read_binary(tmp_dir.path());
        assert!(matches!(result, Err(SceneError::InvalidRotation(_))));
        Ok(())
    }

    #[test]
    fn no_partial_file_left_behind() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let mut model = Reconstruction::new();
        model.insert(localized("a.jpg", 0.0)?)?;
        model.write_binary(tmp_dir.path())?;
        assert!(!tmp_dir
            .path()
            .join(format!("{}.part", MODEL_FILE_NAME))
            .exists());
        Ok(())
    }
}
