//! Writing rendered frames to disk.

use std::path::{Path, PathBuf};
use storygen_core::{ImageDataUri, Scene};
use storygen_error::{StorageError, StorageErrorKind, StorygenResult};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Outcome of exporting a whole storyboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// Files written, in scene order
    pub written: Vec<PathBuf>,
    /// Scene numbers skipped because they had no image
    pub skipped: Vec<u32>,
}

/// Writes scene images into a directory.
///
/// Each file is written to a temporary name first and renamed into place, so
/// readers never observe a partial PNG.
#[derive(Debug, Clone)]
pub struct ImageExporter {
    dir: PathBuf,
}

impl ImageExporter {
    /// Exporter targeting `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Export one scene's image as `storyboard-scene-<n>.png`.
    ///
    /// # Errors
    ///
    /// Fails with [`StorageErrorKind::NoImage`] when the scene has no image,
    /// or when the payload cannot be decoded or written.
    #[instrument(skip(self, scene), fields(scene = scene.scene_number, dir = %self.dir.display()))]
    pub async fn export_scene(&self, scene: &Scene) -> StorygenResult<PathBuf> {
        let image = scene
            .generated_image_url
            .as_ref()
            .ok_or_else(|| StorageError::new(StorageErrorKind::NoImage(scene.scene_number)))?;
        self.export_image(&scene.export_file_name(), image).await
    }

    /// Decode `image` and write it as `file_name` inside the target directory.
    #[instrument(skip(self, image), fields(dir = %self.dir.display()))]
    pub async fn export_image(&self, file_name: &str, image: &ImageDataUri) -> StorygenResult<PathBuf> {
        let bytes = image.decode()?;

        let path = self.dir.join(file_name);
        self.write_atomic(&path, &bytes).await?;

        info!(path = %path.display(), size = bytes.len(), "Exported image");
        Ok(path)
    }

    /// Export every scene that has an image; scenes without one are skipped.
    #[instrument(skip(self, scenes), fields(scenes = scenes.len()))]
    pub async fn export_all(&self, scenes: &[Scene]) -> StorygenResult<ExportReport> {
        let mut report = ExportReport::default();
        for scene in scenes {
            if scene.has_image() {
                report.written.push(self.export_scene(scene).await?);
            } else {
                debug!(scene = scene.scene_number, "No image to export");
                report.skipped.push(scene.scene_number);
            }
        }

        if !report.skipped.is_empty() {
            warn!(skipped = ?report.skipped, "Some scenes had no image to export");
        }
        Ok(report)
    }

    async fn write_atomic(&self, path: &Path, data: &[u8]) -> StorygenResult<()> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                self.dir.display(),
                e
            )))
        })?;

        let temp_path = self.dir.join(format!(".{}.tmp", Uuid::new_v4().simple()));
        tokio::fs::write(&temp_path, data).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        if let Err(e) = tokio::fs::rename(&temp_path, path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
            .into());
        }
        Ok(())
    }
}
