//! Image file storage on local disk.
//!
//! Files are named `<image id>.jpg` under the configured directory. The
//! database row only keeps the file name, never a path.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::authz::ownership::ImageId;

#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("image store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid file name: {0}")]
    InvalidFileName(String),
}

#[derive(Clone, Debug)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_name_for(image_id: ImageId) -> String {
        format!("{image_id}.jpg")
    }

    /// Write `bytes` for `image_id` and return the stored file name.
    pub async fn save(&self, image_id: ImageId, bytes: &[u8]) -> Result<String, ImageStoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let file_name = Self::file_name_for(image_id);
        tokio::fs::write(self.dir.join(&file_name), bytes).await?;

        tracing::debug!(file_name = %file_name, size = bytes.len(), "image stored");
        Ok(file_name)
    }

    /// Remove a stored file. Missing files are not an error.
    pub async fn remove(&self, file_name: &str) -> Result<(), ImageStoreError> {
        // only plain names produced by `file_name_for`
        if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name.starts_with('.') {
            return Err(ImageStoreError::InvalidFileName(file_name.to_string()));
        }

        match tokio::fs::remove_file(self.dir.join(file_name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
