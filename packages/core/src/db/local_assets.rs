//! Directory-backed AssetStore

use crate::db::{AssetStore, ImageFile, StoreError, UploadedImage};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

/// Stores uploaded images as files under a root directory
///
/// Uploaded files get a random name that keeps the original extension; the
/// returned `file_path` is relative to the root.
#[derive(Debug, Clone)]
pub struct LocalAssetStore {
    root: PathBuf,
}

impl LocalAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if path.is_empty() || escapes {
            return Err(StoreError::asset_not_found(path));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn upload_image(&self, file: Option<ImageFile>) -> Result<UploadedImage, StoreError> {
        let file = file.ok_or(StoreError::MissingFile)?;

        let file_name = format!("{}.{}", Uuid::new_v4().simple(), file.extension());
        let file_path = file_name.clone();

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StoreError::UploadFailed(e.to_string()))?;
        tokio::fs::write(self.root.join(&file_path), &file.bytes)
            .await
            .map_err(|e| StoreError::UploadFailed(e.to_string()))?;

        tracing::debug!("Stored {} ({} bytes) as {}", file.name, file.bytes.len(), file_path);
        Ok(UploadedImage {
            file_path,
            file_name,
        })
    }

    async fn download_image(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        let full_path = self.resolve(path)?;
        match tokio::fs::read(&full_path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::asset_not_found(path))
            }
            Err(e) => Err(e.into()),
        }
    }
}
