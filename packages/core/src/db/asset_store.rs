//! Binary asset storage boundary
//!
//! Image blocks store a storage path in their value. Uploading and reading the
//! bytes behind that path happens through an `AssetStore`.

use crate::db::StoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A file chosen by the user in the host's file picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// Original file name, including extension
    pub name: String,

    /// Declared MIME type (`image/png`, ...)
    pub mime_type: String,

    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Whether the declared MIME type is an image type
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use pageblocks_core::db::ImageFile;
    /// assert!(ImageFile::new("a.png", "image/png", vec![]).is_image());
    /// assert!(!ImageFile::new("a.pdf", "application/pdf", vec![]).is_image());
    /// ```
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Text after the last `.` of the name (the whole name when there is no dot)
    pub fn extension(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// Where an uploaded file ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    /// Storage path; this is what an image node stores as its value
    pub file_path: String,

    /// Generated file name
    pub file_name: String,
}

/// Abstraction over binary asset storage
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store an image under a freshly generated name
    ///
    /// # Errors
    ///
    /// - `MissingFile` when `file` is `None`
    /// - `UploadFailed` when the backend rejects the upload
    async fn upload_image(&self, file: Option<ImageFile>) -> Result<UploadedImage, StoreError>;

    /// Read the bytes stored at `path`
    async fn download_image(&self, path: &str) -> Result<Vec<u8>, StoreError>;
}
