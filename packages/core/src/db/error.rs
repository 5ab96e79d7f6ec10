//! Store Error Types
//!
//! Errors raised by the external-collaborator boundaries (page repository,
//! asset store) and their reference adapters.

use thiserror::Error;

/// Page repository and asset store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// The identity provider reports no signed-in user
    #[error("No authenticated user")]
    NotAuthenticated,

    /// No page with this slug is visible to the current user
    #[error("Page not found: {slug}")]
    PageNotFound { slug: String },

    /// A page with this id or slug already exists for the current user
    #[error("Page already exists: {slug}")]
    PageAlreadyExists { slug: String },

    /// Upload was invoked without a file
    #[error("You must select an image to upload")]
    MissingFile,

    /// Storage backend rejected the upload
    #[error("Failed to upload image: {0}")]
    UploadFailed(String),

    /// Requested asset does not exist
    #[error("Asset not found: {path}")]
    AssetNotFound { path: String },

    /// Backend is unreachable or refused the request
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Failed to open the database
    #[cfg(feature = "libsql")]
    #[error("Failed to connect to database at {path}: {source}")]
    ConnectionFailed {
        path: std::path::PathBuf,
        source: libsql::Error,
    },

    /// SQL execution error with context
    #[error("SQL execution failed: {context}")]
    SqlExecution { context: String },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    /// Create a PageNotFound error
    pub fn page_not_found(slug: impl Into<String>) -> Self {
        Self::PageNotFound { slug: slug.into() }
    }

    /// Create a PageAlreadyExists error
    pub fn page_already_exists(slug: impl Into<String>) -> Self {
        Self::PageAlreadyExists { slug: slug.into() }
    }

    /// Create an AssetNotFound error
    pub fn asset_not_found(path: impl Into<String>) -> Self {
        Self::AssetNotFound { path: path.into() }
    }

    /// Create an Unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a SQL execution error with context
    pub fn sql_execution(context: impl Into<String>) -> Self {
        Self::SqlExecution {
            context: context.into(),
        }
    }

    /// Create a ConnectionFailed error
    #[cfg(feature = "libsql")]
    pub fn connection_failed(path: std::path::PathBuf, source: libsql::Error) -> Self {
        Self::ConnectionFailed { path, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            StoreError::page_not_found("child").to_string(),
            "Page not found: child"
        );
        assert_eq!(
            StoreError::MissingFile.to_string(),
            "You must select an image to upload"
        );
        assert_eq!(
            StoreError::sql_execution("boom").to_string(),
            "SQL execution failed: boom"
        );
    }

    #[test]
    fn test_anyhow_is_transparent() {
        let err: StoreError = anyhow::anyhow!("Failed to get nodes").into();
        assert_eq!(err.to_string(), "Failed to get nodes");
    }
}
