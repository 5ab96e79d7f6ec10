use crate::db::StoreError;
use crate::services::PageServiceError;
use thiserror::Error;

/// Errors surfaced by [`EditorSession`](crate::editor::EditorSession)
#[derive(Error, Debug)]
pub enum EditorError {
    #[error(transparent)]
    Service(#[from] PageServiceError),

    #[error("No block has focus")]
    NoFocusedNode,

    #[error("Unknown command entry: {0}")]
    UnknownCommand(usize),

    #[error("Please select a valid image file.")]
    InvalidImage { mime_type: Option<String> },

    #[error("Image upload failed: {0}")]
    Upload(StoreError),
}

impl EditorError {
    pub fn invalid_image(mime_type: Option<String>) -> Self {
        Self::InvalidImage { mime_type }
    }
}
