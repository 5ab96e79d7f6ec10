//! Service Layer Error Types
//!
//! Errors surfaced by `PageState` and page loading. Persistence failures of
//! the debounced page write are deliberately absent: those are logged and
//! published as events, never returned.

use crate::db::StoreError;
use crate::models::ValidationError;
use crate::operations::MutationError;
use thiserror::Error;

/// Page service errors
#[derive(Error, Debug)]
pub enum PageServiceError {
    /// The requested mutation does not fit the current page
    #[error("Page mutation failed: {0}")]
    Mutation(#[from] MutationError),

    /// Validation failed for a page or node
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// An external call the operation depends on failed; nothing was changed
    #[error("{operation} failed: {source}")]
    DependencyFailed {
        operation: &'static str,
        source: StoreError,
    },

    /// No page with this slug exists for the current user
    #[error("Page not found: {slug}")]
    PageNotFound { slug: String },

    /// Loading a page requires a signed-in user
    #[error("User is not logged in")]
    NotAuthenticated,

    /// Store operation failed
    #[error("Store operation failed: {0}")]
    Store(#[from] StoreError),
}

impl PageServiceError {
    /// Create a DependencyFailed error
    pub fn dependency_failed(operation: &'static str, source: StoreError) -> Self {
        Self::DependencyFailed { operation, source }
    }

    /// Create a PageNotFound error
    pub fn page_not_found(slug: impl Into<String>) -> Self {
        Self::PageNotFound { slug: slug.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_failed_message() {
        let err = PageServiceError::dependency_failed("create_page", StoreError::NotAuthenticated);
        assert_eq!(err.to_string(), "create_page failed: No authenticated user");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_mutation_error_converts() {
        let err: PageServiceError = MutationError::index_out_of_bounds(1, 0).into();
        assert!(matches!(
            err,
            PageServiceError::Mutation(MutationError::IndexOutOfBounds { index: 1, len: 0 })
        ));
    }
}
