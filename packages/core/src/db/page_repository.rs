//! PageRepository Trait - Persistence Boundary
//!
//! This module defines the `PageRepository` trait the editor core uses for
//! every remote read and write. The core never talks to a database directly:
//! `PageState` creates child pages and writes node attributes through it, and
//! `PageSyncer` hands it debounced page snapshots.
//!
//! # Design Decisions
//!
//! 1. **Async-First**: All methods are async so network and embedded backends fit
//! 2. **User-Scoped**: Implementations resolve the current user themselves and
//!    fail with `StoreError::NotAuthenticated` when there is none
//! 3. **Last Write Wins**: `persist_page` overwrites the whole stored page
//!
//! # Examples
//!
//! ```rust,no_run
//! use pageblocks_core::db::{InMemoryPageStore, PageRepository, StaticIdentity};
//! use pageblocks_core::EditorConfig;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store: Arc<dyn PageRepository> = Arc::new(InMemoryPageStore::new(
//!         Arc::new(StaticIdentity::user("user-1")),
//!         EditorConfig::default(),
//!     ));
//!
//!     let page = store.create_page().await?;
//!     let fetched = store.fetch_page_by_slug(&page.slug).await?;
//!     assert_eq!(fetched, Some(page));
//!     Ok(())
//! }
//! ```

use crate::db::StoreError;
use crate::models::{NodeField, Page};
use async_trait::async_trait;

/// Abstraction over page persistence
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`: the debounced persistence task holds
/// a shared handle on a different task than the editor.
#[async_trait]
pub trait PageRepository: Send + Sync {
    /// Create and store a fresh, empty page owned by the current user
    ///
    /// Used when a node is switched to the `page` type; the new page's slug
    /// becomes the node's value.
    ///
    /// # Errors
    ///
    /// - `NotAuthenticated` when no user is signed in
    /// - backend errors
    async fn create_page(&self) -> Result<Page, StoreError>;

    /// Store a fully formed page (the first-visit start page)
    ///
    /// # Errors
    ///
    /// - `NotAuthenticated` when no user is signed in
    /// - `PageAlreadyExists` if the user already has a page with this slug
    async fn insert_page(&self, page: Page) -> Result<Page, StoreError>;

    /// Overwrite the stored copy of `page`, matched by id and owner
    ///
    /// # Errors
    ///
    /// - `NotAuthenticated` when no user is signed in
    /// - `PageNotFound` if the current user owns no page with this id
    async fn persist_page(&self, page: &Page) -> Result<(), StoreError>;

    /// Look up one of the current user's pages by slug
    ///
    /// Returns `Ok(None)` when the user has no page with this slug.
    async fn fetch_page_by_slug(&self, slug: &str) -> Result<Option<Page>, StoreError>;

    /// Persist a single node attribute keyed by node id
    ///
    /// Emoji and caption edits go through here immediately instead of
    /// waiting for the debounced page write.
    async fn update_node_field(&self, node_id: &str, field: &NodeField) -> Result<(), StoreError>;
}
