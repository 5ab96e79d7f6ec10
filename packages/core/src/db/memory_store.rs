//! In-memory PageRepository
//!
//! Reference adapter backed by two maps behind tokio `RwLock`s. Used by the
//! test suites and by the dev tool when no database path is configured.

use crate::config::EditorConfig;
use crate::db::{IdentityProvider, PageRepository, StoreError};
use crate::models::{NodeField, Page};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct StoredPage {
    owner: String,
    page: Page,
}

/// `PageRepository` that keeps everything in process memory
pub struct InMemoryPageStore {
    identity: Arc<dyn IdentityProvider>,
    config: EditorConfig,
    /// Keyed by page id
    pages: RwLock<HashMap<String, StoredPage>>,
    /// node id -> field name -> value
    node_fields: RwLock<HashMap<String, HashMap<&'static str, String>>>,
    persist_count: AtomicUsize,
}

impl InMemoryPageStore {
    pub fn new(identity: Arc<dyn IdentityProvider>, config: EditorConfig) -> Self {
        Self {
            identity,
            config,
            pages: RwLock::new(HashMap::new()),
            node_fields: RwLock::new(HashMap::new()),
            persist_count: AtomicUsize::new(0),
        }
    }

    fn require_user(&self) -> Result<String, StoreError> {
        self.identity
            .current_user_id()
            .ok_or(StoreError::NotAuthenticated)
    }

    /// Stored copy of a page by id, regardless of owner
    pub async fn page_by_id(&self, id: &str) -> Option<Page> {
        self.pages.read().await.get(id).map(|stored| stored.page.clone())
    }

    /// Number of successful `persist_page` calls
    pub fn persisted_count(&self) -> usize {
        self.persist_count.load(Ordering::SeqCst)
    }

    /// Last value written for a node attribute
    pub async fn node_field(&self, node_id: &str, name: &str) -> Option<String> {
        self.node_fields
            .read()
            .await
            .get(node_id)
            .and_then(|fields| fields.get(name).cloned())
    }
}

#[async_trait]
impl PageRepository for InMemoryPageStore {
    async fn create_page(&self) -> Result<Page, StoreError> {
        self.insert_page(Page::scaffold(&self.config)).await
    }

    async fn insert_page(&self, page: Page) -> Result<Page, StoreError> {
        let owner = self.require_user()?;
        let mut pages = self.pages.write().await;

        let taken = pages.contains_key(&page.id)
            || pages
                .values()
                .any(|stored| stored.owner == owner && stored.page.slug == page.slug);
        if taken {
            return Err(StoreError::page_already_exists(page.slug));
        }

        tracing::debug!("Inserted page {} ({}) for {}", page.id, page.slug, owner);
        pages.insert(
            page.id.clone(),
            StoredPage {
                owner,
                page: page.clone(),
            },
        );
        Ok(page)
    }

    async fn persist_page(&self, page: &Page) -> Result<(), StoreError> {
        let owner = self.require_user()?;
        let mut pages = self.pages.write().await;

        match pages.get_mut(&page.id) {
            Some(stored) if stored.owner == owner => {
                stored.page = page.clone();
                self.persist_count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            _ => Err(StoreError::page_not_found(page.slug.clone())),
        }
    }

    async fn fetch_page_by_slug(&self, slug: &str) -> Result<Option<Page>, StoreError> {
        let owner = self.require_user()?;
        let pages = self.pages.read().await;

        Ok(pages
            .values()
            .find(|stored| stored.owner == owner && stored.page.slug == slug)
            .map(|stored| stored.page.clone()))
    }

    async fn update_node_field(&self, node_id: &str, field: &NodeField) -> Result<(), StoreError> {
        self.require_user()?;
        self.node_fields
            .write()
            .await
            .entry(node_id.to_string())
            .or_default()
            .insert(field.name(), field.value().to_string());
        Ok(())
    }
}
