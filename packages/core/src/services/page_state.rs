//! Synced Page State
//!
//! `PageState` is the single source of truth for the page being edited. Every
//! operation is turned into a [`PageMutation`], applied copy-on-write to the
//! current snapshot, and the new snapshot is:
//!
//! - swapped in as the current `Arc<Page>` (older snapshots never change)
//! - forwarded to the [`PageSyncer`] for debounced persistence
//! - published as [`PageEvent::Changed`]
//!
//! Constructing a `PageState` does not persist the initial page; only
//! committed mutations reach the repository.
//!
//! # Examples
//!
//! ```rust,no_run
//! use pageblocks_core::db::{InMemoryPageStore, PageRepository, StaticIdentity};
//! use pageblocks_core::models::{Node, NodeType};
//! use pageblocks_core::services::PageState;
//! use pageblocks_core::EditorConfig;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = EditorConfig::default();
//!     let store = Arc::new(InMemoryPageStore::new(
//!         Arc::new(StaticIdentity::user("user-1")),
//!         config.clone(),
//!     ));
//!     let page = store.create_page().await?;
//!
//!     let mut state = PageState::new(page, store, &config);
//!     state.add_node(Node::new(NodeType::Text, "Hello"), 0)?;
//!     state.change_node_type(0, NodeType::Heading1).await?;
//!
//!     assert_eq!(state.nodes()[0].node_type, NodeType::Heading1);
//!     assert_eq!(state.nodes()[0].value, "");
//!     state.shutdown().await;
//!     Ok(())
//! }
//! ```

use crate::config::EditorConfig;
use crate::db::PageRepository;
use crate::models::{Node, NodeField, NodeType, Page};
use crate::operations::{MutationError, PageMutation};
use crate::services::{PageEvent, PageServiceError, PageSyncer, SyncStats};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Result of a committed operation: the new snapshot
pub type PageResult = Result<Arc<Page>, PageServiceError>;

/// Authoritative, persisted-in-the-background page state
pub struct PageState {
    page: Arc<Page>,
    repository: Arc<dyn PageRepository>,
    syncer: PageSyncer,
    events: broadcast::Sender<PageEvent>,
}

impl PageState {
    /// Wrap `initial` and start its debounced persistence task
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(initial: Page, repository: Arc<dyn PageRepository>, config: &EditorConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_channel_capacity);
        let syncer = PageSyncer::spawn(repository.clone(), config.persist_debounce(), events.clone());

        tracing::info!(
            "Editing page {} ({}) with {} nodes",
            initial.id,
            initial.slug,
            initial.nodes.len()
        );

        Self {
            page: Arc::new(initial),
            repository,
            syncer,
            events,
        }
    }

    fn commit(&mut self, mutation: PageMutation) -> PageResult {
        let kind = mutation.kind();
        let next = Arc::new(mutation.apply(&self.page)?);

        tracing::debug!("Committed {} on page {}", kind, next.id);
        self.page = next.clone();
        self.syncer.notify(next.clone());
        let _ = self.events.send(PageEvent::Changed {
            mutation: kind,
            page: next.clone(),
        });

        Ok(next)
    }

    fn require_index(&self, index: usize) -> Result<(), PageServiceError> {
        if index < self.page.nodes.len() {
            Ok(())
        } else {
            Err(MutationError::index_out_of_bounds(index, self.page.nodes.len()).into())
        }
    }

    //
    // STRUCTURAL OPERATIONS
    //

    /// Insert `node` at `index`; `index == len` appends
    pub fn add_node(&mut self, node: Node, index: usize) -> PageResult {
        self.commit(PageMutation::AddNode { node, index })
    }

    /// Delete the node at `index`
    pub fn remove_node_by_index(&mut self, index: usize) -> PageResult {
        self.commit(PageMutation::RemoveNodeByIndex { index })
    }

    /// Replace the value of the node at `index`, keeping its type
    pub fn change_node_value(&mut self, index: usize, value: impl Into<String>) -> PageResult {
        self.commit(PageMutation::ChangeNodeValue {
            index,
            value: value.into(),
        })
    }

    /// Switch the type of the node at `index`
    ///
    /// Switching to `page` first creates a child page through the repository
    /// and stores its slug as the node value. If that call fails the node is
    /// left untouched and `DependencyFailed` is returned. Every other type
    /// change clears the value to `""` immediately.
    pub async fn change_node_type(&mut self, index: usize, node_type: NodeType) -> PageResult {
        self.require_index(index)?;

        let value = if node_type == NodeType::Page {
            let child = self.repository.create_page().await.map_err(|e| {
                tracing::error!("Failed to create child page for node {}: {}", index, e);
                PageServiceError::dependency_failed("create_page", e)
            })?;
            tracing::info!("Created child page {} for node {}", child.slug, index);
            child.slug
        } else {
            String::new()
        };

        self.commit(PageMutation::SetNodeType {
            index,
            node_type,
            value,
        })
    }

    pub fn set_nodes(&mut self, nodes: Vec<Node>) -> PageResult {
        self.commit(PageMutation::SetNodes(nodes))
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> PageResult {
        self.commit(PageMutation::SetTitle(title.into()))
    }

    pub fn set_cover_image(&mut self, cover: impl Into<String>) -> PageResult {
        self.commit(PageMutation::SetCoverImage(cover.into()))
    }

    /// Move the node with `id1` to the position currently held by `id2`
    pub fn reorder_nodes(&mut self, id1: &str, id2: &str) -> PageResult {
        self.commit(PageMutation::ReorderNodes {
            moved_id: id1.to_string(),
            target_id: id2.to_string(),
        })
    }

    //
    // NODE ATTRIBUTES
    //

    /// Set the emoji of the node at `index` and write it through immediately
    ///
    /// The local change always sticks. A failed remote write is logged and
    /// published as `FieldPersistFailed`, never returned.
    pub async fn set_emoji(&mut self, index: usize, emoji: impl Into<String>) -> PageResult {
        let emoji = emoji.into();
        let snapshot = self.commit(PageMutation::SetEmoji {
            index,
            emoji: emoji.clone(),
        })?;

        let node_id = snapshot.nodes[index].id.clone();
        self.persist_field(&node_id, NodeField::Emoji(emoji)).await;
        Ok(snapshot)
    }

    /// Set the caption of the node with `node_id` and write it through immediately
    ///
    /// An empty `node_id` is logged and ignored without touching the page or
    /// the repository.
    pub async fn update_node_caption_in_database(
        &mut self,
        node_id: &str,
        caption: impl Into<String>,
    ) -> PageResult {
        if node_id.is_empty() {
            tracing::error!("Invalid node ID for caption update: {:?}", node_id);
            return Ok(self.snapshot());
        }

        let caption = caption.into();
        let snapshot = self.commit(PageMutation::SetCaption {
            node_id: node_id.to_string(),
            caption: caption.clone(),
        })?;

        self.persist_field(node_id, NodeField::Caption(caption)).await;
        Ok(snapshot)
    }

    async fn persist_field(&self, node_id: &str, field: NodeField) {
        if node_id.is_empty() {
            tracing::error!("Invalid node ID: {:?}, skipping {} update", node_id, field.name());
            return;
        }

        if let Err(e) = self.repository.update_node_field(node_id, &field).await {
            tracing::error!("Error updating {} of node {}: {}", field.name(), node_id, e);
            let _ = self.events.send(PageEvent::FieldPersistFailed {
                node_id: node_id.to_string(),
                field: field.name(),
                error: e.to_string(),
            });
        } else {
            tracing::debug!("Updated {} of node {}", field.name(), node_id);
        }
    }

    //
    // READ ACCESS
    //

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<Page> {
        self.page.clone()
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn nodes(&self) -> &[Node] {
        &self.page.nodes
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.page.nodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.page.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.page.nodes.is_empty()
    }

    pub fn title(&self) -> &str {
        &self.page.title
    }

    pub fn cover(&self) -> &str {
        &self.page.cover
    }

    /// Subscribe to change and persistence events
    pub fn subscribe(&self) -> broadcast::Receiver<PageEvent> {
        self.events.subscribe()
    }

    /// Flush any pending snapshot and stop the persistence task
    pub async fn shutdown(self) -> SyncStats {
        self.syncer.shutdown().await
    }
}

#[cfg(test)]
#[path = "page_state_test.rs"]
mod page_state_test;
