//! libsql-backed PageRepository
//!
//! Pages are stored one row per page with the node list serialized as JSON
//! text, which keeps the stored shape identical to the serialized `Page`.
//! Single-attribute writes (emoji, caption) go to a separate
//! `node_attributes` table keyed by node id.
//!
//! # Connection pattern
//!
//! Every async method opens its connection with `connect_with_timeout()` so
//! concurrent writers (the debounced syncer and the editor's field writes)
//! wait on the busy timeout instead of failing with `SQLITE_BUSY`.

use crate::config::EditorConfig;
use crate::db::{IdentityProvider, PageRepository, StoreError};
use crate::models::{Node, NodeField, Page};
use anyhow::Context;
use async_trait::async_trait;
use libsql::{Builder, Connection, Database, Row};
use std::path::PathBuf;
use std::sync::Arc;

/// `PageRepository` stored in a local libsql database file
pub struct LibsqlPageStore {
    db: Arc<Database>,
    db_path: PathBuf,
    identity: Arc<dyn IdentityProvider>,
    config: EditorConfig,
}

impl LibsqlPageStore {
    /// Open (or create) the database at `db_path` and initialize the schema
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the parent directory cannot be created, the
    /// connection fails, or schema initialization fails.
    pub async fn new(
        db_path: PathBuf,
        identity: Arc<dyn IdentityProvider>,
        config: EditorConfig,
    ) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db = Builder::new_local(&db_path)
            .build()
            .await
            .map_err(|e| StoreError::connection_failed(db_path.clone(), e))?;

        let store = Self {
            db: Arc::new(db),
            db_path,
            identity,
            config,
        };
        store.initialize_schema().await?;

        tracing::info!("Opened page database at {:?}", store.db_path);
        Ok(store)
    }

    pub fn db_path(&self) -> &PathBuf {
        &self.db_path
    }

    async fn connect_with_timeout(&self) -> Result<Connection, StoreError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| StoreError::sql_execution(format!("Failed to connect: {}", e)))?;
        Self::execute_pragma(&conn, "PRAGMA busy_timeout = 5000").await?;
        Ok(conn)
    }

    /// PRAGMA statements return rows, so they go through query() instead of execute()
    async fn execute_pragma(conn: &Connection, pragma: &str) -> Result<(), StoreError> {
        let mut stmt = conn.prepare(pragma).await.map_err(|e| {
            StoreError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        let _ = stmt.query(()).await.map_err(|e| {
            StoreError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        Ok(())
    }

    async fn initialize_schema(&self) -> Result<(), StoreError> {
        let conn = self.connect_with_timeout().await?;

        Self::execute_pragma(&conn, "PRAGMA journal_mode = WAL").await?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS pages (
                id TEXT PRIMARY KEY,
                slug TEXT NOT NULL,
                title TEXT NOT NULL,
                cover TEXT NOT NULL DEFAULT '',
                nodes JSON NOT NULL DEFAULT '[]',
                created_by TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                modified_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                UNIQUE (created_by, slug)
            )",
            (),
        )
        .await
        .map_err(|e| StoreError::sql_execution(format!("Failed to create pages table: {}", e)))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS node_attributes (
                node_id TEXT NOT NULL,
                field TEXT NOT NULL,
                value TEXT NOT NULL,
                created_by TEXT NOT NULL,
                modified_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                PRIMARY KEY (node_id, field)
            )",
            (),
        )
        .await
        .map_err(|e| {
            StoreError::sql_execution(format!("Failed to create node_attributes table: {}", e))
        })?;

        Ok(())
    }

    fn require_user(&self) -> Result<String, StoreError> {
        self.identity
            .current_user_id()
            .ok_or(StoreError::NotAuthenticated)
    }

    fn row_to_page(row: &Row) -> anyhow::Result<Page> {
        let id: String = row.get(0).context("Failed to get id")?;
        let slug: String = row.get(1).context("Failed to get slug")?;
        let title: String = row.get(2).context("Failed to get title")?;
        let cover: String = row.get(3).context("Failed to get cover")?;
        let nodes_json: String = row.get(4).context("Failed to get nodes")?;

        let nodes: Vec<Node> =
            serde_json::from_str(&nodes_json).context("Failed to parse nodes JSON")?;

        Ok(Page {
            id,
            slug,
            title,
            nodes,
            cover,
        })
    }

    /// Last value written for a node attribute
    pub async fn node_field(&self, node_id: &str, name: &str) -> Result<Option<String>, StoreError> {
        let conn = self.connect_with_timeout().await?;
        let mut stmt = conn
            .prepare("SELECT value FROM node_attributes WHERE node_id = ? AND field = ?")
            .await
            .map_err(|e| {
                StoreError::sql_execution(format!("Failed to prepare node_field query: {}", e))
            })?;
        let mut rows = stmt.query((node_id, name)).await.map_err(|e| {
            StoreError::sql_execution(format!("Failed to execute node_field query: {}", e))
        })?;

        match rows
            .next()
            .await
            .map_err(|e| StoreError::sql_execution(e.to_string()))?
        {
            Some(row) => Ok(Some(row.get(0).context("Failed to get value")?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl PageRepository for LibsqlPageStore {
    async fn create_page(&self) -> Result<Page, StoreError> {
        self.insert_page(Page::scaffold(&self.config)).await
    }

    async fn insert_page(&self, page: Page) -> Result<Page, StoreError> {
        let owner = self.require_user()?;
        if self.fetch_page_by_slug(&page.slug).await?.is_some() {
            return Err(StoreError::page_already_exists(page.slug));
        }

        let nodes_json = serde_json::to_string(&page.nodes)?;
        let conn = self.connect_with_timeout().await?;
        conn.execute(
            "INSERT INTO pages (id, slug, title, cover, nodes, created_by)
             VALUES (?, ?, ?, ?, ?, ?)",
            (
                page.id.as_str(),
                page.slug.as_str(),
                page.title.as_str(),
                page.cover.as_str(),
                nodes_json.as_str(),
                owner.as_str(),
            ),
        )
        .await
        .map_err(|e| StoreError::sql_execution(format!("Failed to insert page: {}", e)))?;

        tracing::debug!("Inserted page {} ({}) for {}", page.id, page.slug, owner);
        Ok(page)
    }

    async fn persist_page(&self, page: &Page) -> Result<(), StoreError> {
        let owner = self.require_user()?;
        let nodes_json = serde_json::to_string(&page.nodes)?;
        let conn = self.connect_with_timeout().await?;

        let updated = conn
            .execute(
                "UPDATE pages
                 SET slug = ?, title = ?, cover = ?, nodes = ?, modified_at = CURRENT_TIMESTAMP
                 WHERE id = ? AND created_by = ?",
                (
                    page.slug.as_str(),
                    page.title.as_str(),
                    page.cover.as_str(),
                    nodes_json.as_str(),
                    page.id.as_str(),
                    owner.as_str(),
                ),
            )
            .await
            .map_err(|e| StoreError::sql_execution(format!("Failed to update page: {}", e)))?;

        if updated == 0 {
            return Err(StoreError::page_not_found(page.slug.clone()));
        }
        Ok(())
    }

    async fn fetch_page_by_slug(&self, slug: &str) -> Result<Option<Page>, StoreError> {
        let owner = self.require_user()?;
        let conn = self.connect_with_timeout().await?;

        let mut stmt = conn
            .prepare(
                "SELECT id, slug, title, cover, nodes
                 FROM pages WHERE slug = ? AND created_by = ?",
            )
            .await
            .map_err(|e| {
                StoreError::sql_execution(format!("Failed to prepare get_page query: {}", e))
            })?;

        let mut rows = stmt.query((slug, owner.as_str())).await.map_err(|e| {
            StoreError::sql_execution(format!("Failed to execute get_page query: {}", e))
        })?;

        match rows
            .next()
            .await
            .map_err(|e| StoreError::sql_execution(e.to_string()))?
        {
            Some(row) => Ok(Some(Self::row_to_page(&row)?)),
            None => Ok(None),
        }
    }

    async fn update_node_field(&self, node_id: &str, field: &NodeField) -> Result<(), StoreError> {
        let owner = self.require_user()?;
        let conn = self.connect_with_timeout().await?;

        conn.execute(
            "INSERT INTO node_attributes (node_id, field, value, created_by)
             VALUES (?, ?, ?, ?)
             ON CONFLICT (node_id, field)
             DO UPDATE SET value = excluded.value, modified_at = CURRENT_TIMESTAMP",
            (node_id, field.name(), field.value(), owner.as_str()),
        )
        .await
        .map_err(|e| {
            StoreError::sql_execution(format!("Failed to update node {}: {}", field.name(), e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::StaticIdentity;
    use crate::models::NodeType;
    use anyhow::Result;
    use tempfile::TempDir;

    async fn create_test_store(user: &str) -> Result<(LibsqlPageStore, TempDir)> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("pages.db");
        let store = LibsqlPageStore::new(
            db_path,
            Arc::new(StaticIdentity::user(user)),
            EditorConfig::default(),
        )
        .await?;
        Ok((store, temp_dir))
    }

    #[tokio::test]
    async fn test_create_and_fetch_page() -> Result<()> {
        let (store, _temp_dir) = create_test_store("u1").await?;

        let page = store.create_page().await?;
        let fetched = store.fetch_page_by_slug(&page.slug).await?;

        assert_eq!(fetched, Some(page));
        assert!(store.fetch_page_by_slug("missing").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_persist_round_trips_nodes() -> Result<()> {
        let (store, _temp_dir) = create_test_store("u1").await?;

        let mut page = store.create_page().await?;
        page.title = "Renamed".to_string();
        page.nodes = vec![
            Node::new(NodeType::Heading1, "Hello"),
            Node::new(NodeType::Image, "abc.png"),
        ];
        store.persist_page(&page).await?;

        let fetched = store.fetch_page_by_slug(&page.slug).await?.unwrap();
        assert_eq!(fetched, page);
        Ok(())
    }

    #[tokio::test]
    async fn test_persist_unknown_page_fails() -> Result<()> {
        let (store, _temp_dir) = create_test_store("u1").await?;
        let page = Page::scaffold(&EditorConfig::default());

        let err = store.persist_page(&page).await.unwrap_err();
        assert!(matches!(err, StoreError::PageNotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_start_page_rejected() -> Result<()> {
        let (store, _temp_dir) = create_test_store("u1").await?;
        let config = EditorConfig::default();

        store.insert_page(Page::start_scaffold(&config)).await?;
        let err = store
            .insert_page(Page::start_scaffold(&config))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::PageAlreadyExists { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_node_field_upsert() -> Result<()> {
        let (store, _temp_dir) = create_test_store("u1").await?;

        store
            .update_node_field("n1", &NodeField::Emoji("📄".to_string()))
            .await?;
        store
            .update_node_field("n1", &NodeField::Emoji("🔥".to_string()))
            .await?;

        assert_eq!(store.node_field("n1", "emoji").await?.as_deref(), Some("🔥"));
        assert_eq!(store.node_field("n1", "caption").await?, None);
        Ok(())
    }
}
