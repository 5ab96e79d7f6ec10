//! Initial page loading
//!
//! Resolves the page to open for a route slug:
//!
//! - no signed-in user: `NotAuthenticated`
//! - the user has a page with this slug: that page
//! - the slug is the start slug and the page is missing: the start page is
//!   scaffolded, stored, and returned
//! - otherwise: `PageNotFound`
//!
//! An empty slug (the root route) resolves to the start slug.

use crate::config::EditorConfig;
use crate::db::{IdentityProvider, PageRepository};
use crate::models::Page;
use crate::services::PageServiceError;

pub async fn load_initial_page(
    repository: &dyn PageRepository,
    identity: &dyn IdentityProvider,
    slug: &str,
    config: &EditorConfig,
) -> Result<Page, PageServiceError> {
    let slug = if slug.is_empty() {
        config.start_slug.as_str()
    } else {
        slug
    };

    let Some(user_id) = identity.current_user_id() else {
        tracing::warn!("Cannot load page '{}': user is not logged in", slug);
        return Err(PageServiceError::NotAuthenticated);
    };

    if let Some(page) = repository.fetch_page_by_slug(slug).await? {
        tracing::debug!("Loaded page {} ({}) for {}", page.id, slug, user_id);
        return Ok(page);
    }

    if slug == config.start_slug {
        tracing::info!("Scaffolding start page for {}", user_id);
        let page = repository
            .insert_page(Page::start_scaffold(config))
            .await?;
        return Ok(page);
    }

    Err(PageServiceError::page_not_found(slug))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{InMemoryPageStore, StaticIdentity};
    use std::sync::Arc;

    fn setup(user: Option<&str>) -> (InMemoryPageStore, StaticIdentity) {
        let identity = user.map(StaticIdentity::user).unwrap_or_default();
        let store = InMemoryPageStore::new(Arc::new(identity.clone()), EditorConfig::default());
        (store, identity)
    }

    #[tokio::test]
    async fn test_requires_user() {
        let (store, identity) = setup(None);
        let err = load_initial_page(&store, &identity, "start", &EditorConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PageServiceError::NotAuthenticated));
    }

    #[tokio::test]
    async fn test_start_page_is_scaffolded_once() {
        let (store, identity) = setup(Some("u1"));
        let config = EditorConfig::default();

        let first = load_initial_page(&store, &identity, "start", &config)
            .await
            .unwrap();
        let second = load_initial_page(&store, &identity, "", &config)
            .await
            .unwrap();

        assert_eq!(first.slug, "start");
        assert!(!first.nodes.is_empty());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_existing_page_is_returned() {
        let (store, identity) = setup(Some("u1"));
        let created = store.create_page().await.unwrap();

        let loaded = load_initial_page(&store, &identity, &created.slug, &EditorConfig::default())
            .await
            .unwrap();
        assert_eq!(loaded, created);
    }

    #[tokio::test]
    async fn test_unknown_slug_is_not_found() {
        let (store, identity) = setup(Some("u1"));
        let err = load_initial_page(&store, &identity, "nope", &EditorConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PageServiceError::PageNotFound { slug } if slug == "nope"));
    }
}
