//! Page (document) structure
//!
//! A page is an ordered sequence of nodes plus a little metadata. Node order in
//! `nodes` is the sole source of truth for render order and for every
//! index-based operation; nodes never store their own index.

use crate::config::EditorConfig;
use crate::models::{Node, NodeType, ValidationError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;
use uuid::Uuid;

// URL-safe slug: letters, digits, dash and underscore
const SLUG_PATTERN: &str = r"^[A-Za-z0-9_-]+$";

fn slug_regex() -> &'static Regex {
    static SLUG_REGEX: OnceLock<Regex> = OnceLock::new();
    SLUG_REGEX.get_or_init(|| Regex::new(SLUG_PATTERN).expect("slug pattern is valid"))
}

/// Check whether a string can be used as a page slug
///
/// # Examples
///
/// ```rust
/// # use pageblocks_core::models::is_valid_slug;
/// assert!(is_valid_slug("start"));
/// assert!(is_valid_slug("V1StGXR8_Z5jdHi6B-myT"));
/// assert!(!is_valid_slug("has space"));
/// assert!(!is_valid_slug(""));
/// ```
pub fn is_valid_slug(slug: &str) -> bool {
    slug_regex().is_match(slug)
}

/// A document: metadata plus its ordered block list.
///
/// Serialized field-for-field; this is the shape handed to
/// [`PageRepository::persist_page`](crate::db::PageRepository::persist_page).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,

    /// Used to build the URL of the page and to reference it from `page` nodes
    pub slug: String,

    pub title: String,

    /// Ordered blocks
    #[serde(default)]
    pub nodes: Vec<Node>,

    /// Storage path of the cover image
    #[serde(default)]
    pub cover: String,
}

impl Page {
    /// Create a fresh, empty page with generated id and slug
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use pageblocks_core::{EditorConfig, models::Page};
    /// let page = Page::scaffold(&EditorConfig::default());
    /// assert_eq!(page.title, "Untitled");
    /// assert!(page.nodes.is_empty());
    /// ```
    pub fn scaffold(config: &EditorConfig) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            slug: Uuid::new_v4().simple().to_string(),
            title: config.default_title.clone(),
            nodes: Vec::new(),
            cover: config.default_cover.clone(),
        }
    }

    /// Page inserted the first time a user opens the start slug
    pub fn start_scaffold(config: &EditorConfig) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            slug: config.start_slug.clone(),
            title: "Getting started".to_string(),
            nodes: vec![
                Node::new(NodeType::Heading1, "Welcome"),
                Node::new(
                    NodeType::Text,
                    "Click a block to edit it. Type / to change its type.",
                ),
                Node::new(NodeType::List, "Enter splits a block at the caret"),
                Node::new(NodeType::List, "Backspace at the start merges with the block above"),
            ],
            cover: config.default_cover.clone(),
        }
    }

    /// Validate page structure
    ///
    /// # Errors
    ///
    /// - `MissingField` if `id` is empty
    /// - `InvalidSlug` if the slug is not URL-safe
    /// - `DuplicateNodeId` if two nodes share an id
    /// - any error from [`Node::validate`]
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::MissingField("id".to_string()));
        }

        if !is_valid_slug(&self.slug) {
            return Err(ValidationError::InvalidSlug(self.slug.clone()));
        }

        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            node.validate()?;
            if !seen.insert(node.id.as_str()) {
                return Err(ValidationError::DuplicateNodeId(node.id.clone()));
            }
        }

        Ok(())
    }

    /// Position of the node with `id`, if present
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == id)
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node ids in render order
    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|node| node.id.as_str()).collect()
    }
}
