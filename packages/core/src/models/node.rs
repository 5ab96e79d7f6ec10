//! Node Data Structures
//!
//! This module defines the `Node` struct (one content block of a page) and the
//! closed `NodeType` enumeration that selects which edit behavior governs it.
//!
//! # Architecture
//!
//! - **Typed blocks**: Every node carries exactly one `NodeType`
//! - **String value**: `value` is always a string; `""` is the canonical empty state
//! - **Stable ids**: Ids are assigned at creation (UUID v4) and never reused
//! - **Field-for-field JSON**: The serialized shape is the persisted shape
//!
//! # Examples
//!
//! ```rust
//! use pageblocks_core::models::{Node, NodeType};
//!
//! // Create a paragraph
//! let paragraph = Node::new(NodeType::Text, "My first note");
//!
//! // Create an empty heading (what Enter produces)
//! let heading = Node::empty(NodeType::Heading1);
//! assert!(heading.value.is_empty());
//! assert_ne!(paragraph.id, heading.id);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Validation errors for Node and Page structures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid node type: {0}")]
    InvalidNodeType(String),

    #[error("Invalid node ID format: {0}")]
    InvalidId(String),

    #[error("Duplicate node id in page: {0}")]
    DuplicateNodeId(String),

    #[error("Invalid slug: {0}")]
    InvalidSlug(String),
}

/// Closed set of block types a node can have.
///
/// Serialized with the exact names used by the persisted page format
/// (`"text"`, `"heading1"`, `"numberedList"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    Text,
    Heading1,
    Heading2,
    Heading3,
    List,
    NumberedList,
    Page,
    Image,
}

impl NodeType {
    /// All node types, in declaration order
    pub const ALL: [NodeType; 8] = [
        NodeType::Text,
        NodeType::Heading1,
        NodeType::Heading2,
        NodeType::Heading3,
        NodeType::List,
        NodeType::NumberedList,
        NodeType::Page,
        NodeType::Image,
    ];

    /// Wire name of the type (same string serde produces)
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Text => "text",
            NodeType::Heading1 => "heading1",
            NodeType::Heading2 => "heading2",
            NodeType::Heading3 => "heading3",
            NodeType::List => "list",
            NodeType::NumberedList => "numberedList",
            NodeType::Page => "page",
            NodeType::Image => "image",
        }
    }

    /// Human readable label shown in the command panel
    pub fn display_name(&self) -> &'static str {
        match self {
            NodeType::Text => "Text",
            NodeType::Heading1 => "Heading 1",
            NodeType::Heading2 => "Heading 2",
            NodeType::Heading3 => "Heading 3",
            NodeType::List => "Bulleted List",
            NodeType::NumberedList => "Numbered List",
            NodeType::Page => "Page",
            NodeType::Image => "Image",
        }
    }

    /// Whether the node's `value` is editable text (as opposed to a slug or storage path)
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use pageblocks_core::models::NodeType;
    /// assert!(NodeType::NumberedList.is_text_like());
    /// assert!(!NodeType::Image.is_text_like());
    /// ```
    pub fn is_text_like(&self) -> bool {
        !matches!(self, NodeType::Page | NodeType::Image)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::ALL
            .iter()
            .copied()
            .find(|node_type| node_type.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidNodeType(s.to_string()))
    }
}

/// One content block of a page.
///
/// # Fields
///
/// - `id`: Unique identifier within the page (UUID v4 for nodes created by the editor)
/// - `node_type`: Block type, serialized under the `type` key
/// - `value`: Text for text-like types, a slug for `page`, a storage path for `image`
/// - `caption`, `emoji`, `width`, `height`: Optional attributes for page/image blocks
///
/// Nodes carry no index: their position in `Page::nodes` is their order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique, stable identifier
    pub id: String,

    /// Block type
    #[serde(rename = "type")]
    pub node_type: NodeType,

    /// Primary content of the block
    #[serde(default)]
    pub value: String,

    /// Caption shown under image blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    /// Icon shown next to page blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl Node {
    /// Create a new Node with an auto-generated UUID
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use pageblocks_core::models::{Node, NodeType};
    /// let node = Node::new(NodeType::List, "Buy milk");
    /// assert_eq!(node.value, "Buy milk");
    /// assert_eq!(node.node_type, NodeType::List);
    /// ```
    pub fn new(node_type: NodeType, value: impl Into<String>) -> Self {
        Self::new_with_id(Uuid::new_v4().to_string(), node_type, value)
    }

    /// Create a new Node with an explicit id (scaffolds, fixtures, imports)
    pub fn new_with_id(id: impl Into<String>, node_type: NodeType, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type,
            value: value.into(),
            caption: None,
            emoji: None,
            width: None,
            height: None,
        }
    }

    /// Create an empty node of the given type with a fresh id
    pub fn empty(node_type: NodeType) -> Self {
        Self::new(node_type, String::new())
    }

    /// Validate node structure
    ///
    /// Empty `value` is valid: blank blocks exist while the user is typing.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingField` if `id` is empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::MissingField("id".to_string()));
        }
        Ok(())
    }

    /// Whether the node has no content yet
    pub fn is_blank(&self) -> bool {
        self.value.is_empty()
    }
}

/// A single-row attribute update persisted by node id.
///
/// Emoji and caption edits bypass the debounced page write and go straight to
/// the repository as one small update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum NodeField {
    Emoji(String),
    Caption(String),
}

impl NodeField {
    /// Column / property name of the field
    pub fn name(&self) -> &'static str {
        match self {
            NodeField::Emoji(_) => "emoji",
            NodeField::Caption(_) => "caption",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            NodeField::Emoji(value) | NodeField::Caption(value) => value,
        }
    }
}
