//! Data Models
//!
//! This module contains the core data structures used throughout PageBlocks:
//!
//! - `Node` - One typed content block
//! - `NodeType` - The closed set of block types
//! - `NodeField` - Single-row attribute updates (emoji, caption)
//! - `Page` - A document: metadata plus its ordered nodes
//!
//! The serialized form of `Page` is exactly what gets persisted.

mod node;
mod page;

pub use node::{Node, NodeField, NodeType, ValidationError};
pub use page::{is_valid_slug, Page};
