//! Block Behavior System
//!
//! This module provides the per-type edit state machines that decide what a
//! keystroke does to a block:
//!
//! - `BlockBehavior` trait - Maps a key plus the block's live context to an `EditOutcome`
//! - Built-in behaviors (`TextBlockBehavior`, `ImageBlockBehavior`, `PageBlockBehavior`)
//! - `BehaviorRegistry` - Lookup of the behavior that governs a `NodeType`
//!
//! Behaviors are pure: they read the context and return an outcome. Applying
//! the outcome to the page and moving focus is the editor session's job.

mod reference_block;
mod text_block;

pub use reference_block::{ImageBlockBehavior, PageBlockBehavior};
pub use text_block::TextBlockBehavior;

use crate::editor::TextSelection;
use crate::models::{Node, NodeType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Keys the editor reacts to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Enter,
    Backspace,
    Delete,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Escape,
    Tab,
    Character(char),
}

impl Key {
    pub fn is_vertical_arrow(&self) -> bool {
        matches!(self, Key::ArrowUp | Key::ArrowDown)
    }
}

/// Everything a behavior may look at when deciding an outcome
#[derive(Debug, Clone, Copy)]
pub struct BlockContext<'a> {
    /// Position of the node in the page
    pub index: usize,

    pub node: &'a Node,

    /// Live text of the block (may be ahead of `node.value` while typing)
    pub text: &'a str,

    /// Current selection, `None` when the host cannot report one
    pub selection: Option<&'a TextSelection>,

    /// Live text of the block above, if any
    pub previous_text: Option<&'a str>,

    /// Live text of the block below, if any
    pub next_text: Option<&'a str>,
}

/// What a keystroke resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Let the platform apply its default editing behavior
    Native,

    /// Swallow the key without changing anything
    Consumed,

    /// Replace the block's value
    ValueChange(String),

    /// Insert an empty block of the same type before this one; focus stays at this index
    InsertEmptyBefore,

    /// Insert an empty block of the same type after this one and focus it
    InsertEmptyAfter,

    /// Keep `before` here and move `after` into a new block below, caret at its start
    Split { before: String, after: String },

    /// Remove this block
    DeleteNode { refocus_previous: bool },

    /// Replace the previous block with `merged`, remove this one, caret at `boundary`
    MergeWithPrevious { merged: String, boundary: usize },

    /// Replace this block with `merged`, remove the next one, caret at `caret`
    MergeWithNext { merged: String, caret: usize },

    /// Ask the host to open its image file picker
    OpenFilePicker,

    /// Ask the host to open the page with `slug`
    Navigate { slug: String },
}

impl EditOutcome {
    /// Whether the outcome changes the page
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            EditOutcome::ValueChange(_)
                | EditOutcome::InsertEmptyBefore
                | EditOutcome::InsertEmptyAfter
                | EditOutcome::Split { .. }
                | EditOutcome::DeleteNode { .. }
                | EditOutcome::MergeWithPrevious { .. }
                | EditOutcome::MergeWithNext { .. }
        )
    }
}

/// Edit state machine for one family of block types
pub trait BlockBehavior: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Resolve a keystroke
    fn on_key(&self, key: &Key, ctx: &BlockContext<'_>) -> EditOutcome;

    /// Resolve a text input event carrying the block's new live text
    fn on_input(&self, text: &str, _ctx: &BlockContext<'_>) -> EditOutcome {
        EditOutcome::ValueChange(text.to_string())
    }
}

/// Lookup table from node type to behavior
///
/// # Examples
///
/// ```rust
/// use pageblocks_core::behaviors::BehaviorRegistry;
/// use pageblocks_core::models::NodeType;
///
/// let registry = BehaviorRegistry::new();
/// assert_eq!(registry.get(NodeType::Heading2).name(), "text");
/// assert_eq!(registry.get(NodeType::Image).name(), "image");
/// ```
#[derive(Clone)]
pub struct BehaviorRegistry {
    behaviors: HashMap<NodeType, Arc<dyn BlockBehavior>>,
    fallback: Arc<dyn BlockBehavior>,
}

impl BehaviorRegistry {
    /// Registry with the built-in behavior for every node type
    pub fn new() -> Self {
        let text: Arc<dyn BlockBehavior> = Arc::new(TextBlockBehavior);
        let mut behaviors: HashMap<NodeType, Arc<dyn BlockBehavior>> = NodeType::ALL
            .iter()
            .filter(|node_type| node_type.is_text_like())
            .map(|node_type| (*node_type, text.clone()))
            .collect();
        behaviors.insert(NodeType::Image, Arc::new(ImageBlockBehavior));
        behaviors.insert(NodeType::Page, Arc::new(PageBlockBehavior));

        Self {
            behaviors,
            fallback: text,
        }
    }

    /// Replace the behavior for `node_type`
    pub fn register(&mut self, node_type: NodeType, behavior: Arc<dyn BlockBehavior>) {
        self.behaviors.insert(node_type, behavior);
    }

    pub fn get(&self, node_type: NodeType) -> &dyn BlockBehavior {
        self.behaviors
            .get(&node_type)
            .unwrap_or(&self.fallback)
            .as_ref()
    }
}

impl Default for BehaviorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
