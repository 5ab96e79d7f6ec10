//! Copy-on-write page mutations
//!
//! Every store operation is expressed as a `PageMutation`. Applying one never
//! touches the input snapshot: the page is cloned into a draft, the draft is
//! mutated, and the draft is returned as the next snapshot.
//!
//! # Example
//!
//! ```rust
//! use pageblocks_core::models::{Node, NodeType, Page};
//! use pageblocks_core::operations::PageMutation;
//! use pageblocks_core::EditorConfig;
//!
//! let page = Page::scaffold(&EditorConfig::default());
//! let next = PageMutation::AddNode {
//!     node: Node::new(NodeType::Text, "hello"),
//!     index: 0,
//! }
//! .apply(&page)
//! .unwrap();
//!
//! assert!(page.nodes.is_empty()); // previous snapshot untouched
//! assert_eq!(next.nodes[0].value, "hello");
//! ```

use crate::models::{Node, NodeType, Page};
use crate::operations::MutationError;
use std::collections::HashSet;

/// One structural or field change to a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageMutation {
    /// Insert `node` at `index`, shifting later nodes right (`index == len` appends)
    AddNode { node: Node, index: usize },

    /// Delete exactly one node
    RemoveNodeByIndex { index: usize },

    /// Replace a node's value, keeping its type
    ChangeNodeValue { index: usize, value: String },

    /// Set type and value together (the settled result of a type change)
    SetNodeType {
        index: usize,
        node_type: NodeType,
        value: String,
    },

    /// Replace the whole node list
    SetNodes(Vec<Node>),

    SetTitle(String),

    SetCoverImage(String),

    /// Move the node `moved_id` to the position currently held by `target_id`
    ReorderNodes { moved_id: String, target_id: String },

    SetEmoji { index: usize, emoji: String },

    SetCaption { node_id: String, caption: String },
}

impl PageMutation {
    /// Short name used in logs and events
    pub fn kind(&self) -> &'static str {
        match self {
            PageMutation::AddNode { .. } => "add_node",
            PageMutation::RemoveNodeByIndex { .. } => "remove_node_by_index",
            PageMutation::ChangeNodeValue { .. } => "change_node_value",
            PageMutation::SetNodeType { .. } => "set_node_type",
            PageMutation::SetNodes(_) => "set_nodes",
            PageMutation::SetTitle(_) => "set_title",
            PageMutation::SetCoverImage(_) => "set_cover_image",
            PageMutation::ReorderNodes { .. } => "reorder_nodes",
            PageMutation::SetEmoji { .. } => "set_emoji",
            PageMutation::SetCaption { .. } => "set_caption",
        }
    }

    /// Apply the mutation to a draft copy of `page` and return the draft
    ///
    /// # Errors
    ///
    /// - `IndexOutOfBounds` for index-based mutations past the end of the page
    /// - `NodeNotFound` for id-based mutations naming an absent node
    /// - `DuplicateNodeId` if the result would contain the same id twice
    pub fn apply(self, page: &Page) -> Result<Page, MutationError> {
        let mut draft = page.clone();
        self.apply_to_draft(&mut draft)?;
        Ok(draft)
    }

    fn apply_to_draft(self, draft: &mut Page) -> Result<(), MutationError> {
        let len = draft.nodes.len();

        match self {
            PageMutation::AddNode { node, index } => {
                if index > len {
                    return Err(MutationError::index_out_of_bounds(index, len));
                }
                if draft.index_of(&node.id).is_some() {
                    return Err(MutationError::duplicate_node_id(node.id));
                }
                draft.nodes.insert(index, node);
            }
            PageMutation::RemoveNodeByIndex { index } => {
                if index >= len {
                    return Err(MutationError::index_out_of_bounds(index, len));
                }
                draft.nodes.remove(index);
            }
            PageMutation::ChangeNodeValue { index, value } => {
                node_at(draft, index)?.value = value;
            }
            PageMutation::SetNodeType {
                index,
                node_type,
                value,
            } => {
                let node = node_at(draft, index)?;
                node.node_type = node_type;
                node.value = value;
            }
            PageMutation::SetNodes(nodes) => {
                let mut seen = HashSet::with_capacity(nodes.len());
                if let Some(duplicate) = nodes.iter().find(|node| !seen.insert(node.id.as_str())) {
                    return Err(MutationError::duplicate_node_id(duplicate.id.clone()));
                }
                draft.nodes = nodes;
            }
            PageMutation::SetTitle(title) => {
                draft.title = title;
            }
            PageMutation::SetCoverImage(cover) => {
                draft.cover = cover;
            }
            PageMutation::ReorderNodes {
                moved_id,
                target_id,
            } => {
                let from = draft
                    .index_of(&moved_id)
                    .ok_or_else(|| MutationError::node_not_found(moved_id.clone()))?;
                let to = draft
                    .index_of(&target_id)
                    .ok_or_else(|| MutationError::node_not_found(target_id.clone()))?;
                array_move(&mut draft.nodes, from, to);
            }
            PageMutation::SetEmoji { index, emoji } => {
                node_at(draft, index)?.emoji = Some(emoji);
            }
            PageMutation::SetCaption { node_id, caption } => {
                let index = draft
                    .index_of(&node_id)
                    .ok_or_else(|| MutationError::node_not_found(node_id.clone()))?;
                draft.nodes[index].caption = Some(caption);
            }
        }

        Ok(())
    }
}

fn node_at(draft: &mut Page, index: usize) -> Result<&mut Node, MutationError> {
    let len = draft.nodes.len();
    draft
        .nodes
        .get_mut(index)
        .ok_or_else(|| MutationError::index_out_of_bounds(index, len))
}

/// Move the element at `from` to `to`; elements in between shift by one.
///
/// Out-of-range indices leave the slice untouched.
///
/// # Examples
///
/// ```rust
/// # use pageblocks_core::operations::array_move;
/// let mut items = vec!["a", "b", "c", "d"];
/// array_move(&mut items, 0, 2);
/// assert_eq!(items, vec!["b", "c", "a", "d"]);
/// ```
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to || from >= items.len() || to >= items.len() {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(values: &[&str]) -> Page {
        Page {
            id: "page".to_string(),
            slug: "page".to_string(),
            title: "Title".to_string(),
            nodes: values
                .iter()
                .enumerate()
                .map(|(i, value)| Node::new_with_id(format!("n{}", i), NodeType::Text, *value))
                .collect(),
            cover: String::new(),
        }
    }

    fn values(page: &Page) -> Vec<&str> {
        page.nodes.iter().map(|node| node.value.as_str()).collect()
    }

    #[test]
    fn test_add_node_inserts_and_appends() {
        let base = page(&["a", "c"]);

        let inserted = PageMutation::AddNode {
            node: Node::new(NodeType::Text, "b"),
            index: 1,
        }
        .apply(&base)
        .unwrap();
        assert_eq!(values(&inserted), vec!["a", "b", "c"]);

        let appended = PageMutation::AddNode {
            node: Node::new(NodeType::Text, "d"),
            index: 3,
        }
        .apply(&inserted)
        .unwrap();
        assert_eq!(values(&appended), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_add_node_past_end_is_rejected() {
        let base = page(&["a"]);
        let err = PageMutation::AddNode {
            node: Node::new(NodeType::Text, "x"),
            index: 2,
        }
        .apply(&base)
        .unwrap_err();
        assert_eq!(err, MutationError::index_out_of_bounds(2, 1));
    }

    #[test]
    fn test_add_node_rejects_duplicate_id() {
        let base = page(&["a"]);
        let err = PageMutation::AddNode {
            node: Node::new_with_id("n0", NodeType::Text, "again"),
            index: 1,
        }
        .apply(&base)
        .unwrap_err();
        assert!(matches!(err, MutationError::DuplicateNodeId { .. }));
    }

    #[test]
    fn test_apply_never_mutates_previous_snapshot() {
        let base = page(&["a", "b"]);
        let before = base.clone();

        let next = PageMutation::ChangeNodeValue {
            index: 0,
            value: "changed".to_string(),
        }
        .apply(&base)
        .unwrap();

        assert_eq!(base, before);
        assert_eq!(values(&next), vec!["changed", "b"]);
    }

    #[test]
    fn test_remove_node_by_index() {
        let base = page(&["a", "b", "c"]);
        let next = PageMutation::RemoveNodeByIndex { index: 1 }
            .apply(&base)
            .unwrap();
        assert_eq!(values(&next), vec!["a", "c"]);

        let err = PageMutation::RemoveNodeByIndex { index: 3 }
            .apply(&base)
            .unwrap_err();
        assert_eq!(err, MutationError::index_out_of_bounds(3, 3));
    }

    #[test]
    fn test_change_value_preserves_type() {
        let mut base = page(&["a"]);
        base.nodes[0].node_type = NodeType::Heading2;

        let next = PageMutation::ChangeNodeValue {
            index: 0,
            value: "b".to_string(),
        }
        .apply(&base)
        .unwrap();
        assert_eq!(next.nodes[0].node_type, NodeType::Heading2);
        assert_eq!(next.nodes[0].id, "n0");
    }

    #[test]
    fn test_set_node_type_sets_both_fields() {
        let base = page(&["/page"]);
        let next = PageMutation::SetNodeType {
            index: 0,
            node_type: NodeType::Page,
            value: "child-slug".to_string(),
        }
        .apply(&base)
        .unwrap();
        assert_eq!(next.nodes[0].node_type, NodeType::Page);
        assert_eq!(next.nodes[0].value, "child-slug");
    }

    #[test]
    fn test_set_nodes_rejects_duplicates() {
        let base = page(&[]);
        let err = PageMutation::SetNodes(vec![
            Node::new_with_id("x", NodeType::Text, "1"),
            Node::new_with_id("x", NodeType::Text, "2"),
        ])
        .apply(&base)
        .unwrap_err();
        assert_eq!(err, MutationError::duplicate_node_id("x"));
    }

    #[test]
    fn test_title_and_cover() {
        let base = page(&[]);
        let next = PageMutation::SetTitle("New".to_string()).apply(&base).unwrap();
        let next = PageMutation::SetCoverImage("c.png".to_string())
            .apply(&next)
            .unwrap();
        assert_eq!(next.title, "New");
        assert_eq!(next.cover, "c.png");
    }

    #[test]
    fn test_reorder_moves_down_and_shifts_between() {
        let base = page(&["a", "b", "c", "d"]);
        let next = PageMutation::ReorderNodes {
            moved_id: "n0".to_string(),
            target_id: "n2".to_string(),
        }
        .apply(&base)
        .unwrap();
        assert_eq!(values(&next), vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn test_reorder_moves_up() {
        let base = page(&["a", "b", "c", "d"]);
        let next = PageMutation::ReorderNodes {
            moved_id: "n3".to_string(),
            target_id: "n1".to_string(),
        }
        .apply(&base)
        .unwrap();
        assert_eq!(values(&next), vec!["a", "d", "b", "c"]);
    }

    #[test]
    fn test_reorder_adjacent_then_back_restores_order() {
        let base = page(&["a", "b", "c"]);
        let swap = |page: &Page, moved: &str, target: &str| {
            PageMutation::ReorderNodes {
                moved_id: moved.to_string(),
                target_id: target.to_string(),
            }
            .apply(page)
            .unwrap()
        };

        let once = swap(&base, "n1", "n2");
        assert_eq!(values(&once), vec!["a", "c", "b"]);
        let back = swap(&once, "n2", "n1");
        assert_eq!(back.node_ids(), base.node_ids());
    }

    #[test]
    fn test_reorder_unknown_id() {
        let base = page(&["a"]);
        let err = PageMutation::ReorderNodes {
            moved_id: "n0".to_string(),
            target_id: "ghost".to_string(),
        }
        .apply(&base)
        .unwrap_err();
        assert_eq!(err, MutationError::node_not_found("ghost"));
    }

    #[test]
    fn test_emoji_and_caption() {
        let base = page(&["a", "b"]);
        let next = PageMutation::SetEmoji {
            index: 1,
            emoji: "🔥".to_string(),
        }
        .apply(&base)
        .unwrap();
        let next = PageMutation::SetCaption {
            node_id: "n0".to_string(),
            caption: "cap".to_string(),
        }
        .apply(&next)
        .unwrap();

        assert_eq!(next.nodes[1].emoji.as_deref(), Some("🔥"));
        assert_eq!(next.nodes[0].caption.as_deref(), Some("cap"));
    }

    #[test]
    fn test_array_move_ignores_out_of_range() {
        let mut items = vec![1, 2, 3];
        array_move(&mut items, 5, 0);
        array_move(&mut items, 0, 5);
        assert_eq!(items, vec![1, 2, 3]);
    }
}
