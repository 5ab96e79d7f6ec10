//! Node handle registry
//!
//! The host registers one `NodeHandle` per rendered block, keyed by the
//! block's index. The editor reads live text and selection through the handle
//! and uses it to move focus and the caret after a re-render.
//!
//! `HeadlessNodeHandle` and `HeadlessRenderer` form an in-memory host used by
//! tests and the dev tool.

use crate::editor::{utf16_len, utf16_to_byte, TextSelection};
use crate::models::Page;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Host-side handle to one rendered block
pub trait NodeHandle: Send + Sync {
    fn focus(&self);

    fn blur(&self);

    fn is_focused(&self) -> bool;

    /// Live text currently shown by the block
    fn text(&self) -> String;

    fn set_text(&self, text: &str);

    /// Select a UTF-16 range; `focus` may come before `anchor`
    fn select(&self, anchor: usize, focus: usize);

    /// Collapse the selection to a UTF-16 offset
    fn set_caret(&self, offset: usize) {
        self.select(offset, offset);
    }

    /// Current selection, `None` if the block has none
    fn selection(&self) -> Option<TextSelection>;
}

/// Index-keyed handles of the currently rendered blocks
#[derive(Default, Clone)]
pub struct NodeRegistry {
    handles: BTreeMap<usize, Arc<dyn NodeHandle>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handle rendered at `index`, replacing any previous one
    pub fn mount(&mut self, index: usize, handle: Arc<dyn NodeHandle>) {
        self.handles.insert(index, handle);
    }

    pub fn unmount(&mut self, index: usize) -> Option<Arc<dyn NodeHandle>> {
        self.handles.remove(&index)
    }

    pub fn get(&self, index: usize) -> Option<&Arc<dyn NodeHandle>> {
        self.handles.get(&index)
    }

    /// Drop every handle at or beyond `len`
    pub fn truncate(&mut self, len: usize) {
        self.handles.split_off(&len);
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Live text at `index`, if a handle is mounted there
    pub fn text(&self, index: usize) -> Option<String> {
        self.handles.get(&index).map(|handle| handle.text())
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Arc<dyn NodeHandle>)> {
        self.handles.iter().map(|(index, handle)| (*index, handle))
    }
}

#[derive(Debug, Default)]
struct HeadlessState {
    text: String,
    selection: Option<(usize, usize)>,
    focused: bool,
}

/// In-memory `NodeHandle`
#[derive(Debug, Default)]
pub struct HeadlessNodeHandle {
    state: Mutex<HeadlessState>,
}

impl HeadlessNodeHandle {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(HeadlessState {
                text: text.into(),
                ..Default::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, HeadlessState> {
        // Every write leaves the state consistent, so poisoning is ignored
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl NodeHandle for HeadlessNodeHandle {
    fn focus(&self) {
        self.state().focused = true;
    }

    fn blur(&self) {
        let mut state = self.state();
        state.focused = false;
        state.selection = None;
    }

    fn is_focused(&self) -> bool {
        self.state().focused
    }

    fn text(&self) -> String {
        self.state().text.clone()
    }

    fn set_text(&self, text: &str) {
        let mut state = self.state();
        if state.text != text {
            state.text = text.to_string();
            let len = utf16_len(text);
            state.selection = state
                .selection
                .map(|(anchor, focus)| (anchor.min(len), focus.min(len)));
        }
    }

    fn select(&self, anchor: usize, focus: usize) {
        let mut state = self.state();
        let len = utf16_len(&state.text);
        state.selection = Some((anchor.min(len), focus.min(len)));
    }

    fn selection(&self) -> Option<TextSelection> {
        let state = self.state();
        state.selection.map(|(anchor, focus)| {
            let start = utf16_to_byte(&state.text, anchor.min(focus));
            let end = utf16_to_byte(&state.text, anchor.max(focus));
            TextSelection::range(anchor, focus).with_text(&state.text[start..end])
        })
    }
}

/// The re-render step of a host
pub trait RenderHost: Send {
    /// Bring `registry` in line with `page`: one mounted handle per node
    fn render(&mut self, page: &Page, registry: &mut NodeRegistry);
}

/// `RenderHost` that mounts `HeadlessNodeHandle`s
///
/// Handles are keyed by node id so a block keeps its handle (and its caret)
/// when it moves to another index.
#[derive(Default)]
pub struct HeadlessRenderer {
    by_node_id: BTreeMap<String, Arc<HeadlessNodeHandle>>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concrete handle of a rendered node, for driving selections in tests
    pub fn handle(&self, node_id: &str) -> Option<Arc<HeadlessNodeHandle>> {
        self.by_node_id.get(node_id).cloned()
    }
}

impl RenderHost for HeadlessRenderer {
    fn render(&mut self, page: &Page, registry: &mut NodeRegistry) {
        self.by_node_id
            .retain(|id, _| page.nodes.iter().any(|node| &node.id == id));

        for (index, node) in page.nodes.iter().enumerate() {
            let handle = self
                .by_node_id
                .entry(node.id.clone())
                .or_insert_with(|| Arc::new(HeadlessNodeHandle::new(node.value.clone())))
                .clone();
            handle.set_text(&node.value);
            registry.mount(index, handle);
        }
        registry.truncate(page.nodes.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Node, NodeType};

    fn page(ids: &[&str]) -> Page {
        Page {
            id: "p".to_string(),
            slug: "p".to_string(),
            title: String::new(),
            nodes: ids
                .iter()
                .map(|id| Node::new_with_id(*id, NodeType::Text, format!("value-{}", id)))
                .collect(),
            cover: String::new(),
        }
    }

    #[test]
    fn test_headless_selection_reports_text() {
        let handle = HeadlessNodeHandle::new("hello");
        handle.select(4, 1);

        let selection = handle.selection().unwrap();
        assert_eq!(selection.start(), 1);
        assert_eq!(selection.end(), 4);
        assert_eq!(selection.text.as_deref(), Some("ell"));
    }

    #[test]
    fn test_set_caret_clamps() {
        let handle = HeadlessNodeHandle::new("hi");
        handle.set_caret(10);
        assert_eq!(handle.selection(), Some(TextSelection::caret(2).with_text("")));
    }

    #[test]
    fn test_blur_drops_selection() {
        let handle = HeadlessNodeHandle::new("hi");
        handle.focus();
        handle.set_caret(1);
        handle.blur();
        assert!(!handle.is_focused());
        assert!(handle.selection().is_none());
    }

    #[test]
    fn test_renderer_mounts_one_handle_per_node() {
        let mut renderer = HeadlessRenderer::new();
        let mut registry = NodeRegistry::new();

        renderer.render(&page(&["a", "b", "c"]), &mut registry);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.text(1).as_deref(), Some("value-b"));

        renderer.render(&page(&["c", "a"]), &mut registry);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.text(0).as_deref(), Some("value-c"));
        assert!(renderer.handle("b").is_none());
    }

    #[test]
    fn test_renderer_keeps_handle_identity_across_moves() {
        let mut renderer = HeadlessRenderer::new();
        let mut registry = NodeRegistry::new();

        renderer.render(&page(&["a", "b"]), &mut registry);
        renderer.handle("b").unwrap().set_caret(3);

        renderer.render(&page(&["b", "a"]), &mut registry);
        let moved = registry.get(0).unwrap().selection().unwrap();
        assert_eq!(moved.start(), 3);
    }
}
