//! Editor Session
//!
//! `EditorSession` wires one open page together: the synced [`PageState`], the
//! per-type block behaviors, the focus coordinator, the command panel, and the
//! host's rendered node handles.
//!
//! # Event flow
//!
//! 1. The host forwards a key, input, or click to the session
//! 2. The command panel gets the first look at Up/Down/Enter while it is open
//! 3. Otherwise Up/Down move focus, and every other key goes to the focused
//!    block's behavior
//! 4. The resulting [`EditOutcome`] is applied to the page immediately and the
//!    focus/caret placement is queued
//! 5. The host re-renders and calls [`EditorSession::settle_frame`], which places
//!    focus and the caret on the freshly rendered handles

use crate::behaviors::{BehaviorRegistry, BlockBehavior, BlockContext, EditOutcome, Key};
use crate::db::{AssetStore, ImageFile};
use crate::editor::{
    CaretTarget, CommandPanel, CommandPanelFlag, DeferredFocus, EditorError, FocusCoordinator,
    FrameQueue, HeadlessRenderer, NodeRegistry, RenderHost, COMMAND_CATALOG, utf16_len,
};
use crate::models::{Node, NodeType, Page};
use crate::operations::MutationError;
use crate::services::{PageEvent, PageResult, PageServiceError, PageState, SyncStats};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;

/// What the host should do with a key after the session handled it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum KeyResponse {
    /// Apply the platform's default editing behavior
    Native,

    /// The key was handled; suppress the default
    Handled,

    /// Open the image file picker for the block at `index`
    OpenFilePicker { index: usize },

    /// Open the page with `slug`
    Navigate { slug: String },
}

pub struct EditorSession {
    state: PageState,
    assets: Arc<dyn AssetStore>,
    behaviors: BehaviorRegistry,
    renderer: Box<dyn RenderHost>,
    registry: NodeRegistry,
    frames: FrameQueue,
    focus: FocusCoordinator,
    panel_flag: CommandPanelFlag,
    panel: Option<CommandPanel>,
    /// Node the open panel belongs to
    panel_host: Option<String>,
    /// Node whose next Enter is swallowed after a command commit
    suppress_enter: Option<String>,
}

impl EditorSession {
    /// Session rendered through the in-memory [`HeadlessRenderer`]
    pub fn new(state: PageState, assets: Arc<dyn AssetStore>) -> Self {
        Self::with_renderer(state, assets, Box::new(HeadlessRenderer::new()))
    }

    pub fn with_renderer(
        state: PageState,
        assets: Arc<dyn AssetStore>,
        renderer: Box<dyn RenderHost>,
    ) -> Self {
        let panel_flag = CommandPanelFlag::default();
        let mut session = Self {
            state,
            assets,
            behaviors: BehaviorRegistry::new(),
            renderer,
            registry: NodeRegistry::new(),
            frames: FrameQueue::new(),
            focus: FocusCoordinator::new(panel_flag.clone()),
            panel_flag,
            panel: None,
            panel_host: None,
            suppress_enter: None,
        };

        session.render();
        if !session.state.is_empty() {
            session.focus_block(0, CaretTarget::Keep);
        }
        session
    }

    /// Replace the behavior table
    pub fn with_behaviors(mut self, behaviors: BehaviorRegistry) -> Self {
        self.behaviors = behaviors;
        self
    }

    //
    // ACCESSORS
    //

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn page(&self) -> Arc<Page> {
        self.state.snapshot()
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focus.focused_index()
    }

    pub fn command_panel(&self) -> Option<&CommandPanel> {
        self.panel.as_ref()
    }

    pub fn is_command_panel_open(&self) -> bool {
        self.panel_flag.is_open()
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Number of focus placements waiting for `settle_frame`
    pub fn pending_focus(&self) -> usize {
        self.frames.len()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PageEvent> {
        self.state.subscribe()
    }

    //
    // KEYBOARD AND POINTER EVENTS
    //

    /// Route a key press and apply its outcome
    pub async fn handle_key(&mut self, key: Key) -> Result<KeyResponse, EditorError> {
        self.sync_command_panel();

        if let Some(panel) = self.panel.as_mut() {
            match key {
                Key::ArrowUp => {
                    panel.arrow_up();
                    return Ok(KeyResponse::Handled);
                }
                Key::ArrowDown => {
                    panel.arrow_down();
                    return Ok(KeyResponse::Handled);
                }
                Key::Enter => {
                    let Some(selected) = panel.selected() else {
                        tracing::debug!("Enter ignored: no command matches the filter");
                        return Ok(KeyResponse::Handled);
                    };
                    let response = self.select_command(selected).await?;

                    // The committing Enter reaches the block too and uses up the one-shot
                    if let Some(id) = self.focused_node().map(|node| node.id.clone()) {
                        self.take_enter_suppression(&id);
                    }
                    return Ok(response);
                }
                _ => {}
            }
        }

        if key.is_vertical_arrow() {
            let len = self.state.len();
            let moved = match key {
                Key::ArrowUp => self.focus.arrow_up(len),
                _ => self.focus.arrow_down(len),
            };
            if moved {
                if let Some(index) = self.focus.focused_index() {
                    self.focus_block(index, CaretTarget::Keep);
                }
            }
            return Ok(KeyResponse::Native);
        }

        let Some(index) = self.focus.focused_index() else {
            return Ok(KeyResponse::Native);
        };
        let Some(node) = self.state.node(index).cloned() else {
            tracing::debug!("Focused index {} is past the end of the page", index);
            return Ok(KeyResponse::Native);
        };

        if key == Key::Enter && self.take_enter_suppression(&node.id) {
            tracing::debug!("Swallowed Enter after command commit on node {}", node.id);
            return Ok(KeyResponse::Handled);
        }

        let outcome = self.resolve(index, &node, |behavior, ctx| behavior.on_key(&key, ctx));
        tracing::debug!(
            "{:?} on {} block {} resolved to {:?}",
            key,
            self.behaviors.get(node.node_type).name(),
            index,
            outcome
        );
        self.apply_outcome(index, &node, outcome)
    }

    /// The focused block's live text changed to `text`
    pub fn handle_input(&mut self, text: &str) -> Result<(), EditorError> {
        let index = self.focus.focused_index().ok_or(EditorError::NoFocusedNode)?;
        let node = self
            .state
            .node(index)
            .cloned()
            .ok_or(EditorError::NoFocusedNode)?;

        let outcome = self.resolve(index, &node, |behavior, ctx| behavior.on_input(text, ctx));
        if let EditOutcome::ValueChange(value) = outcome {
            self.state.change_node_value(index, value.as_str())?;
            if let Some(handle) = self.registry.get(index) {
                // A real host already shows the typed text; the headless one needs it written
                if handle.text() != value {
                    handle.set_text(&value);
                    handle.set_caret(utf16_len(&value));
                }
            }
        }

        self.sync_command_panel();
        Ok(())
    }

    /// Pointer focus on the block at `index`
    pub fn click(&mut self, index: usize) {
        let len = self.state.len();
        if index >= len {
            tracing::debug!("Click on index {} ignored, page has {} nodes", index, len);
            return;
        }
        self.focus.update_focused_index(index, len);
        self.focus_block(index, CaretTarget::Keep);
        self.sync_command_panel();
    }

    /// Commit catalog entry `entry_index` for the focused block
    ///
    /// The type change happens first; the block's text is cleared and the
    /// panel closes only once it succeeded. The block then ignores its next
    /// Enter.
    pub async fn select_command(&mut self, entry_index: usize) -> Result<KeyResponse, EditorError> {
        let index = self.focus.focused_index().ok_or(EditorError::NoFocusedNode)?;
        let entry = COMMAND_CATALOG
            .get(entry_index)
            .copied()
            .ok_or(EditorError::UnknownCommand(entry_index))?;
        if let Some(panel) = self.panel.as_mut() {
            panel.select(entry_index);
        }

        let snapshot = self.state.change_node_type(index, entry.node_type).await?;
        if let Some(handle) = self.registry.get(index) {
            handle.set_text("");
        }
        self.close_command_panel();
        if let Some(node) = snapshot.nodes.get(index) {
            self.suppress_enter = Some(node.id.clone());
        }
        self.frames
            .schedule(DeferredFocus::new(index, CaretTarget::Start));

        tracing::info!("Block {} switched to {}", index, entry.name);
        Ok(match entry.node_type {
            NodeType::Image => KeyResponse::OpenFilePicker { index },
            _ => KeyResponse::Handled,
        })
    }

    /// Enter in the page title: new empty paragraph at the top
    pub fn title_enter(&mut self) -> PageResult {
        let snapshot = self.state.add_node(Node::empty(NodeType::Text), 0)?;
        self.frames.schedule(DeferredFocus::new(0, CaretTarget::Start));
        Ok(snapshot)
    }

    /// Click below the last block: new empty paragraph at the end
    pub fn append_paragraph(&mut self) -> PageResult {
        let index = self.state.len();
        let snapshot = self.state.add_node(Node::empty(NodeType::Text), index)?;
        self.frames
            .schedule(DeferredFocus::new(index, CaretTarget::Start));
        Ok(snapshot)
    }

    /// Upload the file picked for the image block at `index`
    ///
    /// A missing or non-image file leaves the block alone. A failed upload
    /// turns the block back into a text block before the error is returned.
    pub async fn upload_image(
        &mut self,
        index: usize,
        file: Option<ImageFile>,
    ) -> Result<Arc<Page>, EditorError> {
        let len = self.state.len();
        if index >= len {
            return Err(PageServiceError::from(MutationError::index_out_of_bounds(index, len)).into());
        }

        let file = match file {
            Some(file) if file.is_image() => file,
            other => {
                let mime_type = other.map(|file| file.mime_type);
                tracing::warn!("Rejected image upload with type {:?}", mime_type);
                return Err(EditorError::invalid_image(mime_type));
            }
        };

        match self.assets.upload_image(Some(file)).await {
            Ok(uploaded) => {
                tracing::info!("Uploaded image for block {} to {}", index, uploaded.file_path);
                Ok(self.state.change_node_value(index, uploaded.file_path)?)
            }
            Err(e) => {
                tracing::error!("Image upload for block {} failed: {}", index, e);
                self.state.change_node_type(index, NodeType::Text).await?;
                Err(EditorError::Upload(e))
            }
        }
    }

    //
    // PAGE-LEVEL OPERATIONS
    //

    /// Drag-and-drop: move `moved_id` to where `target_id` is
    pub fn reorder(&mut self, moved_id: &str, target_id: &str) -> PageResult {
        self.state.reorder_nodes(moved_id, target_id)
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> PageResult {
        self.state.set_title(title)
    }

    pub fn set_cover_image(&mut self, cover: impl Into<String>) -> PageResult {
        self.state.set_cover_image(cover)
    }

    pub async fn set_emoji(&mut self, index: usize, emoji: impl Into<String>) -> PageResult {
        self.state.set_emoji(index, emoji).await
    }

    pub async fn update_caption(&mut self, node_id: &str, caption: impl Into<String>) -> PageResult {
        self.state
            .update_node_caption_in_database(node_id, caption)
            .await
    }

    //
    // RENDERING
    //

    /// Phase two of an edit: re-render, then apply the queued focus placements
    pub fn settle_frame(&mut self) {
        self.render();

        for request in self.frames.drain() {
            let len = self.state.len();
            self.focus.update_focused_index(request.index, len);
            match self.focus.focused_index() {
                Some(index) => self.focus_block(index, request.caret),
                None => self.blur_all(),
            }
        }

        self.sync_command_panel();
    }

    /// Shut the session down, flushing pending persistence
    pub async fn shutdown(self) -> SyncStats {
        let Self { state, panel, .. } = self;
        drop(panel);
        state.shutdown().await
    }

    fn render(&mut self) {
        let page = self.state.snapshot();
        self.renderer.render(&page, &mut self.registry);
    }

    fn blur_all(&self) {
        for (_, handle) in self.registry.iter() {
            handle.blur();
        }
    }

    fn focus_block(&self, index: usize, caret: CaretTarget) {
        let Some(target) = self.registry.get(index) else {
            tracing::debug!("No handle mounted at {}, focus deferred to host", index);
            return;
        };

        for (other, handle) in self.registry.iter() {
            if other != index && handle.is_focused() {
                handle.blur();
            }
        }
        target.focus();

        match caret {
            CaretTarget::Start => target.set_caret(0),
            CaretTarget::End => target.set_caret(utf16_len(&target.text())),
            CaretTarget::Offset(offset) => target.set_caret(offset),
            CaretTarget::Keep => {}
        }
    }

    //
    // INTERNALS
    //

    fn focused_node(&self) -> Option<&Node> {
        self.focus
            .focused_index()
            .and_then(|index| self.state.node(index))
    }

    /// Live text of the block at `index`, falling back to the stored value
    fn live_text(&self, index: usize) -> Option<String> {
        let node = self.state.node(index)?;
        Some(
            self.registry
                .text(index)
                .unwrap_or_else(|| node.value.clone()),
        )
    }

    fn take_enter_suppression(&mut self, node_id: &str) -> bool {
        if self.suppress_enter.as_deref() == Some(node_id) {
            self.suppress_enter = None;
            true
        } else {
            false
        }
    }

    fn resolve<F>(&self, index: usize, node: &Node, decide: F) -> EditOutcome
    where
        F: FnOnce(&dyn BlockBehavior, &BlockContext<'_>) -> EditOutcome,
    {
        let text = self.live_text(index).unwrap_or_default();
        let selection = self.registry.get(index).and_then(|handle| handle.selection());
        let previous = index.checked_sub(1).and_then(|i| self.live_text(i));
        let next = self.live_text(index + 1);

        let ctx = BlockContext {
            index,
            node,
            text: &text,
            selection: selection.as_ref(),
            previous_text: previous.as_deref(),
            next_text: next.as_deref(),
        };
        decide(self.behaviors.get(node.node_type), &ctx)
    }

    fn apply_outcome(
        &mut self,
        index: usize,
        node: &Node,
        outcome: EditOutcome,
    ) -> Result<KeyResponse, EditorError> {
        match outcome {
            EditOutcome::Native => return Ok(KeyResponse::Native),
            EditOutcome::Consumed => {}
            EditOutcome::ValueChange(value) => {
                self.state.change_node_value(index, value)?;
            }
            EditOutcome::InsertEmptyBefore => {
                self.state.add_node(Node::empty(node.node_type), index)?;
                self.frames
                    .schedule(DeferredFocus::new(index, CaretTarget::Start));
            }
            EditOutcome::InsertEmptyAfter => {
                self.state.add_node(Node::empty(node.node_type), index + 1)?;
                self.frames
                    .schedule(DeferredFocus::new(index + 1, CaretTarget::Start));
            }
            EditOutcome::Split { before, after } => {
                self.state.change_node_value(index, before)?;
                self.state
                    .add_node(Node::new(node.node_type, after), index + 1)?;
                self.frames
                    .schedule(DeferredFocus::new(index + 1, CaretTarget::Start));
            }
            EditOutcome::DeleteNode { refocus_previous } => {
                self.state.remove_node_by_index(index)?;
                match (refocus_previous, index.checked_sub(1)) {
                    (true, Some(previous)) => self
                        .frames
                        .schedule(DeferredFocus::new(previous, CaretTarget::End)),
                    // No previous block: focus stays put, the index only clamps
                    (true, None) => self.focus.update_focused_index(0, self.state.len()),
                    (false, _) => self
                        .frames
                        .schedule(DeferredFocus::new(index, CaretTarget::Keep)),
                }
            }
            EditOutcome::MergeWithPrevious { merged, boundary } => {
                let previous = index.checked_sub(1).ok_or_else(|| {
                    PageServiceError::from(MutationError::index_out_of_bounds(index, index))
                })?;
                self.state.change_node_value(previous, merged)?;
                self.state.remove_node_by_index(index)?;
                self.frames
                    .schedule(DeferredFocus::new(previous, CaretTarget::Offset(boundary)));
            }
            EditOutcome::MergeWithNext { merged, caret } => {
                self.state.change_node_value(index, merged)?;
                self.state.remove_node_by_index(index + 1)?;
                self.frames
                    .schedule(DeferredFocus::new(index, CaretTarget::Offset(caret)));
            }
            EditOutcome::OpenFilePicker => return Ok(KeyResponse::OpenFilePicker { index }),
            EditOutcome::Navigate { slug } => return Ok(KeyResponse::Navigate { slug }),
        }
        Ok(KeyResponse::Handled)
    }

    /// Open, re-filter, or close the panel to match the focused block's text
    ///
    /// The selection is only recomputed when the text changed, so arrow-key
    /// moves survive clicks and settled frames.
    fn sync_command_panel(&mut self) {
        let host = self.focused_node().and_then(|node| {
            let index = self.focus.focused_index()?;
            if !node.node_type.is_text_like() {
                return None;
            }
            let text = self.live_text(index)?;
            text.starts_with('/').then(|| (node.id.clone(), text))
        });

        let Some((node_id, text)) = host else {
            self.close_command_panel();
            return;
        };

        if self.panel_host.as_deref() == Some(node_id.as_str()) {
            if let Some(panel) = self.panel.as_mut() {
                panel.sync_with_text(&text);
                return;
            }
        }

        // Drop the old panel first so its flag release cannot clear the new one
        self.close_command_panel();
        self.panel = Some(CommandPanel::open(&text, self.panel_flag.clone()));
        self.panel_host = Some(node_id);
    }

    fn close_command_panel(&mut self) {
        self.panel = None;
        self.panel_host = None;
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;
