//! Deferred focus placement
//!
//! Structural edits change the page immediately, but the block that should
//! receive focus may not be rendered yet. The edit pushes a `DeferredFocus`
//! here; the session drains the queue after the host has re-rendered.

use crate::editor::CaretTarget;
use std::collections::VecDeque;

/// Focus request to apply after the next render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredFocus {
    pub index: usize,
    pub caret: CaretTarget,
}

impl DeferredFocus {
    pub fn new(index: usize, caret: CaretTarget) -> Self {
        Self { index, caret }
    }
}

/// FIFO of pending focus requests
#[derive(Debug, Default)]
pub struct FrameQueue {
    pending: VecDeque<DeferredFocus>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, request: DeferredFocus) {
        tracing::trace!("Scheduled focus {:?}", request);
        self.pending.push_back(request);
    }

    /// Take every pending request, oldest first
    pub fn drain(&mut self) -> Vec<DeferredFocus> {
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
