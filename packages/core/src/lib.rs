//! PageBlocks Core
//!
//! This crate provides the headless editing core of the PageBlocks page builder:
//! the block data model, the per-block editing state machine, the slash-command
//! type switcher, keyboard focus coordination, and the synced page store that
//! turns local edits into debounced persistence.
//!
//! # Architecture
//!
//! - **Ordered blocks**: A page is an ordered `Vec<Node>`; order is the only source of truth
//! - **Copy-on-write**: Every store mutation produces a fresh `Arc<Page>` snapshot
//! - **Two-phase edits**: Structural mutations apply immediately, caret placement after render
//! - **Local-first**: Remote persistence is debounced and never blocks or rolls back edits
//!
//! # Modules
//!
//! - [`models`] - Data structures (Node, NodeType, Page)
//! - [`operations`] - Pure page mutations (the draft-apply reducer)
//! - [`services`] - PageState store, debounced PageSyncer, page loading
//! - [`behaviors`] - Block edit state machine per node type
//! - [`editor`] - Focus coordinator, command panel, node registry, editor session
//! - [`db`] - Persistence, asset and identity boundaries with reference adapters
//! - [`config`] - Editor configuration

pub mod behaviors;
pub mod config;
pub mod db;
pub mod editor;
pub mod models;
pub mod operations;
pub mod services;

// Re-export commonly used types
pub use behaviors::*;
pub use config::EditorConfig;
pub use editor::*;
pub use models::*;
pub use services::*;
