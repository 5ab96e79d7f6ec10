//! Page Operations
//!
//! This module is the pure half of the synced page store: a closed set of
//! [`PageMutation`]s and the copy-on-write step that applies one to a page
//! snapshot. Nothing in here performs I/O, so every structural rule of the
//! editor can be tested without a runtime.
//!
//! The I/O half (debounced persistence) lives in
//! [`services::PageSyncer`](crate::services::PageSyncer).

pub mod error;
pub mod page_mutation;

pub use error::MutationError;
pub use page_mutation::{array_move, PageMutation};
