//! Page Services
//!
//! This module contains the synced document store and its helpers:
//!
//! - `PageState` - Authoritative page snapshot and every editing operation
//! - `PageSyncer` - Background task that persists snapshots after a quiet window
//! - `load_initial_page` - Resolves the page to open for a route slug
//! - `PageEvent` - Change and persistence notifications
//!
//! Services coordinate between the pure mutation layer (`operations`) and the
//! storage boundaries (`db`).

pub mod error;
pub mod events;
pub mod page_loader;
pub mod page_state;
pub mod page_sync;

pub use error::PageServiceError;
pub use events::PageEvent;
pub use page_loader::load_initial_page;
pub use page_state::{PageResult, PageState};
pub use page_sync::{PageSyncer, SyncStats};
