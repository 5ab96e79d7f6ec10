//! Page Events
//!
//! Events published by `PageState` and `PageSyncer` on a tokio broadcast
//! channel. Hosts subscribe to re-render on `Changed` and to surface save
//! status from `Persisted` / `PersistFailed`.

use crate::models::Page;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum PageEvent {
    /// A mutation was committed and `page` is the new snapshot
    Changed {
        mutation: &'static str,
        page: Arc<Page>,
    },

    /// The debounced write of a snapshot succeeded
    Persisted {
        page_id: String,
        at: DateTime<Utc>,
    },

    /// The debounced write of a snapshot failed; local state is unchanged
    PersistFailed {
        page_id: String,
        error: String,
        at: DateTime<Utc>,
    },

    /// A single node attribute write (emoji, caption) failed
    FieldPersistFailed {
        node_id: String,
        field: &'static str,
        error: String,
    },
}

impl PageEvent {
    /// Get a string representation of the event type
    pub fn event_type(&self) -> &str {
        match self {
            PageEvent::Changed { .. } => "page:changed",
            PageEvent::Persisted { .. } => "page:persisted",
            PageEvent::PersistFailed { .. } => "page:persist-failed",
            PageEvent::FieldPersistFailed { .. } => "node:field-persist-failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_types() {
        let persisted = PageEvent::Persisted {
            page_id: "p".to_string(),
            at: Utc::now(),
        };
        let failed = PageEvent::FieldPersistFailed {
            node_id: "n".to_string(),
            field: "emoji",
            error: "offline".to_string(),
        };
        assert_eq!(persisted.event_type(), "page:persisted");
        assert_eq!(failed.event_type(), "node:field-persist-failed");
    }
}
