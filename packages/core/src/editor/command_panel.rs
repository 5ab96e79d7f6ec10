//! Command Panel Protocol
//!
//! The slash-command menu that switches a block's type. A panel exists while
//! the focused text block's text starts with `/`; its selection follows the
//! typed filter and the arrow keys, and committing an entry changes the
//! block's type.
//!
//! Creating a `CommandPanel` raises the shared [`CommandPanelFlag`] and
//! dropping it lowers the flag again, so the focus coordinator ignores the
//! arrow keys for exactly as long as a panel is alive.

use crate::models::NodeType;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One selectable entry of the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandEntry {
    pub node_type: NodeType,
    pub name: &'static str,
}

/// The fixed catalog, in display order
pub const COMMAND_CATALOG: [CommandEntry; 8] = [
    CommandEntry {
        node_type: NodeType::Text,
        name: "Text",
    },
    CommandEntry {
        node_type: NodeType::List,
        name: "Bulleted List",
    },
    CommandEntry {
        node_type: NodeType::NumberedList,
        name: "Numbered List",
    },
    CommandEntry {
        node_type: NodeType::Page,
        name: "Page",
    },
    CommandEntry {
        node_type: NodeType::Image,
        name: "Image",
    },
    CommandEntry {
        node_type: NodeType::Heading1,
        name: "Heading 1",
    },
    CommandEntry {
        node_type: NodeType::Heading2,
        name: "Heading 2",
    },
    CommandEntry {
        node_type: NodeType::Heading3,
        name: "Heading 3",
    },
];

/// Shared "a command panel is open" flag
#[derive(Debug, Clone, Default)]
pub struct CommandPanelFlag(Arc<AtomicBool>);

impl CommandPanelFlag {
    pub fn is_open(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn set_open(&self, open: bool) {
        self.0.store(open, Ordering::SeqCst);
    }
}

/// Index of the first catalog entry whose type name contains `filter`
///
/// A leading `/` is ignored and matching is case-insensitive.
///
/// # Examples
///
/// ```rust
/// # use pageblocks_core::editor::match_command;
/// assert_eq!(match_command("/im"), Some(4));
/// assert_eq!(match_command("/"), Some(0));
/// assert_eq!(match_command("/NUMBERED"), Some(2));
/// assert_eq!(match_command("/zzz"), None);
/// ```
pub fn match_command(filter: &str) -> Option<usize> {
    let needle = filter.strip_prefix('/').unwrap_or(filter).to_lowercase();
    COMMAND_CATALOG
        .iter()
        .position(|entry| entry.node_type.as_str().to_lowercase().contains(&needle))
}

/// An open slash-command menu
#[derive(Debug)]
pub struct CommandPanel {
    selected: Option<usize>,
    filter: String,
    flag: CommandPanelFlag,
}

impl CommandPanel {
    /// Open a panel filtered by `text` and raise the shared flag
    pub fn open(text: &str, flag: CommandPanelFlag) -> Self {
        flag.set_open(true);
        tracing::debug!("Command panel opened for {:?}", text);
        Self {
            selected: match_command(text),
            filter: text.to_string(),
            flag,
        }
    }

    /// Currently highlighted entry, `None` when the filter matches nothing
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_entry(&self) -> Option<CommandEntry> {
        self.selected.map(|index| COMMAND_CATALOG[index])
    }

    /// Text the current selection was filtered from
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Re-run the filter if the block's text changed
    ///
    /// Unchanged text keeps the arrow-key selection.
    pub fn sync_with_text(&mut self, text: &str) {
        if self.filter == text {
            return;
        }
        self.filter = text.to_string();
        self.selected = match_command(text);
    }

    pub fn arrow_down(&mut self) {
        let len = COMMAND_CATALOG.len();
        self.selected = Some(match self.selected {
            Some(index) => (index + 1) % len,
            None => 0,
        });
    }

    pub fn arrow_up(&mut self) {
        let len = COMMAND_CATALOG.len();
        self.selected = Some(match self.selected {
            Some(index) => (index + len - 1) % len,
            None => len - 1,
        });
    }

    /// Highlight an entry directly (pointer hover or click)
    pub fn select(&mut self, index: usize) -> Option<CommandEntry> {
        let entry = COMMAND_CATALOG.get(index).copied()?;
        self.selected = Some(index);
        Some(entry)
    }
}

impl Drop for CommandPanel {
    fn drop(&mut self) {
        self.flag.set_open(false);
        tracing::debug!("Command panel closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_and_names() {
        let types: Vec<&str> = COMMAND_CATALOG.iter().map(|e| e.node_type.as_str()).collect();
        assert_eq!(
            types,
            vec![
                "text",
                "list",
                "numberedList",
                "page",
                "image",
                "heading1",
                "heading2",
                "heading3"
            ]
        );
        for entry in COMMAND_CATALOG {
            assert_eq!(entry.name, entry.node_type.display_name());
        }
    }

    #[test]
    fn test_filter_matches_first_containing_entry() {
        assert_eq!(match_command("/head"), Some(5));
        assert_eq!(match_command("/heading3"), Some(7));
        assert_eq!(match_command("/list"), Some(1));
        assert_eq!(match_command("/e"), Some(0));
    }

    #[test]
    fn test_flag_follows_panel_lifetime() {
        let flag = CommandPanelFlag::default();
        let panel = CommandPanel::open("/", flag.clone());
        assert!(flag.is_open());

        drop(panel);
        assert!(!flag.is_open());
    }

    #[test]
    fn test_wraparound() {
        let mut panel = CommandPanel::open("/", CommandPanelFlag::default());
        assert_eq!(panel.selected(), Some(0));

        panel.arrow_up();
        assert_eq!(panel.selected(), Some(7));
        panel.arrow_down();
        assert_eq!(panel.selected(), Some(0));
    }

    #[test]
    fn test_arrows_from_no_match() {
        let mut panel = CommandPanel::open("/zzz", CommandPanelFlag::default());
        assert_eq!(panel.selected(), None);
        panel.arrow_down();
        assert_eq!(panel.selected(), Some(0));

        panel.sync_with_text("/zz");
        assert_eq!(panel.selected(), None);
        panel.arrow_up();
        assert_eq!(panel.selected(), Some(7));
    }

    #[test]
    fn test_unchanged_text_keeps_arrow_selection() {
        let mut panel = CommandPanel::open("/", CommandPanelFlag::default());
        panel.arrow_down();
        panel.arrow_down();
        panel.sync_with_text("/");
        assert_eq!(panel.selected(), Some(2));

        panel.sync_with_text("/h");
        assert_eq!(panel.selected(), Some(5));
        assert_eq!(panel.filter(), "/h");
    }

    #[test]
    fn test_sync_and_select() {
        let mut panel = CommandPanel::open("/", CommandPanelFlag::default());
        panel.sync_with_text("/im");
        assert_eq!(panel.selected_entry().map(|e| e.node_type), Some(NodeType::Image));

        assert_eq!(panel.select(3).map(|e| e.name), Some("Page"));
        assert!(panel.select(8).is_none());
        assert_eq!(panel.selected(), Some(3));
    }
}
