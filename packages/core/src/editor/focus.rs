//! Focus Coordinator
//!
//! Tracks which block has focus as a plain index and moves it with the
//! vertical arrow keys. While a command panel is open the arrows belong to
//! the panel, so the coordinator ignores them.
//!
//! The coordinator does not watch the node list: when blocks are added or
//! removed the session calls `update_focused_index` for the block that should
//! be focused next.

use crate::editor::CommandPanelFlag;

#[derive(Debug, Clone)]
pub struct FocusCoordinator {
    focused_index: Option<usize>,
    panel_flag: CommandPanelFlag,
}

impl FocusCoordinator {
    /// Starts focused on the first block
    pub fn new(panel_flag: CommandPanelFlag) -> Self {
        Self {
            focused_index: Some(0),
            panel_flag,
        }
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focused_index
    }

    /// Move focus one block up. Returns whether the key was handled.
    pub fn arrow_up(&mut self, len: usize) -> bool {
        if self.panel_flag.is_open() || len == 0 {
            return false;
        }
        self.focused_index = Some(match self.focused_index {
            Some(index) => index.saturating_sub(1),
            None => 0,
        });
        true
    }

    /// Move focus one block down. Returns whether the key was handled.
    pub fn arrow_down(&mut self, len: usize) -> bool {
        if self.panel_flag.is_open() || len == 0 {
            return false;
        }
        self.focused_index = Some(match self.focused_index {
            Some(index) => (index + 1).min(len - 1),
            None => 0,
        });
        true
    }

    /// Focus `index` directly, clamped to the node list; an empty list clears focus
    pub fn update_focused_index(&mut self, index: usize, len: usize) {
        self.focused_index = if len == 0 {
            None
        } else {
            Some(index.min(len - 1))
        };
    }

    pub fn clear(&mut self) {
        self.focused_index = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinator() -> (FocusCoordinator, CommandPanelFlag) {
        let flag = CommandPanelFlag::default();
        (FocusCoordinator::new(flag.clone()), flag)
    }

    #[test]
    fn test_starts_at_zero() {
        let (focus, _) = coordinator();
        assert_eq!(focus.focused_index(), Some(0));
    }

    #[test]
    fn test_arrows_clamp_to_bounds() {
        let (mut focus, _) = coordinator();

        assert!(focus.arrow_up(3));
        assert_eq!(focus.focused_index(), Some(0));

        focus.arrow_down(3);
        focus.arrow_down(3);
        focus.arrow_down(3);
        assert_eq!(focus.focused_index(), Some(2));
    }

    #[test]
    fn test_arrows_ignored_while_panel_open() {
        let (mut focus, flag) = coordinator();
        flag.set_open(true);

        assert!(!focus.arrow_down(3));
        assert_eq!(focus.focused_index(), Some(0));

        flag.set_open(false);
        assert!(focus.arrow_down(3));
        assert_eq!(focus.focused_index(), Some(1));
    }

    #[test]
    fn test_from_no_focus_arrows_go_to_first() {
        let (mut focus, _) = coordinator();
        focus.clear();
        focus.arrow_up(2);
        assert_eq!(focus.focused_index(), Some(0));

        focus.clear();
        focus.arrow_down(2);
        assert_eq!(focus.focused_index(), Some(0));
    }

    #[test]
    fn test_update_clamps_and_empty_clears() {
        let (mut focus, _) = coordinator();

        focus.update_focused_index(7, 3);
        assert_eq!(focus.focused_index(), Some(2));

        focus.update_focused_index(0, 0);
        assert_eq!(focus.focused_index(), None);
    }

    #[test]
    fn test_no_proactive_clamp_when_list_shrinks() {
        let (mut focus, _) = coordinator();
        focus.update_focused_index(4, 5);

        // The list shrank to 2 blocks but nobody told the coordinator
        assert_eq!(focus.focused_index(), Some(4));
        focus.arrow_down(2);
        assert_eq!(focus.focused_index(), Some(1));
    }
}
