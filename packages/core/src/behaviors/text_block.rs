//! Text-like block behavior
//!
//! Governs text, heading1-3, list and numberedList blocks. Caret offsets are
//! UTF-16 code units; when the host reports no selection the caret is assumed
//! to be at the end of the text.
//!
//! | Key       | Condition                                 | Outcome               |
//! |-----------|-------------------------------------------|-----------------------|
//! | Enter     | text starts with `/`                      | `Consumed`            |
//! | Enter     | caret at 0                                | `InsertEmptyBefore`   |
//! | Enter     | caret at end                              | `InsertEmptyAfter`    |
//! | Enter     | caret inside                              | `Split`               |
//! | Backspace | whole text selected, or text empty        | `DeleteNode`          |
//! | Backspace | collapsed at 0, previous block exists     | `MergeWithPrevious`   |
//! | Backspace | collapsed at 0 on the first block         | `Consumed`            |
//! | Delete    | caret at end, next block exists           | `MergeWithNext`       |
//! | other     |                                           | `Native`              |

use crate::behaviors::{BlockBehavior, BlockContext, EditOutcome, Key};
use crate::editor::{split_at_utf16, utf16_len};

#[derive(Debug, Clone, Copy, Default)]
pub struct TextBlockBehavior;

impl TextBlockBehavior {
    fn on_enter(ctx: &BlockContext<'_>) -> EditOutcome {
        if ctx.text.starts_with('/') {
            return EditOutcome::Consumed;
        }

        let len = utf16_len(ctx.text);
        let caret = ctx
            .selection
            .map(|selection| selection.start())
            .unwrap_or(len)
            .min(len);

        if caret == 0 {
            return EditOutcome::InsertEmptyBefore;
        }
        if caret == len {
            return EditOutcome::InsertEmptyAfter;
        }

        let (before, after) = split_at_utf16(ctx.text, caret);
        EditOutcome::Split {
            before: before.to_string(),
            after: after.to_string(),
        }
    }

    fn on_backspace(ctx: &BlockContext<'_>) -> EditOutcome {
        let len = utf16_len(ctx.text);
        let (start, end) = ctx
            .selection
            .map(|selection| (selection.start(), selection.end()))
            .unwrap_or((len, len));

        let all_selected = (start == 0 && end == len && len > 0)
            || ctx
                .selection
                .and_then(|selection| selection.text.as_deref())
                .is_some_and(|selected| selected == ctx.text);

        if all_selected || len == 0 {
            return EditOutcome::DeleteNode {
                refocus_previous: true,
            };
        }

        if start == 0 && end == 0 {
            return match ctx.previous_text {
                Some(previous) => EditOutcome::MergeWithPrevious {
                    merged: format!("{}{}", previous, ctx.text),
                    boundary: utf16_len(previous),
                },
                None => EditOutcome::Consumed,
            };
        }

        EditOutcome::Native
    }

    fn on_delete(ctx: &BlockContext<'_>) -> EditOutcome {
        let len = utf16_len(ctx.text);
        let caret = ctx
            .selection
            .map(|selection| selection.start())
            .unwrap_or(len);

        match ctx.next_text {
            Some(next) if caret >= len => EditOutcome::MergeWithNext {
                merged: format!("{}{}", ctx.text, next),
                caret: len,
            },
            _ => EditOutcome::Native,
        }
    }
}

impl BlockBehavior for TextBlockBehavior {
    fn name(&self) -> &'static str {
        "text"
    }

    fn on_key(&self, key: &Key, ctx: &BlockContext<'_>) -> EditOutcome {
        match key {
            Key::Enter => Self::on_enter(ctx),
            Key::Backspace => Self::on_backspace(ctx),
            Key::Delete => Self::on_delete(ctx),
            _ => EditOutcome::Native,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::TextSelection;
    use crate::models::{Node, NodeType};

    fn resolve(
        key: Key,
        text: &str,
        selection: Option<TextSelection>,
        previous: Option<&str>,
        next: Option<&str>,
    ) -> EditOutcome {
        let node = Node::new(NodeType::Text, text);
        let ctx = BlockContext {
            index: if previous.is_some() { 1 } else { 0 },
            node: &node,
            text,
            selection: selection.as_ref(),
            previous_text: previous,
            next_text: next,
        };
        TextBlockBehavior.on_key(&key, &ctx)
    }

    #[test]
    fn test_enter_at_start_inserts_before() {
        let outcome = resolve(Key::Enter, "hello", Some(TextSelection::caret(0)), None, None);
        assert_eq!(outcome, EditOutcome::InsertEmptyBefore);
    }

    #[test]
    fn test_enter_at_end_inserts_after() {
        let outcome = resolve(Key::Enter, "hello", Some(TextSelection::caret(5)), None, None);
        assert_eq!(outcome, EditOutcome::InsertEmptyAfter);
    }

    #[test]
    fn test_enter_inside_splits() {
        let outcome = resolve(Key::Enter, "hello", Some(TextSelection::caret(2)), None, None);
        assert_eq!(
            outcome,
            EditOutcome::Split {
                before: "he".to_string(),
                after: "llo".to_string()
            }
        );
    }

    #[test]
    fn test_split_parts_concatenate_to_text() {
        let text = "grüße 😀 welt";
        for caret in 1..utf16_len(text) {
            if let EditOutcome::Split { before, after } =
                resolve(Key::Enter, text, Some(TextSelection::caret(caret)), None, None)
            {
                assert_eq!(format!("{}{}", before, after), text);
            }
        }
    }

    #[test]
    fn test_enter_without_selection_uses_end_of_text() {
        let outcome = resolve(Key::Enter, "hello", None, None, None);
        assert_eq!(outcome, EditOutcome::InsertEmptyAfter);
    }

    #[test]
    fn test_enter_on_slash_text_is_consumed() {
        let outcome = resolve(Key::Enter, "/head", Some(TextSelection::caret(2)), None, None);
        assert_eq!(outcome, EditOutcome::Consumed);
    }

    #[test]
    fn test_backspace_all_selected_deletes() {
        let outcome = resolve(
            Key::Backspace,
            "hello",
            Some(TextSelection::range(5, 0)),
            None,
            None,
        );
        assert_eq!(
            outcome,
            EditOutcome::DeleteNode {
                refocus_previous: true
            }
        );
    }

    #[test]
    fn test_backspace_selection_text_equal_to_block_deletes() {
        let selection = TextSelection::range(0, 2).with_text("hi");
        let outcome = resolve(Key::Backspace, "hi", Some(selection), Some("p"), None);
        assert!(matches!(outcome, EditOutcome::DeleteNode { .. }));
    }

    #[test]
    fn test_backspace_on_empty_deletes() {
        let outcome = resolve(Key::Backspace, "", Some(TextSelection::caret(0)), Some("p"), None);
        assert!(matches!(outcome, EditOutcome::DeleteNode { .. }));
    }

    #[test]
    fn test_backspace_at_start_merges_with_previous() {
        let outcome = resolve(
            Key::Backspace,
            "current",
            Some(TextSelection::caret(0)),
            Some("prev"),
            None,
        );
        assert_eq!(
            outcome,
            EditOutcome::MergeWithPrevious {
                merged: "prevcurrent".to_string(),
                boundary: 4
            }
        );
    }

    #[test]
    fn test_backspace_boundary_counts_utf16_units() {
        let outcome = resolve(
            Key::Backspace,
            "b",
            Some(TextSelection::caret(0)),
            Some("a😀"),
            None,
        );
        assert!(matches!(outcome, EditOutcome::MergeWithPrevious { boundary: 3, .. }));
    }

    #[test]
    fn test_backspace_at_start_of_first_block_is_consumed() {
        let outcome = resolve(Key::Backspace, "first", Some(TextSelection::caret(0)), None, None);
        assert_eq!(outcome, EditOutcome::Consumed);
    }

    #[test]
    fn test_backspace_inside_text_is_native() {
        let outcome = resolve(Key::Backspace, "hello", Some(TextSelection::caret(3)), Some("p"), None);
        assert_eq!(outcome, EditOutcome::Native);

        let partial = resolve(Key::Backspace, "hello", Some(TextSelection::range(0, 2)), Some("p"), None);
        assert_eq!(partial, EditOutcome::Native);
    }

    #[test]
    fn test_delete_at_end_merges_with_next() {
        let outcome = resolve(Key::Delete, "Curr", Some(TextSelection::caret(4)), None, Some("Next"));
        assert_eq!(
            outcome,
            EditOutcome::MergeWithNext {
                merged: "CurrNext".to_string(),
                caret: 4
            }
        );
    }

    #[test]
    fn test_delete_on_last_block_or_inside_is_native() {
        assert_eq!(
            resolve(Key::Delete, "Curr", Some(TextSelection::caret(4)), None, None),
            EditOutcome::Native
        );
        assert_eq!(
            resolve(Key::Delete, "Curr", Some(TextSelection::caret(1)), None, Some("Next")),
            EditOutcome::Native
        );
    }

    #[test]
    fn test_other_keys_are_native() {
        assert_eq!(
            resolve(Key::Character('a'), "x", None, None, None),
            EditOutcome::Native
        );
        assert_eq!(resolve(Key::ArrowLeft, "x", None, None, None), EditOutcome::Native);
    }

    #[test]
    fn test_input_is_a_value_change() {
        let node = Node::new(NodeType::Text, "");
        let ctx = BlockContext {
            index: 0,
            node: &node,
            text: "",
            selection: None,
            previous_text: None,
            next_text: None,
        };
        assert_eq!(
            TextBlockBehavior.on_input("typed", &ctx),
            EditOutcome::ValueChange("typed".to_string())
        );
    }
}
