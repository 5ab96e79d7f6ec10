//! Behaviors for blocks whose value is a reference (image path, page slug)
//!
//! Neither block is text-editable: every key is swallowed except Backspace,
//! which removes the block, and Enter, which asks the host to act on the
//! reference.

use crate::behaviors::{BlockBehavior, BlockContext, EditOutcome, Key};

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageBlockBehavior;

impl BlockBehavior for ImageBlockBehavior {
    fn name(&self) -> &'static str {
        "image"
    }

    fn on_key(&self, key: &Key, _ctx: &BlockContext<'_>) -> EditOutcome {
        match key {
            Key::Backspace => EditOutcome::DeleteNode {
                refocus_previous: false,
            },
            Key::Enter => EditOutcome::OpenFilePicker,
            _ => EditOutcome::Consumed,
        }
    }

    fn on_input(&self, _text: &str, _ctx: &BlockContext<'_>) -> EditOutcome {
        EditOutcome::Consumed
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PageBlockBehavior;

impl BlockBehavior for PageBlockBehavior {
    fn name(&self) -> &'static str {
        "page"
    }

    fn on_key(&self, key: &Key, ctx: &BlockContext<'_>) -> EditOutcome {
        match key {
            Key::Backspace => EditOutcome::DeleteNode {
                refocus_previous: false,
            },
            Key::Enter => EditOutcome::Navigate {
                slug: ctx.node.value.clone(),
            },
            _ => EditOutcome::Consumed,
        }
    }

    fn on_input(&self, _text: &str, _ctx: &BlockContext<'_>) -> EditOutcome {
        EditOutcome::Consumed
    }
}
