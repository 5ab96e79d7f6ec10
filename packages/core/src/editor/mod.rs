//! Editor Module
//!
//! Everything between the host's rendered blocks and the synced page state:
//!
//! - `EditorSession` - Routes keys, input, and clicks; applies edit outcomes
//! - `FocusCoordinator` - Focused block index and vertical arrow navigation
//! - `CommandPanel` - Slash-command type switcher
//! - `NodeRegistry` / `NodeHandle` - Host-side handles of the rendered blocks
//! - `FrameQueue` - Focus and caret placement deferred until after a render
//! - Caret helpers working in UTF-16 offsets

mod caret;
mod command_panel;
mod error;
mod focus;
mod frame_queue;
mod registry;
mod session;

pub use caret::{split_at_utf16, utf16_len, utf16_to_byte, CaretTarget, TextSelection};
pub use command_panel::{
    match_command, CommandEntry, CommandPanel, CommandPanelFlag, COMMAND_CATALOG,
};
pub use error::EditorError;
pub use focus::FocusCoordinator;
pub use frame_queue::{DeferredFocus, FrameQueue};
pub use registry::{HeadlessNodeHandle, HeadlessRenderer, NodeHandle, NodeRegistry, RenderHost};
pub use session::{EditorSession, KeyResponse};
