//! Caret and selection helpers
//!
//! Hosts report caret offsets in UTF-16 code units (the unit text editing
//! surfaces use). Rust strings are UTF-8, so every slice goes through the
//! conversions below. Offsets past the end clamp to the end; offsets that land
//! inside a surrogate pair snap down to the start of that character.

use serde::{Deserialize, Serialize};

/// Selection inside a single node, as reported by the host
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextSelection {
    /// Where the selection started (UTF-16 offset)
    pub anchor: usize,

    /// Where the selection ends, possibly before `anchor` (UTF-16 offset)
    pub focus: usize,

    /// Stringified selection content, when the host can provide it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl TextSelection {
    /// A collapsed caret at `offset`
    pub fn caret(offset: usize) -> Self {
        Self {
            anchor: offset,
            focus: offset,
            text: None,
        }
    }

    pub fn range(anchor: usize, focus: usize) -> Self {
        Self {
            anchor,
            focus,
            text: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Lower bound regardless of selection direction
    pub fn start(&self) -> usize {
        self.anchor.min(self.focus)
    }

    /// Upper bound regardless of selection direction
    pub fn end(&self) -> usize {
        self.anchor.max(self.focus)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

/// Where to put the caret when a deferred focus is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaretTarget {
    Start,
    End,
    /// UTF-16 offset, clamped to the text length
    Offset(usize),
    /// Focus without moving the caret
    Keep,
}

/// Length of `text` in UTF-16 code units
///
/// # Examples
///
/// ```rust
/// # use pageblocks_core::editor::utf16_len;
/// assert_eq!(utf16_len("prev"), 4);
/// assert_eq!(utf16_len("a😀"), 3);
/// ```
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Byte index in `text` for a UTF-16 offset
pub fn utf16_to_byte(text: &str, offset: usize) -> usize {
    let mut units = 0;
    for (byte_index, ch) in text.char_indices() {
        if units + ch.len_utf16() > offset {
            return byte_index;
        }
        units += ch.len_utf16();
    }
    text.len()
}

/// Split `text` at a UTF-16 offset
///
/// # Examples
///
/// ```rust
/// # use pageblocks_core::editor::split_at_utf16;
/// assert_eq!(split_at_utf16("hello", 2), ("he", "llo"));
/// assert_eq!(split_at_utf16("hello", 99), ("hello", ""));
/// ```
pub fn split_at_utf16(text: &str, offset: usize) -> (&str, &str) {
    text.split_at(utf16_to_byte(text, offset))
}
