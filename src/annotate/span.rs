//! Character-offset spans over the decision body
//!
//! Every offset in the annotation engine is a character index into the
//! immutable body text, never a byte index. This module owns span
//! validation and the char-based slicing helpers the rest of the engine
//! is built on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A half-open `[start, end)` range of character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Errors raised at the annotation store boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnnotationError {
    #[error("invalid span [{start}, {end}) for a body of {len} characters")]
    InvalidRange {
        start: usize,
        end: usize,
        len: usize,
    },
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Validate against a body of `len` characters: `start < end <= len`.
    pub fn validate(&self, len: usize) -> Result<(), AnnotationError> {
        if self.start >= self.end || self.end > len {
            return Err(AnnotationError::InvalidRange {
                start: self.start,
                end: self.end,
                len,
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Slice `text` by character offsets, clamping out-of-range offsets to
/// the end of the text. An inverted range yields the empty string.
pub fn slice_chars(text: &str, start: usize, end: usize) -> &str {
    if start >= end {
        return "";
    }
    let mut indices = text.char_indices().map(|(i, _)| i);
    let byte_start = match indices.nth(start) {
        Some(i) => i,
        None => return "",
    };
    let byte_end = indices.nth(end - start - 1).unwrap_or(text.len());
    &text[byte_start..byte_end]
}
