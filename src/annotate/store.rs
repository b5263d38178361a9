//! Session-local stores for highlights and notes
//!
//! Highlights are the only persistent span source in the engine: created
//! from captured selections, deleted explicitly, never mutated in place.
//! Notes share the same id machinery but carry no offsets. Both
//! collections are plain data: an external persistence layer hands a
//! saved set in through `replace_*` and receives the current set back on
//! save.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::span::{AnnotationError, Span, char_len};

/// Color assigned to new highlights.
pub const HIGHLIGHT_COLOR: &str = "#FFD700";

/// A persistent, user-created span over the decision body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub id: String,
    pub start: usize,
    pub end: usize,
    /// Cached substring; equals the body slice at creation time.
    pub text: String,
    pub color: String,
}

/// A free-standing annotation, not tied to an offset range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub text: String,
}

/// Plain-data envelope handed to and from an external store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedAnnotations {
    pub highlights: Vec<Highlight>,
    pub notes: Vec<Note>,
}

fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// One viewing session's highlights and notes, bound to the decision
/// body at construction so ranges can be validated against it.
#[derive(Debug)]
pub struct AnnotationStore {
    body_len: usize,
    highlights: Vec<Highlight>,
    notes: Vec<Note>,
    highlight_mode: bool,
}

impl AnnotationStore {
    pub fn for_text(body: &str) -> Self {
        AnnotationStore {
            body_len: char_len(body),
            highlights: Vec::new(),
            notes: Vec::new(),
            highlight_mode: false,
        }
    }

    /// Add a highlight covering `span`, with `text` the selected
    /// substring. Returns the stored entry with its fresh id.
    ///
    /// Overlapping highlights are permitted and stored as separate
    /// entries; a user may mark overlapping passages for different
    /// purposes. The range itself is validated against the body.
    pub fn add_highlight(
        &mut self,
        span: Span,
        text: String,
    ) -> Result<Highlight, AnnotationError> {
        span.validate(self.body_len)?;
        let highlight = Highlight {
            id: generate_id(),
            start: span.start,
            end: span.end,
            text,
            color: HIGHLIGHT_COLOR.to_string(),
        };
        self.highlights.push(highlight.clone());
        Ok(highlight)
    }

    /// Remove a highlight by id. Unknown ids are ignored, so removing
    /// twice is the same as removing once.
    pub fn remove_highlight(&mut self, id: &str) {
        self.highlights.retain(|h| h.id != id);
    }

    /// Wholesale overwrite from a previously saved set. Entries whose
    /// ranges no longer fit the body are dropped rather than refused, so
    /// a stale save cannot poison the session.
    pub fn replace_highlights(&mut self, highlights: Vec<Highlight>) {
        self.highlights = highlights
            .into_iter()
            .filter(|h| Span::new(h.start, h.end).validate(self.body_len).is_ok())
            .collect();
    }

    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    pub fn find_highlight(&self, id: &str) -> Option<&Highlight> {
        self.highlights.iter().find(|h| h.id == id)
    }

    /// Highlight mode arms selection capture. Toggled explicitly, never
    /// timed out.
    pub fn toggle_highlight_mode(&mut self) {
        self.highlight_mode = !self.highlight_mode;
    }

    pub fn highlight_mode(&self) -> bool {
        self.highlight_mode
    }

    /// Add a note. Whitespace-only notes are ignored.
    pub fn add_note(&mut self, text: &str) -> Option<Note> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let note = Note {
            id: generate_id(),
            text: trimmed.to_string(),
        };
        self.notes.push(note.clone());
        Some(note)
    }

    /// Remove a note by id; unknown ids are ignored.
    pub fn remove_note(&mut self, id: &str) {
        self.notes.retain(|n| n.id != id);
    }

    pub fn replace_notes(&mut self, notes: Vec<Note>) {
        self.notes = notes;
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Current collections as a plain-data envelope for an external
    /// store.
    pub fn to_saved(&self) -> SavedAnnotations {
        SavedAnnotations {
            highlights: self.highlights.clone(),
            notes: self.notes.clone(),
        }
    }

    /// Load both collections from a saved envelope.
    pub fn load_saved(&mut self, saved: SavedAnnotations) {
        self.replace_highlights(saved.highlights);
        self.replace_notes(saved.notes);
    }
}
