//! Converting host text selections into canonical offsets
//!
//! The host's rendering layer reports a selection as an explicit payload
//! rather than the engine reading ambient selection state, so the offset
//! arithmetic is a pure function of the event and testable without a
//! renderer.

use super::span::{AnnotationError, Span, char_len};
use super::store::{AnnotationStore, Highlight};

/// A non-collapsed selection reported by the host's rendering layer.
///
/// `preceding_chars` counts the rendered characters before the start of
/// the selection, in document order. That count equals the canonical
/// start offset only because rendering preserves the body verbatim: the
/// concatenated segment text is exactly the decision body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEvent {
    pub selected_text: String,
    pub preceding_chars: usize,
}

impl SelectionEvent {
    /// Canonical span covered by the selection.
    pub fn span(&self) -> Span {
        let start = self.preceding_chars;
        Span::new(start, start + char_len(&self.selected_text))
    }
}

/// Resolve a selection into a stored highlight.
///
/// Only acts while highlight mode is armed; selections that resolve to
/// an empty string are ignored. Returns the created highlight so the
/// host can clear its selection and re-render, or `None` when the event
/// was ignored.
pub fn capture_selection(
    store: &mut AnnotationStore,
    event: &SelectionEvent,
) -> Result<Option<Highlight>, AnnotationError> {
    if !store.highlight_mode() {
        return Ok(None);
    }
    if event.selected_text.is_empty() {
        return Ok(None);
    }
    let highlight = store.add_highlight(event.span(), event.selected_text.clone())?;
    Ok(Some(highlight))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_resolves_char_offsets() {
        let event = SelectionEvent {
            selected_text: "cat".into(),
            preceding_chars: 4,
        };
        assert_eq!(event.span(), Span::new(4, 7));
    }

    #[test]
    fn test_capture_requires_highlight_mode() {
        let mut store = AnnotationStore::for_text("the cat sat");
        let event = SelectionEvent {
            selected_text: "cat".into(),
            preceding_chars: 4,
        };

        let captured = capture_selection(&mut store, &event).unwrap();
        assert!(captured.is_none(), "capture must be a no-op while disarmed");

        store.toggle_highlight_mode();
        let captured = capture_selection(&mut store, &event).unwrap();
        let highlight = captured.expect("armed capture should add a highlight");
        assert_eq!(highlight.start, 4);
        assert_eq!(highlight.end, 7);
        assert_eq!(highlight.text, "cat");
        assert_eq!(store.highlights().len(), 1);
    }

    #[test]
    fn test_capture_ignores_empty_selection() {
        let mut store = AnnotationStore::for_text("the cat sat");
        store.toggle_highlight_mode();
        let event = SelectionEvent {
            selected_text: String::new(),
            preceding_chars: 2,
        };
        let captured = capture_selection(&mut store, &event).unwrap();
        assert!(captured.is_none());
        assert!(store.highlights().is_empty());
    }

    #[test]
    fn test_capture_rejects_out_of_range_selection() {
        let mut store = AnnotationStore::for_text("short");
        store.toggle_highlight_mode();
        let event = SelectionEvent {
            selected_text: "way past the end".into(),
            preceding_chars: 3,
        };
        assert!(capture_selection(&mut store, &event).is_err());
        assert!(store.highlights().is_empty());
    }
}
