//! Merging highlight and search spans into renderable segments
//!
//! The builder turns the two independent span sources into one ordered,
//! gap-free sequence of text runs. Spans sort stably by start index with
//! highlights enqueued ahead of search matches, so at an equal start the
//! user highlight wins; each span is then clipped to the unconsumed
//! suffix `[cursor, end)` and a span clipped to nothing emits no
//! segment. The emitted segments therefore partition the body exactly:
//! concatenating their text reproduces it character for character, which
//! is the invariant selection capture depends on.

use super::search::SearchMatch;
use super::span::{char_len, slice_chars};
use super::store::Highlight;

/// Color applied to pending (non-current) search matches.
pub const SEARCH_MATCH_COLOR: &str = "#FFC0CB";

/// Identity of the span a styled segment was cut from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentSource {
    /// A persistent user highlight, keyed by store id.
    Highlight { id: String },
    /// A search match, keyed by its position in enumeration order.
    SearchMatch { index: usize },
}

/// One renderable slice of the decision body.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Plain {
        text: String,
        start: usize,
    },
    Styled {
        text: String,
        start: usize,
        source: SegmentSource,
        color: String,
    },
}

impl Segment {
    pub fn text(&self) -> &str {
        match self {
            Segment::Plain { text, .. } | Segment::Styled { text, .. } => text,
        }
    }

    pub fn start(&self) -> usize {
        match self {
            Segment::Plain { start, .. } | Segment::Styled { start, .. } => *start,
        }
    }

    pub fn source(&self) -> Option<&SegmentSource> {
        match self {
            Segment::Plain { .. } => None,
            Segment::Styled { source, .. } => Some(source),
        }
    }
}

struct TaggedSpan {
    start: usize,
    end: usize,
    source: SegmentSource,
    color: String,
}

/// Merge highlights and search matches over `text` into an ordered,
/// gap-free segment sequence.
///
/// Highlights keep their stored color; search matches get
/// [`SEARCH_MATCH_COLOR`]. Styled search segments carry the match's
/// enumeration index so a renderer can register scroll targets and
/// emphasize the current match.
pub fn build_segments(
    text: &str,
    highlights: &[Highlight],
    matches: &[SearchMatch],
) -> Vec<Segment> {
    let mut spans: Vec<TaggedSpan> = Vec::with_capacity(highlights.len() + matches.len());
    for highlight in highlights {
        spans.push(TaggedSpan {
            start: highlight.start,
            end: highlight.end,
            source: SegmentSource::Highlight {
                id: highlight.id.clone(),
            },
            color: highlight.color.clone(),
        });
    }
    for (index, m) in matches.iter().enumerate() {
        spans.push(TaggedSpan {
            start: m.start,
            end: m.end,
            source: SegmentSource::SearchMatch { index },
            color: SEARCH_MATCH_COLOR.to_string(),
        });
    }
    // Highlights were pushed first, so the stable sort keeps them ahead
    // of search matches that start at the same offset.
    spans.sort_by_key(|span| span.start);

    let len = char_len(text);
    let mut segments = Vec::new();
    let mut cursor = 0;

    for span in spans {
        // Clip to the unconsumed suffix; a span the sweep has already
        // passed emits nothing.
        let start = span.start.max(cursor);
        let end = span.end.min(len);
        if start >= end {
            continue;
        }
        if start > cursor {
            segments.push(Segment::Plain {
                text: slice_chars(text, cursor, start).to_string(),
                start: cursor,
            });
        }
        segments.push(Segment::Styled {
            text: slice_chars(text, start, end).to_string(),
            start,
            source: span.source,
            color: span.color,
        });
        cursor = end;
    }

    if cursor < len {
        segments.push(Segment::Plain {
            text: slice_chars(text, cursor, len).to_string(),
            start: cursor,
        });
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::search::find_matches;

    fn highlight(id: &str, start: usize, end: usize, text: &str) -> Highlight {
        Highlight {
            id: id.to_string(),
            start,
            end,
            text: text.to_string(),
            color: "#FFD700".to_string(),
        }
    }

    fn concat(segments: &[Segment]) -> String {
        segments.iter().map(Segment::text).collect()
    }

    #[test]
    fn test_single_highlight_three_segments() {
        let text = "the cat sat on the mat";
        let highlights = [highlight("h1", 4, 7, "cat")];
        let segments = build_segments(text, &highlights, &[]);

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].text(), "the ");
        assert_eq!(segments[1].text(), "cat");
        assert_eq!(segments[2].text(), " sat on the mat");
        assert_eq!(
            segments[1].source(),
            Some(&SegmentSource::Highlight { id: "h1".into() })
        );
    }

    #[test]
    fn test_concatenation_reproduces_text() {
        let text = "the cat sat on the mat";
        let highlights = [highlight("h1", 4, 7, "cat"), highlight("h2", 12, 14, "on")];
        let matches = find_matches(text, "the");
        let segments = build_segments(text, &highlights, &matches);
        assert_eq!(concat(&segments), text);
    }

    #[test]
    fn test_concatenation_holds_for_overlaps() {
        let text = "the cat sat on the mat";
        // Highlight [4, 11) overlaps match-like highlight [8, 14)
        let highlights = [
            highlight("h1", 4, 11, "cat sat"),
            highlight("h2", 8, 14, "sat on"),
        ];
        let segments = build_segments(text, &highlights, &[]);
        assert_eq!(concat(&segments), text, "clipping must never lose or repeat text");
        // The second highlight keeps only its unconsumed tail
        assert_eq!(segments[2].text(), " on");
    }

    #[test]
    fn test_exact_duplicate_highlights_render_once() {
        let text = "cats";
        let highlights = [highlight("a", 0, 3, "cat"), highlight("b", 0, 3, "cat")];
        let segments = build_segments(text, &highlights, &[]);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text(), "cat");
        assert_eq!(
            segments[0].source(),
            Some(&SegmentSource::Highlight { id: "a".into() })
        );
        assert_eq!(segments[1].text(), "s");
        assert_eq!(concat(&segments), text);
    }

    #[test]
    fn test_highlight_wins_at_equal_start() {
        let text = "the cat";
        let highlights = [highlight("h1", 0, 3, "the")];
        let matches = find_matches(text, "the cat");
        let segments = build_segments(text, &highlights, &matches);

        // Highlight takes [0, 3); the longer match keeps its tail
        assert_eq!(segments[0].text(), "the");
        assert_eq!(
            segments[0].source(),
            Some(&SegmentSource::Highlight { id: "h1".into() })
        );
        assert_eq!(segments[1].text(), " cat");
        assert_eq!(
            segments[1].source(),
            Some(&SegmentSource::SearchMatch { index: 0 })
        );
        assert_eq!(concat(&segments), text);
    }

    #[test]
    fn test_match_swallowed_by_highlight_emits_nothing() {
        let text = "the cat sat";
        let highlights = [highlight("h1", 0, 11, "the cat sat")];
        let matches = find_matches(text, "cat");
        let segments = build_segments(text, &highlights, &matches);

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text(), text);
        assert!(
            segments
                .iter()
                .all(|s| !matches!(s.source(), Some(SegmentSource::SearchMatch { .. }))),
            "a fully covered match must not produce a segment"
        );
    }

    #[test]
    fn test_search_segments_keep_enumeration_order() {
        let text = "the cat sat on the mat";
        let matches = find_matches(text, "the");
        let segments = build_segments(text, &[], &matches);

        let indices: Vec<usize> = segments
            .iter()
            .filter_map(|s| match s.source() {
                Some(SegmentSource::SearchMatch { index }) => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(concat(&segments), text);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(build_segments("", &[], &[]).is_empty());

        let segments = build_segments("plain text", &[], &[]);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text(), "plain text");
        assert_eq!(segments[0].start(), 0);
    }
}
