use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::annotate::{Segment, SegmentSource};
use crate::theme::Theme;

/// The decision body laid out as wrapped, styled lines, plus the
/// bookkeeping the app needs to target and map them.
///
/// The layout renders the body verbatim: every character of every
/// segment lands in a line (newlines become line breaks), so counting
/// rendered characters recovers canonical offsets, the invariant
/// selection capture depends on.
#[derive(Debug, Clone, Default)]
pub struct DocumentLayout {
    pub lines: Vec<Line<'static>>,
    /// Canonical char offset of each line's first character.
    pub line_offsets: Vec<usize>,
    /// Scroll targets: one entry per visibly rendered styled segment,
    /// in emission order, with the line it starts on.
    pub targets: Vec<(SegmentSource, usize)>,
}

/// Wrap the segment sequence into lines that fit `max_width` display
/// cells.
///
/// Handles unicode grapheme clusters and wide characters the same way
/// the rest of the viewer does; each styled segment keeps a single
/// style, with the current search match emphasized over pending ones.
pub fn layout_document(
    segments: &[Segment],
    max_width: u16,
    theme: &Theme,
    current_match: Option<usize>,
) -> DocumentLayout {
    let max_width = max_width as usize;
    let mut layout = DocumentLayout::default();
    if max_width == 0 {
        return layout;
    }

    let mut current_line: Vec<Span<'static>> = Vec::new();
    let mut current_width = 0usize;
    let mut char_position = 0usize;
    let mut line_start = 0usize;

    for segment in segments {
        let style = segment_style(segment, theme, current_match);
        let mut run = String::new();
        let mut target_line: Option<usize> = None;

        for grapheme in segment.text().graphemes(true) {
            if grapheme == "\n" || grapheme == "\r\n" {
                // The newline is consumed, not rendered; the next line
                // starts past it
                if !run.is_empty() {
                    current_line.push(Span::styled(std::mem::take(&mut run), style));
                }
                char_position += grapheme.chars().count();
                layout.lines.push(Line::from(std::mem::take(&mut current_line)));
                layout.line_offsets.push(line_start);
                current_width = 0;
                line_start = char_position;
                continue;
            }

            let g_width = grapheme.width();
            if current_width + g_width > max_width && current_width > 0 {
                if !run.is_empty() {
                    current_line.push(Span::styled(std::mem::take(&mut run), style));
                }
                layout.lines.push(Line::from(std::mem::take(&mut current_line)));
                layout.line_offsets.push(line_start);
                current_width = 0;
                line_start = char_position;
            }

            if target_line.is_none() {
                target_line = Some(layout.lines.len());
            }
            run.push_str(grapheme);
            current_width += g_width;
            char_position += grapheme.chars().count();
        }

        if !run.is_empty() {
            current_line.push(Span::styled(run, style));
        }
        if let (Some(line), Some(source)) = (target_line, segment.source()) {
            layout.targets.push((source.clone(), line));
        }
    }

    if !current_line.is_empty() {
        layout.lines.push(Line::from(current_line));
        layout.line_offsets.push(line_start);
    }

    // Keep at least one line so the widget and offset mapping stay
    // well-defined for an empty body
    if layout.lines.is_empty() {
        layout.lines.push(Line::from(""));
        layout.line_offsets.push(0);
    }

    layout
}

fn segment_style(segment: &Segment, theme: &Theme, current_match: Option<usize>) -> Style {
    match segment {
        Segment::Plain { .. } => Style::default(),
        Segment::Styled { source, color, .. } => match source {
            SegmentSource::Highlight { .. } => Style::default()
                .bg(theme.get_color(color))
                .fg(theme.get_color(&theme.ui.highlight_fg)),
            SegmentSource::SearchMatch { index } => {
                if current_match == Some(*index) {
                    Style::default()
                        .bg(theme.get_color(&theme.ui.search_current_bg))
                        .fg(theme.get_color(&theme.ui.search_current_fg))
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                        .bg(theme.get_color(&theme.ui.search_match_bg))
                        .fg(theme.get_color(&theme.ui.search_match_fg))
                }
            }
        },
    }
}

/// Map a visual position in the laid-out document to a canonical char
/// offset. `column` is a display-cell offset within the line; a column
/// past the end of the line resolves to the offset just after its last
/// character.
pub fn char_offset_at(layout: &DocumentLayout, line: usize, column: usize) -> Option<usize> {
    let rendered = layout.lines.get(line)?;
    let start = *layout.line_offsets.get(line)?;

    let mut width = 0usize;
    let mut chars = 0usize;
    for span in &rendered.spans {
        for grapheme in span.content.as_ref().graphemes(true) {
            let g_width = grapheme.width();
            if g_width > 0 && column < width + g_width {
                return Some(start + chars);
            }
            width += g_width;
            chars += grapheme.chars().count();
        }
    }
    Some(start + chars)
}

/// Widget that blits a window of the laid-out document.
pub struct DecisionView<'a> {
    layout: &'a DocumentLayout,
    scroll_offset: usize,
}

impl<'a> DecisionView<'a> {
    pub fn new(layout: &'a DocumentLayout) -> Self {
        Self {
            layout,
            scroll_offset: 0,
        }
    }

    /// Set the scroll offset (number of lines to skip from the top)
    pub fn scroll_offset(mut self, offset: usize) -> Self {
        self.scroll_offset = offset;
        self
    }
}

impl Widget for DecisionView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut y = area.y;
        for line in self.layout.lines.iter().skip(self.scroll_offset) {
            if y >= area.y + area.height {
                break;
            }
            buf.set_line(area.x, y, line, area.width);
            y += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::{build_segments, find_matches};

    fn rendered_chars(layout: &DocumentLayout) -> usize {
        layout
            .lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.chars().count())
                    .sum::<usize>()
            })
            .sum()
    }

    #[test]
    fn test_layout_preserves_all_characters() {
        let text = "the cat sat on the mat\nthe dog sat too";
        let segments = build_segments(text, &[], &find_matches(text, "sat"));
        let layout = layout_document(&segments, 10, &Theme::default(), Some(0));

        // Every char is either rendered or consumed as a line break
        let newlines = text.chars().filter(|&c| c == '\n').count();
        assert_eq!(rendered_chars(&layout) + newlines, text.chars().count());
    }

    #[test]
    fn test_layout_registers_search_targets_in_order() {
        let text = "the cat sat on the mat";
        let segments = build_segments(text, &[], &find_matches(text, "the"));
        let layout = layout_document(&segments, 80, &Theme::default(), None);

        let indices: Vec<usize> = layout
            .targets
            .iter()
            .filter_map(|(source, _)| match source {
                SegmentSource::SearchMatch { index } => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_line_offsets_track_newlines() {
        let text = "abc\ndef\nghi";
        let segments = build_segments(text, &[], &[]);
        let layout = layout_document(&segments, 80, &Theme::default(), None);

        assert_eq!(layout.lines.len(), 3);
        assert_eq!(layout.line_offsets, vec![0, 4, 8]);
    }

    #[test]
    fn test_char_offset_mapping() {
        let text = "abc\ndef";
        let segments = build_segments(text, &[], &[]);
        let layout = layout_document(&segments, 80, &Theme::default(), None);

        assert_eq!(char_offset_at(&layout, 0, 0), Some(0));
        assert_eq!(char_offset_at(&layout, 0, 2), Some(2));
        assert_eq!(char_offset_at(&layout, 1, 1), Some(5));
        // Past the end of a line clamps to just after its last char
        assert_eq!(char_offset_at(&layout, 0, 40), Some(3));
        assert_eq!(char_offset_at(&layout, 9, 0), None);
    }

    #[test]
    fn test_wrapping_respects_width() {
        let text = "aaaa bbbb cccc";
        let segments = build_segments(text, &[], &[]);
        let layout = layout_document(&segments, 5, &Theme::default(), None);

        assert!(layout.lines.len() > 1, "narrow width should force wrapping");
        assert_eq!(rendered_chars(&layout), text.chars().count());
    }
}
