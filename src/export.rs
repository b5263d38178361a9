//! Annotated export of decision documents
//!
//! Renders the segment stream produced by the annotation engine into
//! shareable formats: plain text, Markdown with highlight marks, a JSON
//! envelope of the annotations, and ANSI with highlight colors applied
//! at the requested color depth.

use anyhow::Result;
use crossterm::style::{
    Attribute, Color as CrosstermColor, ResetColor, SetAttribute, SetBackgroundColor,
    SetForegroundColor,
};
use serde_json::json;
use std::fmt::Write;

use crate::annotate::{AnnotationStore, Segment, build_segments};
use crate::decision::Decision;
use crate::{ColorDepth, ExportFormat};

pub struct ExportOptions {
    pub terminal_width: usize,
    pub color_depth: ColorDepth,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            terminal_width: std::env::var("COLUMNS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(80),
            color_depth: ColorDepth::Auto,
        }
    }
}

/// Export a decision together with its session annotations. Search
/// matches never appear in exports; only persistent highlights do.
pub fn export_decision(
    decision: &Decision,
    store: &AnnotationStore,
    format: &ExportFormat,
    options: &ExportOptions,
) -> Result<String> {
    match format {
        ExportFormat::Text => export_to_text(decision, store),
        ExportFormat::Markdown => export_to_markdown(decision, store),
        ExportFormat::Json => export_to_json(decision, store),
        ExportFormat::Ansi => export_to_ansi(decision, store, options),
    }
}

fn export_to_text(decision: &Decision, store: &AnnotationStore) -> Result<String> {
    let mut output = String::new();

    writeln!(output, "Decision Citation: {}", decision.citation)?;
    writeln!(output, "- File: {}", decision.metadata.file_path)?;
    writeln!(output, "- Pages: {}", decision.metadata.page_count)?;
    writeln!(output, "- Words: {}", decision.metadata.word_count)?;
    output.push('\n');
    writeln!(output, "{}", "=".repeat(50))?;
    output.push('\n');

    output.push_str(&decision.body);
    output.push('\n');

    if !store.notes().is_empty() {
        output.push('\n');
        writeln!(output, "Notes:")?;
        for note in store.notes() {
            writeln!(output, "- {}", note.text)?;
        }
    }

    Ok(output)
}

fn export_to_markdown(decision: &Decision, store: &AnnotationStore) -> Result<String> {
    let mut output = String::new();

    writeln!(output, "# Decision {}", decision.citation)?;
    output.push('\n');
    writeln!(output, "- Pages: {}", decision.metadata.page_count)?;
    writeln!(output, "- Words: {}", decision.metadata.word_count)?;
    output.push('\n');
    writeln!(output, "---")?;
    output.push('\n');

    // Highlights become ==marks== inline; overlaps were already resolved
    // by the segment builder
    let segments = build_segments(&decision.body, store.highlights(), &[]);
    for segment in &segments {
        match segment {
            Segment::Plain { text, .. } => output.push_str(text),
            Segment::Styled { text, .. } => {
                output.push_str("==");
                output.push_str(text);
                output.push_str("==");
            }
        }
    }
    output.push('\n');

    if !store.highlights().is_empty() {
        output.push('\n');
        writeln!(output, "## Highlights")?;
        output.push('\n');
        for highlight in store.highlights() {
            writeln!(output, "> {}", highlight.text)?;
            output.push('\n');
        }
    }

    if !store.notes().is_empty() {
        writeln!(output, "## Notes")?;
        output.push('\n');
        for note in store.notes() {
            writeln!(output, "- {}", note.text)?;
        }
    }

    Ok(output)
}

fn export_to_json(decision: &Decision, store: &AnnotationStore) -> Result<String> {
    let value = json!({
        "citation": decision.citation,
        "metadata": decision.metadata,
        "highlights": store.highlights(),
        "notes": store.notes(),
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

fn export_to_ansi(
    decision: &Decision,
    store: &AnnotationStore,
    options: &ExportOptions,
) -> Result<String> {
    let mut output = String::new();

    // Header
    writeln!(
        output,
        "{}Decision Citation: {}{}",
        SetAttribute(Attribute::Bold),
        decision.citation,
        format_ansi_reset()
    )?;
    writeln!(output, "- File: {}", decision.metadata.file_path)?;
    writeln!(output, "- Pages: {}", decision.metadata.page_count)?;
    writeln!(output, "- Words: {}", decision.metadata.word_count)?;
    output.push('\n');

    let separator = "=".repeat(std::cmp::min(50, options.terminal_width));
    writeln!(output, "{separator}")?;
    output.push('\n');

    let segments = build_segments(&decision.body, store.highlights(), &[]);
    for segment in &segments {
        match segment {
            Segment::Plain { text, .. } => output.push_str(text),
            Segment::Styled { text, color, .. } => {
                write!(
                    output,
                    "{}{}{}",
                    format_ansi_highlight(color, options),
                    text,
                    format_ansi_reset()
                )?;
            }
        }
    }
    output.push('\n');

    if !store.notes().is_empty() {
        output.push('\n');
        writeln!(
            output,
            "{}Notes{}",
            SetAttribute(Attribute::Bold),
            format_ansi_reset()
        )?;
        for note in store.notes() {
            writeln!(output, "- {}", note.text)?;
        }
    }

    Ok(output)
}

fn format_ansi_highlight(color_hex: &str, options: &ExportOptions) -> String {
    match convert_hex_to_crossterm_color(color_hex, &options.color_depth) {
        Some(color) => format!(
            "{}{}",
            SetBackgroundColor(color),
            SetForegroundColor(CrosstermColor::Black)
        ),
        None => String::new(),
    }
}

fn format_ansi_reset() -> String {
    format!("{ResetColor}")
}

fn convert_hex_to_crossterm_color(hex: &str, color_depth: &ColorDepth) -> Option<CrosstermColor> {
    // Remove # if present and ensure we have 6 characters
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }

    // Parse RGB components
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    match color_depth {
        ColorDepth::Monochrome => None,
        ColorDepth::Standard => {
            // Convert to 16 colors (approximation)
            let color_index = rgb_to_ansi_16(r, g, b);
            Some(CrosstermColor::AnsiValue(color_index))
        }
        ColorDepth::Extended => {
            // Convert to 256 colors
            let color_index = rgb_to_ansi_256(r, g, b);
            Some(CrosstermColor::AnsiValue(color_index))
        }
        ColorDepth::TrueColor | ColorDepth::Auto => {
            // Use full RGB
            Some(CrosstermColor::Rgb { r, g, b })
        }
    }
}

fn rgb_to_ansi_16(r: u8, g: u8, b: u8) -> u8 {
    // Simple mapping to 16 colors
    let r_bright = r > 127;
    let g_bright = g > 127;
    let b_bright = b > 127;

    let base = match (r > 64, g > 64, b > 64) {
        (false, false, false) => 0, // Black
        (false, false, true) => 4,  // Blue
        (false, true, false) => 2,  // Green
        (false, true, true) => 6,   // Cyan
        (true, false, false) => 1,  // Red
        (true, false, true) => 5,   // Magenta
        (true, true, false) => 3,   // Yellow
        (true, true, true) => 7,    // White
    };

    // Add 8 for bright colors if any component is very bright
    if r_bright || g_bright || b_bright { base + 8 } else { base }
}

fn rgb_to_ansi_256(r: u8, g: u8, b: u8) -> u8 {
    // 256-color conversion
    if r == g && g == b {
        // Grayscale
        if r < 8 {
            16
        } else if r > 247 {
            231
        } else {
            232 + (r - 8) / 10
        }
    } else {
        // Color cube: 16 + 36*r + 6*g + b
        let r_index = (r as f32 / 255.0 * 5.0) as u8;
        let g_index = (g as f32 / 255.0 * 5.0) as u8;
        let b_index = (b as f32 / 255.0 * 5.0) as u8;
        16 + 36 * r_index + 6 * g_index + b_index
    }
}
