//! hilite: Terminal annotation and search for decision documents
//!
//! This library provides the engine behind the `hilite` viewer: persistent
//! user highlights and notes over an immutable decision body, live
//! substring search, and the segment merge that turns both span sources
//! into renderable text runs with scroll targeting.

pub mod annotate;
pub mod decision;
pub mod export;
pub mod theme;
pub mod widgets;

/// Export format options
#[derive(clap::ValueEnum, Clone)]
pub enum ExportFormat {
    Markdown,
    Text,
    Json,
    Ansi,
}

/// Color depth options for ANSI export
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum ColorDepth {
    /// Auto-detect terminal color capabilities
    Auto,
    /// Monochrome (no colors)
    #[value(name = "1")]
    Monochrome,
    /// 16 colors
    #[value(name = "4")]
    Standard,
    /// 256 colors
    #[value(name = "8")]
    Extended,
    /// 24-bit true color
    #[value(name = "24")]
    TrueColor,
}

// Re-export commonly used types
pub use annotate::{AnnotationStore, Navigator, SearchEngine, Segment};
pub use decision::{Decision, load_decision};
