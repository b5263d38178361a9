//! Decision file loading and validation
//!
//! Decisions arrive as plain-text exports named after their citation,
//! e.g. `21-12347.txt`. The loader validates the extension up front and
//! derives the citation from the file stem.

use anyhow::{Context, Result, bail};
use std::path::Path;

use super::models::{Decision, DecisionMetadata, estimate_page_count};
use crate::annotate::char_len;

/// Validates that the path points at a plain-text decision file
pub(crate) fn validate_decision_file(file_path: &Path) -> Result<()> {
    let extension = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    if extension != "txt" {
        bail!(
            "Invalid file format. Expected .txt file, got .{}\n\
            Note: hilite only reads plain-text decision exports (not .docx, .pdf, etc.)",
            extension
        );
    }

    Ok(())
}

/// Citation derived from the file stem, e.g. `21-12347.txt` -> `21-12347`.
pub(crate) fn citation_from_path(file_path: &Path) -> String {
    file_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("Unknown")
        .to_string()
}

/// Load a decision document from disk.
pub async fn load_decision(file_path: &Path) -> Result<Decision> {
    validate_decision_file(file_path)?;

    let file_metadata = tokio::fs::metadata(file_path)
        .await
        .with_context(|| format!("Failed to stat decision file: {}", file_path.display()))?;
    let body = tokio::fs::read_to_string(file_path)
        .await
        .with_context(|| format!("Failed to read decision file: {}", file_path.display()))?;

    let word_count = body.split_whitespace().count();
    Ok(Decision {
        citation: citation_from_path(file_path),
        metadata: DecisionMetadata {
            file_path: file_path.display().to_string(),
            file_size: file_metadata.len(),
            char_count: char_len(&body),
            word_count,
            page_count: estimate_page_count(word_count),
        },
        body,
    })
}
