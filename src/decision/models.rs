//! Core data structures for decision documents
//!
//! A decision is a single plain-text document: the citation, the
//! immutable body every annotation offset is measured against, and file
//! metadata for the viewer's status displays.

use serde::{Deserialize, Serialize};

use crate::annotate::char_len;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub citation: String,
    pub body: String,
    pub metadata: DecisionMetadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionMetadata {
    pub file_path: String,
    pub file_size: u64,
    pub char_count: usize,
    pub word_count: usize,
    pub page_count: usize,
}

impl Decision {
    /// Build a decision directly from text, for callers that already
    /// hold the body in memory.
    pub fn from_text(citation: impl Into<String>, body: impl Into<String>) -> Self {
        let body = body.into();
        let word_count = body.split_whitespace().count();
        Decision {
            citation: citation.into(),
            metadata: DecisionMetadata {
                file_path: String::new(),
                file_size: body.len() as u64,
                char_count: char_len(&body),
                word_count,
                page_count: estimate_page_count(word_count),
            },
            body,
        }
    }
}

pub(crate) fn estimate_page_count(word_count: usize) -> usize {
    // Rough estimate: 250 words per page
    (word_count as f32 / 250.0).ceil() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_counts() {
        let decision = Decision::from_text("21-12347", "the cat sat on the mat");
        assert_eq!(decision.citation, "21-12347");
        assert_eq!(decision.metadata.char_count, 22);
        assert_eq!(decision.metadata.word_count, 6);
        assert_eq!(decision.metadata.page_count, 1);
    }

    #[test]
    fn test_page_estimate() {
        assert_eq!(estimate_page_count(0), 0);
        assert_eq!(estimate_page_count(250), 1);
        assert_eq!(estimate_page_count(251), 2);
        assert_eq!(estimate_page_count(1000), 4);
    }
}
