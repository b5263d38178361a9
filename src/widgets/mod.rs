mod decision;

pub use decision::{DecisionView, DocumentLayout, char_offset_at, layout_document};

/// Cache for the laid-out document to avoid re-wrapping on every frame
///
/// Keyed by the app's content revision and the available width; a change
/// to either (new highlight, new query, new current match, resized
/// terminal) invalidates the cached layout.
#[derive(Debug, Default)]
pub struct LayoutCache {
    cached: Option<(u64, u16, DocumentLayout)>,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached layout, if it matches the revision and width
    pub fn get(&self, revision: u64, width: u16) -> Option<&DocumentLayout> {
        match &self.cached {
            Some((rev, w, layout)) if *rev == revision && *w == width => Some(layout),
            _ => None,
        }
    }

    /// Store the layout for a revision and width
    pub fn insert(&mut self, revision: u64, width: u16, layout: DocumentLayout) {
        self.cached = Some((revision, width, layout));
    }
}
