//! Scroll targeting for highlights and search matches
//!
//! Rendering is a two-phase contract: the widget builds segments, then
//! registers one node handle per styled segment it actually drew. The
//! navigator resolves a highlight id or match index against the handles
//! from the most recent pass. A miss means the reference went stale
//! between a user action and the next render and is silently ignored;
//! handles are rebuilt on every pass, so stale lookups are an expected
//! race, not an error.

use std::collections::HashMap;

/// Registered scroll targets for one render pass.
///
/// `H` is the host's opaque node handle; the terminal widget registers
/// the line offset each styled segment starts on.
#[derive(Debug)]
pub struct Navigator<H> {
    highlight_nodes: HashMap<String, H>,
    search_nodes: HashMap<usize, H>,
}

impl<H> Navigator<H> {
    pub fn new() -> Self {
        Navigator {
            highlight_nodes: HashMap::new(),
            search_nodes: HashMap::new(),
        }
    }

    /// Drop every handle; called at the start of each render pass.
    pub fn clear(&mut self) {
        self.highlight_nodes.clear();
        self.search_nodes.clear();
    }

    pub fn register_highlight(&mut self, id: impl Into<String>, handle: H) {
        self.highlight_nodes.insert(id.into(), handle);
    }

    pub fn register_search_match(&mut self, index: usize, handle: H) {
        self.search_nodes.insert(index, handle);
    }

    /// Handle for a highlight, if it is currently rendered.
    pub fn scroll_to_highlight(&self, id: &str) -> Option<&H> {
        self.highlight_nodes.get(id)
    }

    /// Handle for the `index`-th search match, if currently rendered.
    pub fn scroll_to_search_match(&self, index: usize) -> Option<&H> {
        self.search_nodes.get(&index)
    }
}

impl<H> Default for Navigator<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_after_registration() {
        let mut navigator: Navigator<usize> = Navigator::new();
        navigator.register_highlight("h1", 12);
        navigator.register_search_match(0, 40);

        assert_eq!(navigator.scroll_to_highlight("h1"), Some(&12));
        assert_eq!(navigator.scroll_to_search_match(0), Some(&40));
    }

    #[test]
    fn test_stale_lookups_miss_silently() {
        let mut navigator: Navigator<usize> = Navigator::new();
        navigator.register_highlight("h1", 12);
        navigator.clear();

        assert_eq!(navigator.scroll_to_highlight("h1"), None);
        assert_eq!(navigator.scroll_to_search_match(0), None);
    }

    #[test]
    fn test_reregistration_replaces_handle() {
        let mut navigator: Navigator<usize> = Navigator::new();
        navigator.register_search_match(1, 5);
        navigator.register_search_match(1, 9);
        assert_eq!(navigator.scroll_to_search_match(1), Some(&9));
    }
}
