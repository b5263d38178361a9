//! Live substring search over the decision body
//!
//! Enumerates every case-insensitive occurrence of the query and keeps a
//! current-match cursor with wraparound navigation. The match set is
//! ephemeral: it is recomputed wholesale on every query edit and never
//! carries ids beyond its position in document order.

/// A single occurrence of the live query, in character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    pub start: usize,
    pub end: usize,
}

/// Fold one scalar for case-insensitive comparison. Taking the first
/// scalar of the lowercase expansion keeps offsets 1:1 with the source.
fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Find every case-insensitive occurrence of `query` in `text`.
///
/// The scan is greedy and non-overlapping: it resumes past the end of
/// each match, so a query that overlaps itself is counted once. An empty
/// query or empty text yields no matches.
pub fn find_matches(text: &str, query: &str) -> Vec<SearchMatch> {
    if text.is_empty() || query.is_empty() {
        return Vec::new();
    }

    let haystack: Vec<char> = text.chars().map(fold).collect();
    let needle: Vec<char> = query.chars().map(fold).collect();

    let mut matches = Vec::new();
    let mut from = 0;
    while from + needle.len() <= haystack.len() {
        if haystack[from..from + needle.len()] == needle[..] {
            matches.push(SearchMatch {
                start: from,
                end: from + needle.len(),
            });
            from += needle.len();
        } else {
            from += 1;
        }
    }

    matches
}

/// Search state for one viewing session: the live query, its matches,
/// and the cursor behind the "N of M" navigation UI.
#[derive(Debug, Default)]
pub struct SearchEngine {
    query: String,
    matches: Vec<SearchMatch>,
    current: Option<usize>,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-run the search with a new query. The cursor resets to the
    /// first match, or clears when nothing matches.
    pub fn set_query(&mut self, text: &str, query: &str) {
        self.matches = find_matches(text, query);
        self.query = query.to_string();
        self.current = if self.matches.is_empty() { None } else { Some(0) };
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self) -> &[SearchMatch] {
        &self.matches
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Index of the current match in document order; `None` when the
    /// match set is empty.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_match(&self) -> Option<SearchMatch> {
        self.current.and_then(|i| self.matches.get(i).copied())
    }

    /// Advance to the next match, wrapping past the last back to the
    /// first. A no-op when there are no matches.
    pub fn next_match(&mut self) {
        if let Some(current) = self.current {
            self.current = Some((current + 1) % self.matches.len());
        }
    }

    /// Step back to the previous match, wrapping past the first to the
    /// last. A no-op when there are no matches.
    pub fn previous_match(&mut self) {
        if let Some(current) = self.current {
            self.current = Some((current + self.matches.len() - 1) % self.matches.len());
        }
    }

    /// Jump directly to a match. Out-of-range indices are ignored, same
    /// as any stale reference.
    pub fn set_current(&mut self, index: usize) {
        if index < self.matches.len() {
            self.current = Some(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_matches_basic() {
        let matches = find_matches("the cat sat on the mat", "the");
        assert_eq!(
            matches,
            vec![
                SearchMatch { start: 0, end: 3 },
                SearchMatch { start: 15, end: 18 }
            ]
        );
    }

    #[test]
    fn test_find_matches_case_insensitive() {
        let lower = find_matches("Revenue grew. REVENUE doubled.", "revenue");
        assert_eq!(lower.len(), 2, "search should be case insensitive");
        assert_eq!(lower[0], SearchMatch { start: 0, end: 7 });
        assert_eq!(lower[1], SearchMatch { start: 14, end: 21 });
    }

    #[test]
    fn test_find_matches_non_overlapping() {
        // "aaaa" contains "aa" at 0, 1, and 2, but the greedy scan only
        // counts the non-overlapping occurrences at 0 and 2
        let matches = find_matches("aaaa", "aa");
        assert_eq!(
            matches,
            vec![
                SearchMatch { start: 0, end: 2 },
                SearchMatch { start: 2, end: 4 }
            ]
        );
    }

    #[test]
    fn test_find_matches_empty_inputs() {
        assert!(find_matches("", "query").is_empty());
        assert!(find_matches("some text", "").is_empty());
        assert!(find_matches("", "").is_empty());
    }

    #[test]
    fn test_find_matches_char_offsets() {
        // Offsets count chars, not bytes
        let matches = find_matches("décision — décision", "décision");
        assert_eq!(
            matches,
            vec![
                SearchMatch { start: 0, end: 8 },
                SearchMatch { start: 11, end: 19 }
            ]
        );
    }

    #[test]
    fn test_cursor_resets_on_query_change() {
        let mut engine = SearchEngine::new();
        engine.set_query("the cat sat on the mat", "the");
        assert_eq!(engine.current_index(), Some(0));

        engine.set_query("the cat sat on the mat", "zebra");
        assert_eq!(engine.current_index(), None);
        assert_eq!(engine.match_count(), 0);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut engine = SearchEngine::new();
        engine.set_query("the cat sat on the mat", "the");

        engine.next_match();
        assert_eq!(engine.current_index(), Some(1));
        engine.next_match();
        assert_eq!(engine.current_index(), Some(0), "next should wrap to 0");

        engine.previous_match();
        assert_eq!(
            engine.current_index(),
            Some(1),
            "previous should wrap to the last match"
        );
    }

    #[test]
    fn test_navigation_noop_without_matches() {
        let mut engine = SearchEngine::new();
        engine.set_query("abc", "zzz");
        engine.next_match();
        engine.previous_match();
        assert_eq!(engine.current_index(), None);
    }
}
