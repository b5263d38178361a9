//! Decision-text annotation and search engine
//!
//! The engine owns every offset computation in the viewer: persistent
//! user highlights, the ephemeral search-match set, the merge of both
//! span sources into renderable segments, selection capture, and scroll
//! targeting. The decision body is immutable for the life of a session;
//! all offsets are character indices into it.

pub mod navigate;
pub mod search;
pub mod segment;
pub mod selection;
pub mod span;
pub mod store;

pub use navigate::Navigator;
pub use search::{SearchEngine, SearchMatch, find_matches};
pub use segment::{SEARCH_MATCH_COLOR, Segment, SegmentSource, build_segments};
pub use selection::{SelectionEvent, capture_selection};
pub use span::{AnnotationError, Span, char_len, slice_chars};
pub use store::{AnnotationStore, HIGHLIGHT_COLOR, Highlight, Note, SavedAnnotations};
