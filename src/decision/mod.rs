//! Decision document model and loading

pub mod io;
pub mod models;

pub use io::load_decision;
pub use models::{Decision, DecisionMetadata};
