//! Concurrent document search: a compiled matcher shared across a bounded
//! worker pool, one extraction task per collected file.

pub mod engine;
pub mod matcher;

pub use engine::{process_file, search};
pub use matcher::PatternMatcher;
