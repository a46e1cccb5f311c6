pub mod collector;
pub mod config;
pub mod errors;
pub mod export;
pub mod extract;
pub mod quality;
pub mod results;
pub mod search;
pub mod text;

pub use config::SearchConfig;
pub use errors::{SearchError, SearchResult};
pub use export::{ExportFormat, ResultExporter};
pub use results::{SearchMatch, SearchResults};
pub use search::PatternMatcher;
