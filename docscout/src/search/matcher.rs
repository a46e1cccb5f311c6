use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::sync::Arc;
use tracing::debug;

use crate::config::SearchConfig;
use crate::errors::{SearchError, SearchResult};

static PATTERN_CACHE: Lazy<DashMap<String, Arc<Regex>>> = Lazy::new(DashMap::new);

/// Compiles the search term into a reusable matcher.
///
/// The compiled regex is immutable and stateless per call, so one matcher
/// is shared read-only by every worker thread in a run.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    regex: Arc<Regex>,
}

impl PatternMatcher {
    /// Builds a matcher from explicit options
    pub fn new(
        term: &str,
        case_sensitive: bool,
        whole_word: bool,
        use_regex: bool,
    ) -> SearchResult<Self> {
        let mut pattern = if use_regex {
            term.to_string()
        } else {
            regex::escape(term)
        };
        if whole_word {
            pattern = format!(r"\b{pattern}\b");
        }

        let cache_key = format!("{}:{}", case_sensitive, pattern);
        if let Some(entry) = PATTERN_CACHE.get(&cache_key) {
            debug!("Pattern cache hit for '{}'", term);
            return Ok(Self {
                regex: entry.clone(),
            });
        }

        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|e| SearchError::invalid_pattern(e.to_string()))?;
        let regex = Arc::new(regex);
        PATTERN_CACHE.insert(cache_key, regex.clone());

        Ok(Self { regex })
    }

    /// Builds a matcher from a search configuration
    pub fn from_config(config: &SearchConfig) -> SearchResult<Self> {
        Self::new(
            &config.term,
            config.case_sensitive,
            config.whole_word,
            config.use_regex,
        )
    }

    /// Checks whether the pattern occurs anywhere in the text
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Finds all matches in the given text as (start, end) byte offsets
    pub fn find_matches(&self, text: &str) -> Vec<(usize, usize)> {
        self.regex.find_iter(text).map(|m| (m.start(), m.end())).collect()
    }
}
