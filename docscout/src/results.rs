use std::path::PathBuf;

/// One located occurrence of the search pattern within a document.
///
/// Serves as the data transfer object between the extraction adapters and
/// result consumers (printers, exporters). Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    /// Path to the document containing the match
    pub file_path: PathBuf,
    /// Text of the structural unit the match was found in
    pub context: String,
    /// Location label within the document, e.g. "Paragraph 3" or "Page 7"
    pub location: Option<String>,
    /// (start, end) byte offsets of each match within `context`,
    /// sorted ascending; used for highlighting
    pub match_positions: Vec<(usize, usize)>,
}

impl SearchMatch {
    pub fn new(
        file_path: impl Into<PathBuf>,
        context: impl Into<String>,
        location: Option<String>,
        match_positions: Vec<(usize, usize)>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            context: context.into(),
            location,
            match_positions,
        }
    }
}

/// Accumulated results of a single search run
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    /// All matches, grouped per source document in collection order
    pub matches: Vec<SearchMatch>,
    /// Number of files processed
    pub files_searched: usize,
    /// Number of files that produced at least one match
    pub files_with_matches: usize,
}

impl SearchResults {
    /// Creates a new empty result set
    pub fn new() -> Self {
        Default::default()
    }

    /// Total number of match records
    pub fn total_matches(&self) -> usize {
        self.matches.len()
    }

    /// Number of distinct documents the matches came from
    pub fn unique_documents(&self) -> usize {
        let mut paths: Vec<&PathBuf> = self.matches.iter().map(|m| &m.file_path).collect();
        paths.sort();
        paths.dedup();
        paths.len()
    }

    /// Records the outcome of one processed file
    pub fn add_file_matches(&mut self, file_matches: Vec<SearchMatch>) {
        self.files_searched += 1;
        if !file_matches.is_empty() {
            self.files_with_matches += 1;
        }
        self.matches.extend(file_matches);
    }

    /// Merges another result set into this one
    pub fn merge(&mut self, other: SearchResults) {
        self.files_searched += other.files_searched;
        self.files_with_matches += other.files_with_matches;
        self.matches.extend(other.matches);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_match(path: &str, context: &str) -> SearchMatch {
        SearchMatch::new(path, context, Some("Paragraph 1".to_string()), vec![(0, 4)])
    }

    #[test]
    fn test_match_creation() {
        let m = SearchMatch::new(
            "report.docx",
            "The budget was approved.",
            Some("Paragraph 2".to_string()),
            vec![(4, 10)],
        );

        assert_eq!(m.file_path, PathBuf::from("report.docx"));
        assert_eq!(&m.context[m.match_positions[0].0..m.match_positions[0].1], "budget");
        assert_eq!(m.location.as_deref(), Some("Paragraph 2"));
    }

    #[test]
    fn test_results_new() {
        let results = SearchResults::new();
        assert_eq!(results.total_matches(), 0);
        assert_eq!(results.files_searched, 0);
        assert_eq!(results.files_with_matches, 0);
    }

    #[test]
    fn test_add_file_matches() {
        let mut results = SearchResults::new();

        results.add_file_matches(vec![
            sample_match("a.docx", "test one"),
            sample_match("a.docx", "test two"),
        ]);
        assert_eq!(results.total_matches(), 2);
        assert_eq!(results.files_searched, 1);
        assert_eq!(results.files_with_matches, 1);

        // A file without matches still counts as searched
        results.add_file_matches(vec![]);
        assert_eq!(results.total_matches(), 2);
        assert_eq!(results.files_searched, 2);
        assert_eq!(results.files_with_matches, 1);
    }

    #[test]
    fn test_unique_documents() {
        let mut results = SearchResults::new();
        results.add_file_matches(vec![
            sample_match("a.docx", "test"),
            sample_match("a.docx", "test"),
        ]);
        results.add_file_matches(vec![sample_match("b.pdf", "test")]);

        assert_eq!(results.total_matches(), 3);
        assert_eq!(results.unique_documents(), 2);
    }

    #[test]
    fn test_merge() {
        let mut left = SearchResults::new();
        left.add_file_matches(vec![sample_match("a.docx", "test")]);

        let mut right = SearchResults::new();
        right.add_file_matches(vec![sample_match("b.pdf", "test"), sample_match("b.pdf", "test")]);
        right.add_file_matches(vec![]);

        left.merge(right);
        assert_eq!(left.total_matches(), 3);
        assert_eq!(left.files_searched, 3);
        assert_eq!(left.files_with_matches, 2);
    }
}
