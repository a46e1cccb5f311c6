use lopdf::Document;
use std::path::Path;
use tracing::trace;

use crate::errors::{SearchError, SearchResult};
use crate::results::SearchMatch;
use crate::search::matcher::PatternMatcher;

/// Searches a PDF document page by page. A page whose extracted text
/// matches yields one record labelled with its page number.
pub fn extract_pdf_matches(
    path: &Path,
    matcher: &PatternMatcher,
) -> SearchResult<Vec<SearchMatch>> {
    trace!("Extracting PDF: {}", path.display());
    if !path.exists() {
        return Err(SearchError::file_not_found(path));
    }
    let doc =
        Document::load(path).map_err(|e| SearchError::document_parse(path, e.to_string()))?;

    let mut matches = Vec::new();
    for (page_no, _object_id) in doc.get_pages() {
        // Pages that fail text extraction (scanned images, exotic
        // encodings) contribute zero matches rather than failing the file.
        let text = match doc.extract_text(&[page_no]) {
            Ok(text) => text,
            Err(e) => {
                trace!(
                    "No text extracted from {} page {}: {}",
                    path.display(),
                    page_no,
                    e
                );
                continue;
            }
        };
        if text.is_empty() || !matcher.is_match(&text) {
            continue;
        }
        let positions = matcher.find_matches(&text);
        matches.push(SearchMatch::new(
            path,
            text,
            Some(format!("Page {page_no}")),
            positions,
        ));
    }

    Ok(matches)
}
