use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::matcher::PatternMatcher;
use crate::collector::collect_files;
use crate::config::SearchConfig;
use crate::errors::{SearchError, SearchResult};
use crate::results::{SearchMatch, SearchResults};

/// Performs a concurrent search across documents under the configured root.
///
/// Fan-out: one extraction task per collected file, executed on a dedicated
/// worker pool of the configured size. Fan-in: per-file match lists are
/// concatenated. Per-file failures are logged and contribute zero matches;
/// only top-level errors (bad pattern, bad root, pool construction) abort.
pub fn search(config: &SearchConfig) -> SearchResult<SearchResults> {
    let started = Instant::now();
    info!("Starting search for '{}'", config.term);

    if config.term.is_empty() {
        warn!("Empty search term provided");
        return Ok(SearchResults::new());
    }
    if !config.root_path.is_dir() {
        return Err(SearchError::config_error(format!(
            "Not a directory: {}",
            config.root_path.display()
        )));
    }

    let matcher = PatternMatcher::from_config(config)?;

    let files = collect_files(&config.root_path, &config.file_patterns, &config.exclude_dirs);
    if files.is_empty() {
        info!("No matching files found under {}", config.root_path.display());
        return Ok(SearchResults::new());
    }

    let workers = config.effective_thread_count();
    debug!("Processing {} files on {} workers", files.len(), workers);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| SearchError::ThreadPool(e.to_string()))?;

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    progress.set_message("searching");

    let per_file: Vec<Vec<SearchMatch>> = pool.install(|| {
        files
            .par_iter()
            .map(|path| {
                let file_matches = match process_file(path, &matcher) {
                    Ok(matches) => matches,
                    Err(e) => {
                        // Per-file boundary: log and keep going
                        warn!("Error processing {}: {}", path.display(), e);
                        Vec::new()
                    }
                };
                progress.inc(1);
                file_matches
            })
            .collect()
    });
    progress.finish_and_clear();

    let mut results = SearchResults::new();
    for file_matches in per_file {
        results.add_file_matches(file_matches);
    }

    info!(
        "Search completed in {}: {} matches in {} of {} files",
        humantime::format_duration(started.elapsed()),
        results.total_matches(),
        results.files_with_matches,
        results.files_searched
    );

    Ok(results)
}

/// Processes a single file based on its extension. Unknown extensions are
/// skipped with zero matches.
pub fn process_file(path: &Path, matcher: &PatternMatcher) -> SearchResult<Vec<SearchMatch>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "docx" => crate::extract::extract_docx_matches(path, matcher),
        "pdf" => crate::extract::extract_pdf_matches(path, matcher),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Paragraph, Run};
    use std::fs;
    use std::num::NonZeroUsize;
    use tempfile::tempdir;

    fn write_docx(path: &Path, paragraphs: &[&str]) {
        let mut docx = Docx::new();
        for text in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
        }
        let file = fs::File::create(path).unwrap();
        docx.build().pack(file).unwrap();
    }

    fn config_for(dir: &Path, term: &str) -> SearchConfig {
        SearchConfig {
            term: term.to_string(),
            root_path: dir.to_path_buf(),
            thread_count: NonZeroUsize::new(2).unwrap(),
            ..Default::default()
        }
    }

    #[test]
    fn test_search_finds_matches_across_files() {
        let dir = tempdir().unwrap();
        write_docx(&dir.path().join("one.docx"), &["alpha budget line", "no hit"]);
        write_docx(&dir.path().join("two.docx"), &["second budget mention"]);
        write_docx(&dir.path().join("three.docx"), &["nothing relevant"]);

        let results = search(&config_for(dir.path(), "budget")).unwrap();
        assert_eq!(results.total_matches(), 2);
        assert_eq!(results.files_searched, 3);
        assert_eq!(results.files_with_matches, 2);
    }

    #[test]
    fn test_empty_term_returns_empty_results() {
        let dir = tempdir().unwrap();
        let results = search(&config_for(dir.path(), "")).unwrap();
        assert_eq!(results.total_matches(), 0);
    }

    #[test]
    fn test_invalid_root_is_an_error() {
        let config = config_for(Path::new("/definitely/not/a/real/dir"), "term");
        assert!(matches!(
            search(&config),
            Err(SearchError::ConfigError(_))
        ));
    }

    #[test]
    fn test_corrupt_file_does_not_abort_the_run() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("broken.docx"), b"not a real docx").unwrap();
        write_docx(&dir.path().join("good.docx"), &["budget here"]);

        let results = search(&config_for(dir.path(), "budget")).unwrap();
        assert_eq!(results.total_matches(), 1);
        assert_eq!(results.files_searched, 2);
        assert_eq!(results.files_with_matches, 1);
    }

    #[test]
    fn test_unknown_extension_yields_no_matches() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "budget budget budget").unwrap();
        let matcher = PatternMatcher::new("budget", false, false, false).unwrap();
        assert!(process_file(&path, &matcher).unwrap().is_empty());
    }
}
