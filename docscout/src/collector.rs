use glob::Pattern;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Collects all files under `root` whose names match one of the glob
/// `patterns`, pruning any directory whose name is in `exclude_dirs`.
///
/// Excluded directories are never descended into. A file is collected once
/// per pattern it matches.
// TODO: dedupe paths that match more than one pattern (e.g. "*.docx" and
// "report.*" both collecting report.docx) so they are not searched twice.
pub fn collect_files(root: &Path, patterns: &[String], exclude_dirs: &[String]) -> Vec<PathBuf> {
    let compiled: Vec<Pattern> = patterns
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!("Skipping invalid file pattern '{}': {}", p, e);
                None
            }
        })
        .collect();

    let excluded: Vec<String> = exclude_dirs.to_vec();
    let mut walker = WalkBuilder::new(root);
    // Plain tree walk: document folders are not source trees, so gitignore
    // semantics and hidden-file skipping do not apply here.
    walker
        .hidden(false)
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
            if is_dir {
                if let Some(name) = entry.file_name().to_str() {
                    if excluded.iter().any(|d| d == name) {
                        trace!("Pruning excluded directory: {}", entry.path().display());
                        return false;
                    }
                }
            }
            true
        });

    let mut files = Vec::new();
    for entry in walker.build().filter_map(Result::ok) {
        if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        for pattern in &compiled {
            if pattern.matches(name) {
                files.push(entry.path().to_path_buf());
            }
        }
    }

    debug!("Collected {} files under {}", files.len(), root.display());
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::write(path, b"placeholder").unwrap();
    }

    #[test]
    fn test_collects_matching_files() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("a.docx"));
        touch(&dir.path().join("b.pdf"));
        touch(&dir.path().join("notes.txt"));

        let files = collect_files(
            dir.path(),
            &["*.docx".to_string(), "*.pdf".to_string()],
            &[],
        );
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| {
            let name = f.file_name().unwrap().to_str().unwrap();
            name.ends_with(".docx") || name.ends_with(".pdf")
        }));
    }

    #[test]
    fn test_descends_into_subdirectories() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("reports").join("2024");
        fs::create_dir_all(&nested).unwrap();
        touch(&nested.join("q1.docx"));

        let files = collect_files(dir.path(), &["*.docx".to_string()], &[]);
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_excluded_directories_are_never_descended() {
        let dir = tempdir().unwrap();
        let kept = dir.path().join("docs");
        let skipped = dir.path().join("archive");
        let skipped_nested = skipped.join("old");
        fs::create_dir_all(&kept).unwrap();
        fs::create_dir_all(&skipped_nested).unwrap();
        touch(&kept.join("current.docx"));
        touch(&skipped.join("stale.docx"));
        touch(&skipped_nested.join("ancient.docx"));

        let files = collect_files(
            dir.path(),
            &["*.docx".to_string()],
            &["archive".to_string()],
        );
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("docs/current.docx") || files[0].ends_with("current.docx"));
    }

    #[test]
    fn test_overlapping_patterns_double_count() {
        // Known behavior: a file matching two patterns is collected twice
        let dir = tempdir().unwrap();
        touch(&dir.path().join("report.docx"));

        let files = collect_files(
            dir.path(),
            &["*.docx".to_string(), "report.*".to_string()],
            &[],
        );
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("a.docx"));

        let files = collect_files(
            dir.path(),
            &["[".to_string(), "*.docx".to_string()],
            &[],
        );
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_empty_directory_yields_nothing() {
        let dir = tempdir().unwrap();
        let files = collect_files(dir.path(), &["*.docx".to_string()], &[]);
        assert!(files.is_empty());
    }
}
