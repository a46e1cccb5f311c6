use colored::Colorize;
use std::path::Path;

/// Default line width for wrapped export text
pub const DEFAULT_WRAP_WIDTH: usize = 100;

/// Wraps text to the given width without breaking words. Existing line
/// breaks are preserved.
pub fn wrap_text(text: &str, max_width: usize) -> String {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        if paragraph.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
            } else if current.chars().count() + 1 + word.chars().count() <= max_width {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines.join("\n")
}

/// Sanitizes a string for use in a file name: problematic characters and
/// whitespace become underscores, and overlong names are truncated.
pub fn sanitize_filename(name: &str, max_length: usize) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '\\' | '/' | '*' | '?' | ':' | '"' | '<' | '>' | '|' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect();

    if sanitized.chars().count() > max_length {
        let kept: String = sanitized.chars().take(max_length.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        sanitized
    }
}

/// Highlights matched ranges with ANSI styling for terminal display.
/// Ranges are applied back to front so earlier offsets stay valid; ranges
/// that fall outside the text or are inverted are skipped.
pub fn highlight_matches(text: &str, positions: &[(usize, usize)]) -> String {
    let mut sorted: Vec<(usize, usize)> = positions.to_vec();
    sorted.sort_unstable_by(|a, b| b.0.cmp(&a.0));

    let mut highlighted = text.to_string();
    for (start, end) in sorted {
        if start >= end || end > text.len() {
            continue;
        }
        if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
            continue;
        }
        let styled = text[start..end].yellow().bold().to_string();
        highlighted.replace_range(start..end, &styled);
    }
    highlighted
}

/// Checks that a path exists and is a directory
pub fn is_valid_directory(path: &Path) -> bool {
    path.is_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text_respects_width() {
        let text = "one two three four five six seven eight nine ten";
        let wrapped = wrap_text(text, 12);
        for line in wrapped.lines() {
            assert!(line.chars().count() <= 12, "line too long: {line:?}");
        }
        // No words are lost
        let rejoined = wrapped.replace('\n', " ");
        assert_eq!(rejoined, text);
    }

    #[test]
    fn test_wrap_text_keeps_paragraph_breaks() {
        let wrapped = wrap_text("first\n\nsecond", 80);
        assert_eq!(wrapped, "first\n\nsecond");
    }

    #[test]
    fn test_wrap_text_does_not_break_long_words() {
        let wrapped = wrap_text("supercalifragilistic", 5);
        assert_eq!(wrapped, "supercalifragilistic");
    }

    #[test]
    fn test_sanitize_filename_replaces_invalid_characters() {
        assert_eq!(sanitize_filename("a/b\\c:d", 50), "a_b_c_d");
        assert_eq!(sanitize_filename("hello world", 50), "hello_world");
        assert_eq!(sanitize_filename("what?*\"<>|", 50), "what______");
    }

    #[test]
    fn test_sanitize_filename_truncates() {
        let long = "x".repeat(60);
        let sanitized = sanitize_filename(&long, 30);
        assert_eq!(sanitized.chars().count(), 30);
        assert!(sanitized.ends_with("..."));
    }

    #[test]
    fn test_highlight_matches_wraps_ranges() {
        colored::control::set_override(true);
        let text = "the budget line";
        let highlighted = highlight_matches(text, &[(4, 10)]);
        assert!(highlighted.contains("budget"));
        // Some styling was applied around the match
        assert_ne!(highlighted, text);
        assert!(highlighted.starts_with("the "));
        assert!(highlighted.ends_with(" line"));
    }

    #[test]
    fn test_highlight_matches_skips_invalid_ranges() {
        let text = "short";
        assert_eq!(highlight_matches(text, &[(3, 2)]), text);
        assert_eq!(highlight_matches(text, &[(0, 99)]), text);
    }

    #[test]
    fn test_is_valid_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(is_valid_directory(dir.path()));
        assert!(!is_valid_directory(&dir.path().join("nope")));
        let file = dir.path().join("f.txt");
        std::fs::write(&file, b"x").unwrap();
        assert!(!is_valid_directory(&file));
    }
}
