//! Guided prompt flow that builds a [`SearchConfig`] from stdin answers.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;

use docscout::config::{default_thread_count, DEFAULT_PATTERNS};
use docscout::export::ExportFormat;
use docscout::text::is_valid_directory;
use docscout::SearchConfig;

/// Walks the user through every search option and returns the resulting
/// configuration. Empty answers fall back to the defaults shown in the
/// prompt.
pub fn prompt_config() -> Result<SearchConfig> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut config = SearchConfig::default();

    println!("{}", "Document search".bold());

    let term = ask(&mut lines, "Search term")?;
    if term.is_empty() {
        bail!("search term cannot be empty");
    }
    config.term = term;

    let dir = ask(&mut lines, "Directory to search [.]")?;
    if !dir.is_empty() {
        let path = PathBuf::from(dir);
        if !is_valid_directory(&path) {
            bail!("not a directory: {}", path.display());
        }
        config.root_path = path;
    }

    config.case_sensitive = ask_yes_no(&mut lines, "Case sensitive? [y/N]")?;
    config.whole_word = ask_yes_no(&mut lines, "Whole words only? [y/N]")?;
    config.use_regex = ask_yes_no(&mut lines, "Treat term as a regex? [y/N]")?;

    if ask_yes_no(&mut lines, "Include PDF files? [y/N]")? {
        config.file_patterns = DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect();
    }

    let exclude = ask(
        &mut lines,
        "Extra directories to exclude (comma separated, empty for none)",
    )?;
    for name in exclude.split(',') {
        let name = name.trim();
        if !name.is_empty() {
            config.exclude_dirs.push(name.to_string());
        }
    }

    let threads = ask(
        &mut lines,
        &format!("Worker threads [{}]", default_thread_count()),
    )?;
    if !threads.is_empty() {
        config.thread_count = threads
            .parse::<NonZeroUsize>()
            .context("thread count must be a positive number")?;
    }

    let export = ask(&mut lines, "Export format (html, markdown, txt, empty for none)")?;
    if !export.is_empty() {
        config.export_format = Some(ExportFormat::from_str(&export)?);
    }

    Ok(config)
}

fn ask(lines: &mut impl Iterator<Item = io::Result<String>>, prompt: &str) -> Result<String> {
    print!("{prompt}: ");
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(line?.trim().to_string()),
        None => Ok(String::new()),
    }
}

fn ask_yes_no(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    prompt: &str,
) -> Result<bool> {
    let answer = ask(lines, prompt)?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}
