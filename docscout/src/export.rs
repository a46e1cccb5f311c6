use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

use crate::errors::{SearchError, SearchResult};
use crate::results::SearchMatch;
use crate::text::{sanitize_filename, wrap_text, DEFAULT_WRAP_WIDTH};

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Html,
    #[serde(alias = "md")]
    Markdown,
    #[serde(alias = "txt")]
    Text,
}

impl ExportFormat {
    /// File extension without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Html => "html",
            ExportFormat::Markdown => "md",
            ExportFormat::Text => "txt",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Html => "html",
            ExportFormat::Markdown => "markdown",
            ExportFormat::Text => "text",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ExportFormat {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(ExportFormat::Html),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "text" | "txt" => Ok(ExportFormat::Text),
            other => Err(SearchError::export_error(format!(
                "Unsupported export format: {other}. Use one of: html, markdown, txt"
            ))),
        }
    }
}

/// Renders match lists to a single output file, grouped by source document,
/// with offset-based highlighting recomputed per format.
pub struct ResultExporter {
    search_term: String,
    directory: PathBuf,
    output_dir: PathBuf,
    timestamp: String,
    formatted_date: String,
}

impl ResultExporter {
    pub fn new(search_term: &str, directory: &Path, output_dir: &Path) -> Self {
        let now = Local::now();
        Self {
            search_term: search_term.to_string(),
            directory: directory.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            timestamp: now.format("%Y%m%d_%H%M%S").to_string(),
            formatted_date: now.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Exports matches in the given format. Empty input produces no file.
    pub fn export(
        &self,
        matches: &[SearchMatch],
        format: ExportFormat,
    ) -> SearchResult<Option<PathBuf>> {
        if matches.is_empty() {
            info!("No results to export");
            return Ok(None);
        }

        let output_path = self.export_path(format.extension());
        let file = File::create(&output_path).map_err(|e| SearchError::from_io(&output_path, e))?;
        let mut writer = BufWriter::new(file);

        match format {
            ExportFormat::Html => self.write_html(&mut writer, matches)?,
            ExportFormat::Markdown => self.write_markdown(&mut writer, matches)?,
            ExportFormat::Text => self.write_text(&mut writer, matches)?,
        }
        writer.flush()?;

        info!("Exported {} matches to {}", matches.len(), output_path.display());
        Ok(Some(output_path))
    }

    /// Output file name embeds the sanitized term and a timestamp
    fn export_path(&self, extension: &str) -> PathBuf {
        let term = sanitize_filename(&self.search_term, 30);
        self.output_dir
            .join(format!("search_{}_{}.{}", term, self.timestamp, extension))
    }

    fn write_html(&self, w: &mut impl Write, matches: &[SearchMatch]) -> SearchResult<()> {
        write!(
            w,
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Search Results: {term}</title>
    <style>
        mark {{ background-color: yellow; }}
        body {{ font-family: Arial, sans-serif; margin: 2em; }}
        h2 {{ margin-top: 1.5em; color: #2c3e50; }}
    </style>
</head>
<body>
    <h1>Search Results</h1>
    <p><strong>Search Term:</strong> {term}</p>
    <p><strong>Directory:</strong> {dir}</p>
    <p><strong>Date:</strong> {date}</p>
    <p><strong>Total Matches:</strong> {count}</p>
    <hr>
"#,
            term = escape_html(&self.search_term),
            dir = escape_html(&self.directory.display().to_string()),
            date = self.formatted_date,
            count = matches.len(),
        )?;

        let mut current_file: Option<&Path> = None;
        for m in matches {
            if current_file != Some(m.file_path.as_path()) {
                writeln!(
                    w,
                    "<h2>{}</h2>",
                    escape_html(&m.file_path.display().to_string())
                )?;
                current_file = Some(m.file_path.as_path());
            }
            writeln!(w, "<h3>{}</h3>", escape_html(m.location.as_deref().unwrap_or("")))?;
            writeln!(
                w,
                "<p class=\"context\">{}</p>",
                highlight_html(&m.context, &m.match_positions)
            )?;
        }

        write!(w, "</body>\n</html>\n")?;
        Ok(())
    }

    fn write_markdown(&self, w: &mut impl Write, matches: &[SearchMatch]) -> SearchResult<()> {
        writeln!(w, "# Search Results: \"{}\"\n", self.search_term)?;
        writeln!(w, "**Directory:** {}  ", self.directory.display())?;
        writeln!(w, "**Date:** {}  ", self.formatted_date)?;
        writeln!(w, "**Total Matches:** {}\n", matches.len())?;

        let mut current_file: Option<&Path> = None;
        for m in matches {
            if current_file != Some(m.file_path.as_path()) {
                writeln!(w, "\n## {}\n", m.file_path.display())?;
                current_file = Some(m.file_path.as_path());
            }
            writeln!(w, "### {}\n", m.location.as_deref().unwrap_or(""))?;
            writeln!(w, "```\n{}\n```\n", wrap_text(&m.context, DEFAULT_WRAP_WIDTH))?;
        }
        Ok(())
    }

    fn write_text(&self, w: &mut impl Write, matches: &[SearchMatch]) -> SearchResult<()> {
        writeln!(w, "Search Results: \"{}\"", self.search_term)?;
        writeln!(w, "{}\n", "=".repeat(50))?;
        writeln!(w, "Directory: {}", self.directory.display())?;
        writeln!(w, "Date: {}", self.formatted_date)?;
        writeln!(w, "Total Matches: {}\n", matches.len())?;

        let mut current_file: Option<&Path> = None;
        for m in matches {
            if current_file != Some(m.file_path.as_path()) {
                writeln!(w, "\n{}", "=".repeat(50))?;
                writeln!(w, "{}", m.file_path.display())?;
                writeln!(w, "{}\n", "=".repeat(50))?;
                current_file = Some(m.file_path.as_path());
            }
            writeln!(w, "\n{}:", m.location.as_deref().unwrap_or(""))?;
            writeln!(w, "{}", "-".repeat(40))?;
            writeln!(w, "{}", wrap_text(&m.context, DEFAULT_WRAP_WIDTH))?;
            writeln!(w, "{}", "-".repeat(40))?;
        }
        Ok(())
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Rebuilds the context with `<mark>` tags around the matched ranges.
/// Escaping is applied per segment so the stored offsets stay valid.
fn highlight_html(context: &str, positions: &[(usize, usize)]) -> String {
    let mut sorted: Vec<(usize, usize)> = positions.to_vec();
    sorted.sort_unstable();

    let mut out = String::new();
    let mut cursor = 0;
    for (start, end) in sorted {
        if start < cursor || start >= end || end > context.len() {
            continue;
        }
        if !context.is_char_boundary(start) || !context.is_char_boundary(end) {
            continue;
        }
        out.push_str(&escape_html(&context[cursor..start]));
        out.push_str("<mark>");
        out.push_str(&escape_html(&context[start..end]));
        out.push_str("</mark>");
        cursor = end;
    }
    out.push_str(&escape_html(&context[cursor..]));
    out
}
