use docx_rs::{
    read_docx, DocumentChild, Footer, FooterChild, Header, HeaderChild, Paragraph, ParagraphChild,
    RunChild, Table, TableCellContent, TableChild, TableRowChild,
};
use std::fs;
use std::path::Path;
use tracing::trace;

use crate::errors::{SearchError, SearchResult};
use crate::results::SearchMatch;
use crate::search::matcher::PatternMatcher;

/// Searches a Word document: body paragraphs, table cells, and section
/// headers/footers. Each matching structural unit yields one record.
pub fn extract_docx_matches(
    path: &Path,
    matcher: &PatternMatcher,
) -> SearchResult<Vec<SearchMatch>> {
    trace!("Extracting DOCX: {}", path.display());
    let data = fs::read(path).map_err(|e| SearchError::from_io(path, e))?;
    let docx = read_docx(&data).map_err(|e| SearchError::document_parse(path, e.to_string()))?;

    let mut matches = Vec::new();
    let mut paragraph_no = 0;
    let mut table_no = 0;

    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(para) => {
                paragraph_no += 1;
                let text = paragraph_text(para);
                push_if_match(
                    &mut matches,
                    path,
                    matcher,
                    &text,
                    format!("Paragraph {paragraph_no}"),
                );
            }
            DocumentChild::Table(table) => {
                table_no += 1;
                scan_table(&mut matches, path, matcher, table, table_no);
            }
            _ => {}
        }
    }

    // Header and footer parts are stored with their relationship id
    let section = &docx.document.section_property;
    scan_header(
        &mut matches,
        path,
        matcher,
        "Header",
        section.header.as_ref().map(|(_, h)| h),
    );
    scan_header(
        &mut matches,
        path,
        matcher,
        "First Header",
        section.first_header.as_ref().map(|(_, h)| h),
    );
    scan_header(
        &mut matches,
        path,
        matcher,
        "Even Header",
        section.even_header.as_ref().map(|(_, h)| h),
    );
    scan_footer(
        &mut matches,
        path,
        matcher,
        "Footer",
        section.footer.as_ref().map(|(_, f)| f),
    );
    scan_footer(
        &mut matches,
        path,
        matcher,
        "First Footer",
        section.first_footer.as_ref().map(|(_, f)| f),
    );
    scan_footer(
        &mut matches,
        path,
        matcher,
        "Even Footer",
        section.even_footer.as_ref().map(|(_, f)| f),
    );

    Ok(matches)
}

fn push_if_match(
    matches: &mut Vec<SearchMatch>,
    path: &Path,
    matcher: &PatternMatcher,
    text: &str,
    location: String,
) {
    if matcher.is_match(text) {
        let positions = matcher.find_matches(text);
        matches.push(SearchMatch::new(path, text, Some(location), positions));
    }
}

fn scan_table(
    matches: &mut Vec<SearchMatch>,
    path: &Path,
    matcher: &PatternMatcher,
    table: &Table,
    table_no: usize,
) {
    for (r_idx, row) in table.rows.iter().enumerate() {
        let TableChild::TableRow(row) = row;
        for (c_idx, cell) in row.cells.iter().enumerate() {
            let TableRowChild::TableCell(cell) = cell;
            let text = cell_text(&cell.children);
            push_if_match(
                matches,
                path,
                matcher,
                &text,
                format!(
                    "Table {}, Row {}, Column {}",
                    table_no,
                    r_idx + 1,
                    c_idx + 1
                ),
            );
        }
    }
}

fn scan_header(
    matches: &mut Vec<SearchMatch>,
    path: &Path,
    matcher: &PatternMatcher,
    label: &str,
    header: Option<&Header>,
) {
    let Some(header) = header else { return };
    let mut paragraph_no = 0;
    for child in &header.children {
        if let HeaderChild::Paragraph(para) = child {
            paragraph_no += 1;
            let text = paragraph_text(para);
            push_if_match(
                matches,
                path,
                matcher,
                &text,
                format!("{label}, Paragraph {paragraph_no}"),
            );
        }
    }
}

fn scan_footer(
    matches: &mut Vec<SearchMatch>,
    path: &Path,
    matcher: &PatternMatcher,
    label: &str,
    footer: Option<&Footer>,
) {
    let Some(footer) = footer else { return };
    let mut paragraph_no = 0;
    for child in &footer.children {
        if let FooterChild::Paragraph(para) = child {
            paragraph_no += 1;
            let text = paragraph_text(para);
            push_if_match(
                matches,
                path,
                matcher,
                &text,
                format!("{label}, Paragraph {paragraph_no}"),
            );
        }
    }
}

/// Concatenates the text runs of a paragraph
fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    for child in &para.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let RunChild::Text(t) = run_child {
                    text.push_str(&t.text);
                }
            }
        }
    }
    text
}

/// Joins the paragraphs of a table cell with newlines, the way word
/// processors render cell text
fn cell_text(children: &[TableCellContent]) -> String {
    let mut parts = Vec::new();
    for content in children {
        if let TableCellContent::Paragraph(para) = content {
            parts.push(paragraph_text(para));
        }
    }
    parts.join("\n")
}
