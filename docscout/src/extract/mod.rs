//! Per-file-type extraction adapters.
//!
//! Each adapter opens one document, scans its structural parts, tests every
//! text unit against the matcher, and emits one match record per matching
//! unit with computed offsets.

pub mod docx;
pub mod pdf;

pub use docx::extract_docx_matches;
pub use pdf::extract_pdf_matches;
