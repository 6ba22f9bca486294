//! Incident report extraction module
//!
//! This module turns a semi-structured report document into a structured
//! record in two passes:
//! - Linearize the document body (paragraphs and tables) into ordered text
//!   fragments
//! - Slice the fragment sequence into named sections by known headings

pub mod docx;
pub mod sections;

pub use docx::{load_docx, DocxError};
pub use sections::{split_action_items, ExtractedReport, HeadingCatalogue, SectionExtractor};

use sha2::{Digest, Sha256};

/// A block-level node of a report body, in reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocBlock {
    /// One body paragraph (concatenated run text)
    Paragraph(String),
    /// One table: rows top-to-bottom
    Table(Vec<TableRow>),
}

/// One table row: cells left-to-right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

/// One table cell: paragraphs in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    pub paragraphs: Vec<String>,
}

/// Flatten a report body into ordered, non-empty, trimmed text fragments.
///
/// Top-level paragraphs and tables are walked in document order; within a
/// table, rows top-to-bottom, cells left-to-right, cell paragraphs in order.
/// Whitespace-only paragraphs are dropped, not emitted as empty fragments.
pub fn linearize(blocks: &[DocBlock]) -> Vec<String> {
    let mut fragments = Vec::new();

    for block in blocks {
        match block {
            DocBlock::Paragraph(text) => push_fragment(&mut fragments, text),
            DocBlock::Table(rows) => {
                for row in rows {
                    for cell in &row.cells {
                        for para in &cell.paragraphs {
                            push_fragment(&mut fragments, para);
                        }
                    }
                }
            }
        }
    }

    fragments
}

fn push_fragment(fragments: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        fragments.push(trimmed.to_string());
    }
}

/// Compute a stable hash for content
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(paragraphs: &[&str]) -> TableCell {
        TableCell {
            paragraphs: paragraphs.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_linearize_preserves_reading_order() {
        let blocks = vec![
            DocBlock::Paragraph("Title line".to_string()),
            DocBlock::Table(vec![
                TableRow {
                    cells: vec![cell(&["Incident Date"]), cell(&["09/02/2026"])],
                },
                TableRow {
                    cells: vec![
                        cell(&["Root Cause"]),
                        cell(&["Flag mismatch.", "Config drift."]),
                    ],
                },
            ]),
            DocBlock::Paragraph("Trailing note".to_string()),
        ];

        let fragments = linearize(&blocks);
        assert_eq!(
            fragments,
            vec![
                "Title line",
                "Incident Date",
                "09/02/2026",
                "Root Cause",
                "Flag mismatch.",
                "Config drift.",
                "Trailing note",
            ]
        );
    }

    #[test]
    fn test_linearize_drops_blank_paragraphs() {
        let blocks = vec![
            DocBlock::Paragraph("   ".to_string()),
            DocBlock::Paragraph("  kept  ".to_string()),
            DocBlock::Table(vec![TableRow {
                cells: vec![cell(&["", "  ", "also kept"])],
            }]),
        ];

        let fragments = linearize(&blocks);
        assert_eq!(fragments, vec!["kept", "also kept"]);
    }

    #[test]
    fn test_linearize_empty_body() {
        assert!(linearize(&[]).is_empty());
    }

    #[test]
    fn test_content_hash_stable() {
        let a = content_hash("incident text");
        let b = content_hash("incident text");
        assert_eq!(a, b);
        assert_ne!(a, content_hash("other text"));
    }
}
