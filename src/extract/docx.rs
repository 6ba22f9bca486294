//! DOCX body loading
//!
//! Walks the document object model of a `.docx` file and converts its
//! body children (paragraphs and tables, reading order preserved) into
//! the block model consumed by the linearizer. Paragraph text is the
//! concatenation of its runs' text children.

use super::{DocBlock, TableCell, TableRow};
use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild, TableCellContent, TableChild, TableRowChild};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading a report document.
#[derive(Debug, Error)]
pub enum DocxError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse DOCX: {0}")]
    Parse(String),
}

/// Load a `.docx` file into the block model.
pub fn load_docx(path: &Path) -> Result<Vec<DocBlock>, DocxError> {
    let data = std::fs::read(path).map_err(|source| DocxError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let docx = read_docx(&data).map_err(|e| DocxError::Parse(e.to_string()))?;

    Ok(document_blocks(&docx))
}

/// Convert a parsed document's body into blocks.
pub fn document_blocks(docx: &docx_rs::Docx) -> Vec<DocBlock> {
    docx.document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(DocBlock::Paragraph(paragraph_text(p))),
            DocumentChild::Table(t) => Some(DocBlock::Table(table_rows(t))),
            _ => None,
        })
        .collect()
}

/// Concatenated run text of one paragraph.
fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    paragraph
        .children
        .iter()
        .filter_map(|child| {
            if let ParagraphChild::Run(run) = child {
                Some(
                    run.children
                        .iter()
                        .filter_map(|rc| {
                            if let RunChild::Text(t) = rc {
                                Some(t.text.clone())
                            } else {
                                None
                            }
                        })
                        .collect::<Vec<_>>()
                        .join(""),
                )
            } else {
                None
            }
        })
        .collect::<Vec<_>>()
        .join("")
}

fn table_rows(table: &docx_rs::Table) -> Vec<TableRow> {
    table
        .rows
        .iter()
        .map(|row_child| {
            let TableChild::TableRow(row) = row_child;
            TableRow {
                cells: row
                    .cells
                    .iter()
                    .map(|cell_child| {
                        let TableRowChild::TableCell(cell) = cell_child;
                        let mut paragraphs = Vec::new();
                        cell_paragraphs(cell, &mut paragraphs);
                        TableCell { paragraphs }
                    })
                    .collect(),
            }
        })
        .collect()
}

/// Collect a cell's paragraph texts. Nested tables are flattened into the
/// enclosing cell's paragraph list, preserving reading order.
fn cell_paragraphs(cell: &docx_rs::TableCell, out: &mut Vec<String>) {
    for content in &cell.children {
        match content {
            TableCellContent::Paragraph(p) => out.push(paragraph_text(p)),
            TableCellContent::Table(nested) => {
                for row_child in &nested.rows {
                    let TableChild::TableRow(row) = row_child;
                    for cell_child in &row.cells {
                        let TableRowChild::TableCell(inner) = cell_child;
                        cell_paragraphs(inner, out);
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::linearize;
    use docx_rs::{Docx, Paragraph, Run};

    fn para(text: &str) -> Paragraph {
        Paragraph::new().add_run(Run::new().add_text(text))
    }

    #[test]
    fn test_document_blocks_reading_order() {
        let table = docx_rs::Table::new(vec![docx_rs::TableRow::new(vec![
            docx_rs::TableCell::new().add_paragraph(para("Incident Date")),
            docx_rs::TableCell::new().add_paragraph(para("09/02/2026")),
        ])]);

        let docx = Docx::new()
            .add_paragraph(para("Gateway outage in staging"))
            .add_table(table)
            .add_paragraph(para("Closing note"));

        let blocks = document_blocks(&docx);
        let fragments = linearize(&blocks);

        assert_eq!(
            fragments,
            vec![
                "Gateway outage in staging",
                "Incident Date",
                "09/02/2026",
                "Closing note",
            ]
        );
    }

    #[test]
    fn test_empty_paragraphs_survive_as_blocks_only() {
        let docx = Docx::new()
            .add_paragraph(Paragraph::new())
            .add_paragraph(para("content"));

        let blocks = document_blocks(&docx);
        assert_eq!(blocks.len(), 2);
        assert_eq!(linearize(&blocks), vec!["content"]);
    }

    #[test]
    fn test_load_docx_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.docx");
        std::fs::write(&path, b"not a zip archive").unwrap();

        let err = load_docx(&path).unwrap_err();
        assert!(matches!(err, DocxError::Parse(_)));
    }

    #[test]
    fn test_load_docx_missing_file() {
        let err = load_docx(Path::new("/nonexistent/report.docx")).unwrap_err();
        assert!(matches!(err, DocxError::Io { .. }));
    }
}
