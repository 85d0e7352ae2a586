//! Error types for PDM ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an extraction run.
///
/// Absent optional structure (comments, lengths, primary keys) is never an
/// error; it is carried as `None` in the model.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Failed to read the PDM document.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read the PDM document from a stream.
    #[error("failed to read PDM input: {0}")]
    StreamRead(#[source] std::io::Error),

    // === Document Errors ===
    /// The document is not well-formed XML.
    #[error("malformed XML at byte {position}: {message}")]
    Xml { position: u64, message: String },

    /// The document has no root element.
    #[error("PDM document has no root element")]
    EmptyDocument,

    /// A mandatory element is missing.
    #[error("missing <{element}> element{}", table_suffix(.table))]
    MissingElement {
        element: &'static str,
        table: Option<String>,
    },

    /// A mandatory attribute is missing.
    #[error("missing {attribute} attribute on <{element}>{}", table_suffix(.table))]
    MissingAttribute {
        attribute: &'static str,
        element: &'static str,
        table: Option<String>,
    },

    /// A present value could not be parsed.
    #[error("invalid {field} value '{value}' in table {table}")]
    InvalidValue {
        field: &'static str,
        value: String,
        table: String,
    },

    // === Type Errors ===
    /// A column type has no Java mapping.
    #[error("no Java type mapping for column type '{col_type}' in table {table}")]
    UnmappableType { col_type: String, table: String },
}

fn table_suffix(table: &Option<String>) -> String {
    match table {
        Some(table) => format!(" in table {table}"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
