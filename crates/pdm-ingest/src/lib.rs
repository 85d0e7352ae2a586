//! PDM ingestion: document loading, naming transforms and schema extraction.
//!
//! The whole document is read into memory before extraction starts; the
//! extraction pass itself performs no I/O and shares nothing mutable, so
//! independent documents can be processed in parallel.

pub mod error;
pub mod extract;
pub mod naming;
pub mod xml;

use std::io::Read;
use std::path::Path;

use tracing::info;

use pdm_model::{Entity, TypeMapper};

pub use error::{IngestError, Result};
pub use extract::{ExtractOptions, MANDATORY_FLAG, extract_entities};
pub use naming::{NamingOptions, lower_camel, upper_camel};
pub use xml::{XmlElement, parse_document};

/// Parse PDM text and extract its entities with the standard type mapper.
pub fn load_pdm_str(xml: &str, options: &ExtractOptions) -> Result<Vec<Entity>> {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let root = parse_document(xml)?;
    extract_entities(&root, options, TypeMapper::standard())
}

/// Read a PDM file and extract its entities.
pub fn load_pdm_file(path: &Path, options: &ExtractOptions) -> Result<Vec<Entity>> {
    let xml = std::fs::read_to_string(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bytes = xml.len(), "read PDM document");
    load_pdm_str(&xml, options)
}

/// Read a PDM document from a stream and extract its entities.
pub fn load_pdm_reader<R: Read>(mut reader: R, options: &ExtractOptions) -> Result<Vec<Entity>> {
    let mut xml = String::new();
    reader
        .read_to_string(&mut xml)
        .map_err(IngestError::StreamRead)?;
    load_pdm_str(&xml, options)
}
