//! Schema JSON output.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use pdm_model::Entity;

use crate::common::parent_dir;

/// Serialize the extracted entities as pretty-printed JSON.
pub fn schema_json_string(entities: &[Entity]) -> Result<String> {
    serde_json::to_string_pretty(entities).context("serialize schema")
}

/// Write the extracted entities to `output_path` as JSON.
pub fn write_schema_json(output_path: &Path, entities: &[Entity]) -> Result<()> {
    if let Some(parent) = parent_dir(output_path) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let file =
        File::create(output_path).with_context(|| format!("create {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, entities).context("serialize schema")?;
    writeln!(writer)?;
    writer
        .flush()
        .with_context(|| format!("flush {}", output_path.display()))?;
    info!(
        path = %output_path.display(),
        entities = entities.len(),
        "wrote schema JSON"
    );
    Ok(())
}
