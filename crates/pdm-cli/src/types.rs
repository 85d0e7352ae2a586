use std::path::PathBuf;

use pdm_model::Entity;

#[derive(Debug)]
pub struct GenerateResult {
    pub pdm_file: PathBuf,
    pub package: String,
    /// Built-in template name or template file path.
    pub template: String,
    pub entities: Vec<EntitySummary>,
    pub schema_json: Option<PathBuf>,
    pub dry_run: bool,
}

#[derive(Debug)]
pub struct EntitySummary {
    pub entity_name: String,
    pub table_name: String,
    pub fields: usize,
    pub primary_key: Option<String>,
    pub imports: usize,
    /// Written file, or the target path on a dry run.
    pub output: Option<PathBuf>,
}

impl EntitySummary {
    pub fn new(entity: &Entity, output: Option<PathBuf>) -> Self {
        Self {
            entity_name: entity.name.clone(),
            table_name: entity.table_name.clone(),
            fields: entity.fields.len(),
            primary_key: entity.primary_key().map(|field| field.name.clone()),
            imports: entity.dependencies.len(),
            output,
        }
    }
}
