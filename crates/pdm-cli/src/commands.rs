use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{info, info_span};

use pdm_cli::config::{GeneratorConfig, load_config};
use pdm_ingest::load_pdm_file;
use pdm_model::{Entity, TypeMapper};
use pdm_report::{TemplateFile, schema_json_string, write_entity_sources, write_schema_json};

use crate::cli::{GenerateArgs, InspectArgs, SourceArgs};
use crate::summary::{apply_table_style, print_entity_fields};
use crate::types::{EntitySummary, GenerateResult};

pub fn run_types() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Column type", "Java type", "Import"]);
    apply_table_style(&mut table);
    for (keyword, java_type) in TypeMapper::standard().entries() {
        table.add_row(vec![
            keyword.to_string(),
            java_type.simple_name().to_string(),
            java_type.qualified_name().unwrap_or("-").to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_generate(args: &GenerateArgs) -> Result<GenerateResult> {
    let config = load_config(args.source.config.as_deref())?.apply_overrides(args.overrides());
    let span = info_span!("generate", pdm_file = %args.source.pdm_file.display());
    let _guard = span.enter();
    let start = Instant::now();

    let entities = extract(&args.source, &config)?;
    let options = config.render_options();

    let summaries = if args.dry_run {
        options.validate()?;
        if let Some(path) = &options.template_file {
            TemplateFile::load(path)?;
        }
        entities
            .iter()
            .map(|entity| EntitySummary::new(entity, Some(options.entity_path(entity))))
            .collect()
    } else {
        let written = write_entity_sources(&entities, &options)?;
        entities
            .iter()
            .zip(written)
            .map(|(entity, path)| EntitySummary::new(entity, Some(path)))
            .collect()
    };

    let schema_json = match &args.schema_json {
        Some(path) if !args.dry_run => {
            write_schema_json(path, &entities)?;
            Some(path.clone())
        }
        _ => None,
    };

    info!(
        entities = entities.len(),
        dry_run = args.dry_run,
        elapsed_ms = start.elapsed().as_millis(),
        "generation complete"
    );

    Ok(GenerateResult {
        pdm_file: args.source.pdm_file.clone(),
        package: config.package,
        template: options.template_label(),
        entities: summaries,
        schema_json,
        dry_run: args.dry_run,
    })
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let config = load_config(args.source.config.as_deref())?.apply_overrides(args.overrides());
    let span = info_span!("inspect", pdm_file = %args.source.pdm_file.display());
    let _guard = span.enter();

    let entities = extract(&args.source, &config)?;
    if args.json {
        println!("{}", schema_json_string(&entities)?);
        return Ok(());
    }
    for (index, entity) in entities.iter().enumerate() {
        if index > 0 {
            println!();
        }
        print_entity_fields(entity);
    }
    Ok(())
}

fn extract(source: &SourceArgs, config: &GeneratorConfig) -> Result<Vec<Entity>> {
    load_pdm_file(&source.pdm_file, &config.extract_options())
        .with_context(|| format!("extract {}", source.pdm_file.display()))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn shop_args(output_dir: PathBuf, dry_run: bool) -> GenerateArgs {
        GenerateArgs {
            source: SourceArgs {
                pdm_file: PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                    .join("../pdm-ingest/tests/data/shop.pdm"),
                config: None,
                prefix: None,
            },
            package: Some("org.shiloh.entity".to_string()),
            template: None,
            template_file: None,
            source_root: None,
            output_dir: Some(output_dir),
            overwrite: false,
            dry_run,
            schema_json: None,
        }
    }

    #[test]
    fn dry_run_reports_target_paths_without_writing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = run_generate(&shop_args(dir.path().to_path_buf(), true)).expect("dry run");

        let package_dir = dir.path().join("src/main/java/org/shiloh/entity");
        assert!(result.dry_run);
        assert_eq!(result.entities.len(), 3);
        assert_eq!(
            result.entities[0].output.as_deref(),
            Some(package_dir.join("UserAccount.java").as_path())
        );
        assert!(!package_dir.exists());
    }

    #[test]
    fn generate_writes_every_reported_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = run_generate(&shop_args(dir.path().to_path_buf(), false)).expect("generate");

        assert_eq!(result.template, "pojo");
        for summary in &result.entities {
            let path = summary.output.as_deref().expect("output path");
            assert!(path.is_file(), "{}", path.display());
        }
    }
}
