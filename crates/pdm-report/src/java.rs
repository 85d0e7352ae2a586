//! Java entity source generation.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt::{self, Write as _};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use pdm_model::{Entity, Field};

use crate::common::RenderOptions;
use crate::template_file::TemplateFile;

const INDENT: &str = "    ";
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Built-in entity templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityTemplate {
    /// Plain class with private fields, getters and setters.
    #[default]
    Pojo,
    /// Lombok `@Data` class.
    Lombok,
    /// JPA-annotated class with getters and setters.
    Jpa,
}

impl EntityTemplate {
    pub const ALL: [EntityTemplate; 3] = [
        EntityTemplate::Pojo,
        EntityTemplate::Lombok,
        EntityTemplate::Jpa,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            EntityTemplate::Pojo => "pojo",
            EntityTemplate::Lombok => "lombok",
            EntityTemplate::Jpa => "jpa",
        }
    }

    const fn has_accessors(self) -> bool {
        !matches!(self, EntityTemplate::Lombok)
    }

    fn imports(self, entity: &Entity) -> Vec<&'static str> {
        match self {
            EntityTemplate::Pojo => Vec::new(),
            EntityTemplate::Lombok => vec!["lombok.Data"],
            EntityTemplate::Jpa => {
                let mut imports = vec![
                    "jakarta.persistence.Column",
                    "jakarta.persistence.Entity",
                    "jakarta.persistence.Table",
                ];
                if entity.primary_key().is_some() {
                    imports.push("jakarta.persistence.Id");
                }
                imports
            }
        }
    }
}

impl fmt::Display for EntityTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|template| template.name() == normalized)
            .ok_or_else(|| {
                format!(
                    "unknown template '{s}' (expected one of: pojo, lombok, jpa)"
                )
            })
    }
}

/// Render the Java source of one entity with the configured template file, or
/// the built-in template when no file is set.
pub fn render_entity(entity: &Entity, options: &RenderOptions) -> Result<String> {
    match &options.template_file {
        Some(path) => TemplateFile::load(path)?.render(entity, &options.package),
        None => render_builtin(entity, options),
    }
}

fn render_builtin(entity: &Entity, options: &RenderOptions) -> Result<String> {
    let template = options.template;
    let mut out = String::new();

    if !options.package.is_empty() {
        writeln!(out, "package {};", options.package)?;
        writeln!(out)?;
    }

    let imports: BTreeSet<&str> = entity
        .dependencies
        .iter()
        .map(String::as_str)
        .chain(template.imports(entity))
        .collect();
    if !imports.is_empty() {
        for import in &imports {
            writeln!(out, "import {import};")?;
        }
        writeln!(out)?;
    }

    write_class_doc(&mut out, entity)?;
    match template {
        EntityTemplate::Pojo => {}
        EntityTemplate::Lombok => writeln!(out, "@Data")?,
        EntityTemplate::Jpa => {
            writeln!(out, "@Entity")?;
            writeln!(out, "@Table(name = \"{}\")", entity.table_name)?;
        }
    }
    writeln!(out, "public class {} {{", entity.name)?;

    for field in &entity.fields {
        writeln!(out)?;
        write_field(&mut out, field, template)?;
    }

    if template.has_accessors() {
        for field in &entity.fields {
            writeln!(out)?;
            write_accessors(&mut out, field)?;
        }
    }

    writeln!(out, "}}")?;
    Ok(out)
}

fn write_class_doc(out: &mut String, entity: &Entity) -> fmt::Result {
    writeln!(out, "/**")?;
    if let Some(comment) = non_blank(entity.comment.as_deref()) {
        for line in comment.lines() {
            writeln!(out, " * {}", javadoc_text(line))?;
        }
        writeln!(out, " * <p>")?;
    }
    writeln!(out, " * Table: {}", entity.table_name)?;
    let creator = non_blank(entity.creator.as_deref());
    if creator.is_some() || entity.create_date.is_some() {
        writeln!(out, " *")?;
    }
    if let Some(creator) = creator {
        writeln!(out, " * @author {}", javadoc_text(creator))?;
    }
    if let Some(date) = entity.create_date {
        writeln!(out, " * @date {}", date.format(DATE_FORMAT))?;
    }
    writeln!(out, " */")
}

fn write_field(out: &mut String, field: &Field, template: EntityTemplate) -> fmt::Result {
    if let Some(comment) = non_blank(field.comment.as_deref()) {
        writeln!(out, "{INDENT}/**")?;
        for line in comment.lines() {
            writeln!(out, "{INDENT} * {}", javadoc_text(line))?;
        }
        writeln!(out, "{INDENT} */")?;
    }
    if template == EntityTemplate::Jpa {
        if field.is_primary_key {
            writeln!(out, "{INDENT}@Id")?;
        }
        write!(out, "{INDENT}@Column(name = \"{}\"", field.col_name)?;
        if let Some(length) = field.col_length {
            write!(out, ", length = {length}")?;
        }
        if field.mandatory {
            write!(out, ", nullable = false")?;
        }
        writeln!(out, ")")?;
    }
    writeln!(out, "{INDENT}private {} {};", field.type_name(), field.name)
}

fn write_accessors(out: &mut String, field: &Field) -> fmt::Result {
    let suffix = accessor_suffix(&field.name);
    let type_name = field.type_name();
    let name = &field.name;

    writeln!(out, "{INDENT}public {type_name} get{suffix}() {{")?;
    writeln!(out, "{INDENT}{INDENT}return {name};")?;
    writeln!(out, "{INDENT}}}")?;
    writeln!(out)?;
    writeln!(out, "{INDENT}public void set{suffix}({type_name} {name}) {{")?;
    writeln!(out, "{INDENT}{INDENT}this.{name} = {name};")?;
    writeln!(out, "{INDENT}}}")
}

/// `userName` -> `UserName`.
pub(crate) fn accessor_suffix(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Keep comment text from closing the surrounding Javadoc block.
fn javadoc_text(text: &str) -> String {
    text.trim().replace("*/", "*&#47;")
}

/// Render every entity and write one source file per entity.
///
/// Every entity is checked and rendered before anything is written, so a
/// conflict or template error leaves the output directory untouched.
pub fn write_entity_sources(entities: &[Entity], options: &RenderOptions) -> Result<Vec<PathBuf>> {
    options.validate()?;
    let template_file = options
        .template_file
        .as_deref()
        .map(TemplateFile::load)
        .transpose()?;

    let mut seen = HashSet::new();
    let mut targets = Vec::with_capacity(entities.len());
    for entity in entities {
        check_field_names(entity)?;
        let path = options.entity_path(entity);
        if !seen.insert(path.clone()) {
            bail!(
                "entity name {} is generated by more than one table ({})",
                entity.name,
                entity.table_name
            );
        }
        if path.exists() && !options.overwrite {
            bail!(
                "{} already exists; enable overwrite to replace it",
                path.display()
            );
        }
        let source = match &template_file {
            Some(template) => template.render(entity, &options.package),
            None => render_builtin(entity, options),
        }
        .with_context(|| format!("render entity {}", entity.name))?;
        targets.push((entity, path, source));
    }

    let package_dir = options.package_dir();
    if !package_dir.exists() {
        debug!(dir = %package_dir.display(), "creating package directory");
        fs::create_dir_all(&package_dir)
            .with_context(|| format!("create {}", package_dir.display()))?;
    }

    let mut written = Vec::with_capacity(targets.len());
    for (entity, path, source) in targets {
        fs::write(&path, source).with_context(|| format!("write {}", path.display()))?;
        info!(
            entity = %entity.name,
            template = %options.template_label(),
            path = %path.display(),
            "generated entity"
        );
        written.push(path);
    }
    Ok(written)
}

/// Two columns whose names convert to the same identifier would declare the
/// same field twice.
fn check_field_names(entity: &Entity) -> Result<()> {
    let mut names: HashMap<&str, &str> = HashMap::new();
    for field in &entity.fields {
        if let Some(first) = names.insert(field.name.as_str(), field.col_name.as_str()) {
            bail!(
                "columns {first} and {} of table {} both map to field {}",
                field.col_name,
                entity.table_name,
                field.name
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_names_round_trip() {
        for template in EntityTemplate::ALL {
            assert_eq!(template.name().parse::<EntityTemplate>(), Ok(template));
        }
        assert_eq!("JPA".parse::<EntityTemplate>(), Ok(EntityTemplate::Jpa));
        assert!("freemarker".parse::<EntityTemplate>().is_err());
    }

    #[test]
    fn accessor_suffix_capitalizes_first_char() {
        assert_eq!(accessor_suffix("userName"), "UserName");
        assert_eq!(accessor_suffix("id"), "Id");
        assert_eq!(accessor_suffix("___"), "___");
    }

    #[test]
    fn javadoc_text_cannot_close_the_comment() {
        assert_eq!(javadoc_text(" a */ b "), "a *&#47; b");
    }
}
