//! User-supplied entity templates.
//!
//! A template file is rendered once per entity with three variables:
//!
//! - `package`: target package, empty for the default package
//! - `entity`: the entity in its JSON shape (`entity.tableName`,
//!   `entity.fields[i].name`, `entity.fields[i].type`, ...)
//! - `dependencies`: the sorted qualified names the entity must import
//!
//! Sibling files in the template's directory can be pulled in with
//! `{% include %}` or `{% import %}`. The `upper_first` filter turns a field
//! name into its accessor suffix (`userName` -> `UserName`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use minijinja::{AutoEscape, Environment, UndefinedBehavior, context, path_loader};

use pdm_model::Entity;

use crate::common::parent_dir;
use crate::java::accessor_suffix;

/// A template loaded from disk, parsed once and reused for every entity.
pub struct TemplateFile {
    env: Environment<'static>,
    name: String,
    path: PathBuf,
}

impl TemplateFile {
    /// Load and parse the template at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .with_context(|| format!("invalid template path {}", path.display()))?
            .to_string();
        let dir = parent_dir(path).map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        let mut env = Environment::new();
        env.set_loader(path_loader(dir));
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_filter("upper_first", |name: String| accessor_suffix(&name));

        env.get_template(&name)
            .with_context(|| format!("load template {}", path.display()))?;

        Ok(Self {
            env,
            name,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render the source of one entity.
    pub fn render(&self, entity: &Entity, package: &str) -> Result<String> {
        let template = self
            .env
            .get_template(&self.name)
            .with_context(|| format!("load template {}", self.path.display()))?;
        template
            .render(context! {
                package => package,
                entity => entity,
                dependencies => &entity.dependencies,
            })
            .with_context(|| {
                format!(
                    "render template {} for entity {}",
                    self.path.display(),
                    entity.name
                )
            })
    }
}
