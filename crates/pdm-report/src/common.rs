//! Shared output options and path construction.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use pdm_model::Entity;

use crate::java::EntityTemplate;

/// Java source file extension.
pub const JAVA_FILE_SUFFIX: &str = ".java";

/// Options for entity source generation.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Target package, e.g. `com.example.entity`. Empty means the default
    /// package.
    pub package: String,
    /// Source tree root relative to `output_dir`, e.g. `src/main/java`.
    pub source_root: PathBuf,
    pub output_dir: PathBuf,
    pub template: EntityTemplate,
    /// Template file used instead of the built-in `template`.
    pub template_file: Option<PathBuf>,
    /// Replace existing source files instead of failing.
    pub overwrite: bool,
}

impl RenderOptions {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            source_root: PathBuf::from("src/main/java"),
            output_dir: PathBuf::from("."),
            template: EntityTemplate::default(),
            template_file: None,
            overwrite: false,
        }
    }

    #[must_use]
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    #[must_use]
    pub fn with_source_root(mut self, source_root: impl Into<PathBuf>) -> Self {
        self.source_root = source_root.into();
        self
    }

    #[must_use]
    pub fn with_template(mut self, template: EntityTemplate) -> Self {
        self.template = template;
        self
    }

    #[must_use]
    pub fn with_template_file(mut self, template_file: Option<PathBuf>) -> Self {
        self.template_file = template_file;
        self
    }

    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Template file path, or the built-in template name.
    pub fn template_label(&self) -> String {
        match &self.template_file {
            Some(path) => path.display().to_string(),
            None => self.template.to_string(),
        }
    }

    /// Directory that receives the generated sources.
    pub fn package_dir(&self) -> PathBuf {
        self.output_dir
            .join(&self.source_root)
            .join(package_path(&self.package))
    }

    /// Output file for one entity: `<package dir>/<Entity>.java`.
    pub fn entity_path(&self, entity: &Entity) -> PathBuf {
        self.package_dir()
            .join(format!("{}{JAVA_FILE_SUFFIX}", entity.name))
    }

    /// Reject package names that cannot appear in a `package` declaration.
    pub fn validate(&self) -> Result<()> {
        if self.package.is_empty() {
            return Ok(());
        }
        for segment in self.package.split('.') {
            if !is_java_identifier(segment) {
                bail!(
                    "invalid package name '{}': segment '{segment}' is not a Java identifier",
                    self.package
                );
            }
        }
        Ok(())
    }
}

/// `com.example.entity` -> `com/example/entity`.
pub fn package_path(package: &str) -> PathBuf {
    package
        .split('.')
        .filter(|segment| !segment.is_empty())
        .fold(PathBuf::new(), |path, segment| path.join(segment))
}

fn is_java_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_alphanumeric() || ch == '_' || ch == '$')
}

/// Parent directory of `path`, if it has a non-empty one.
pub(crate) fn parent_dir(path: &Path) -> Option<&Path> {
    path.parent()
        .filter(|parent| !parent.as_os_str().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_becomes_nested_directories() {
        assert_eq!(
            package_path("org.shiloh.entity"),
            PathBuf::from("org").join("shiloh").join("entity")
        );
        assert_eq!(package_path(""), PathBuf::new());
    }

    #[test]
    fn package_dir_joins_output_and_source_root() {
        let options = RenderOptions::new("com.example")
            .with_output_dir("out")
            .with_source_root("src");
        assert_eq!(
            options.package_dir(),
            PathBuf::from("out").join("src").join("com").join("example")
        );
    }

    #[test]
    fn package_validation() {
        assert!(RenderOptions::new("com.example.entity").validate().is_ok());
        assert!(RenderOptions::new("").validate().is_ok());
        assert!(RenderOptions::new("com..entity").validate().is_err());
        assert!(RenderOptions::new("com.1st").validate().is_err());
        assert!(RenderOptions::new("com/example").validate().is_err());
    }

    #[test]
    fn template_label_prefers_the_file() {
        let options = RenderOptions::new("com.example").with_template(EntityTemplate::Jpa);
        assert_eq!(options.template_label(), "jpa");
        let options = options.with_template_file(Some(PathBuf::from("entity.java.j2")));
        assert_eq!(options.template_label(), "entity.java.j2");
    }
}
