//! Generator settings loaded from `pdm-codegen.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use pdm_ingest::ExtractOptions;
use pdm_report::{EntityTemplate, RenderOptions};

/// Config file picked up from the working directory when `--config` is not
/// given.
pub const DEFAULT_CONFIG_FILE: &str = "pdm-codegen.toml";

/// Persistent generator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Prefix applied to stored table names and stripped from class names.
    pub table_prefix: String,
    pub package: String,
    pub template: EntityTemplate,
    /// Template file rendered instead of the built-in `template`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_file: Option<PathBuf>,
    pub source_root: PathBuf,
    pub output_dir: PathBuf,
    pub overwrite: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            table_prefix: String::new(),
            package: "com.example.entity".to_string(),
            template: EntityTemplate::default(),
            template_file: None,
            source_root: PathBuf::from("src/main/java"),
            output_dir: PathBuf::from("."),
            overwrite: false,
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub table_prefix: Option<String>,
    pub package: Option<String>,
    pub template: Option<EntityTemplate>,
    pub template_file: Option<PathBuf>,
    pub source_root: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub overwrite: bool,
}

impl GeneratorConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("parse generator config")
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serialize generator config")
    }

    #[must_use]
    pub fn apply_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(prefix) = overrides.table_prefix {
            self.table_prefix = prefix;
        }
        if let Some(package) = overrides.package {
            self.package = package;
        }
        // An explicit built-in template replaces a configured template file.
        if let Some(template) = overrides.template {
            self.template = template;
            self.template_file = None;
        }
        if let Some(template_file) = overrides.template_file {
            self.template_file = Some(template_file);
        }
        if let Some(source_root) = overrides.source_root {
            self.source_root = source_root;
        }
        if let Some(output_dir) = overrides.output_dir {
            self.output_dir = output_dir;
        }
        self.overwrite |= overrides.overwrite;
        self
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions::with_table_prefix(self.table_prefix.clone())
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::new(self.package.clone())
            .with_template(self.template)
            .with_template_file(self.template_file.clone())
            .with_source_root(self.source_root.clone())
            .with_output_dir(self.output_dir.clone())
            .with_overwrite(self.overwrite)
    }
}

/// Load settings from `path`, or from [`DEFAULT_CONFIG_FILE`] when no path is
/// given.
///
/// An explicit path must exist. A missing default file yields the defaults.
pub fn load_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    let (path, explicit) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    if !explicit && !path.is_file() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(GeneratorConfig::default());
    }
    let content =
        fs::read_to_string(&path).with_context(|| format!("read config {}", path.display()))?;
    let config = GeneratorConfig::from_toml_str(&content)
        .with_context(|| format!("load config {}", path.display()))?;
    debug!(path = %path.display(), "loaded config file");
    Ok(config)
}
