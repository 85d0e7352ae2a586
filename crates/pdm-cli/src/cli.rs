//! CLI argument definitions for the PDM entity generator.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use pdm_cli::config::ConfigOverrides;
use pdm_report::EntityTemplate;

#[derive(Parser)]
#[command(
    name = "pdm-codegen",
    version,
    about = "Generate Java entity classes from PowerDesigner PDM files",
    long_about = "Read the tables of a PowerDesigner physical data model (.pdm) and\n\
                  generate one Java entity class per table.\n\n\
                  Settings are read from pdm-codegen.toml when present and can be\n\
                  overridden on the command line."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract entities from a PDM file and write Java sources.
    Generate(GenerateArgs),

    /// Show the entities and fields extracted from a PDM file.
    Inspect(InspectArgs),

    /// List the supported column types and their Java types.
    Types,
}

/// Options shared by every command that reads a PDM file.
#[derive(Args)]
pub struct SourceArgs {
    /// PowerDesigner physical data model file.
    #[arg(value_name = "PDM_FILE")]
    pub pdm_file: PathBuf,

    /// Settings file (default: ./pdm-codegen.toml when present).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Table name prefix, e.g. `t_`.
    #[arg(long = "prefix", value_name = "PREFIX")]
    pub prefix: Option<String>,
}

#[derive(Parser)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Java package of the generated classes.
    #[arg(long = "package", value_name = "PACKAGE")]
    pub package: Option<String>,

    /// Built-in entity template (pojo, lombok, jpa).
    #[arg(
        long = "template",
        value_name = "NAME",
        value_parser = EntityTemplate::from_str,
        conflicts_with = "template_file"
    )]
    pub template: Option<EntityTemplate>,

    /// Template file rendered instead of a built-in template.
    #[arg(long = "template-file", value_name = "PATH")]
    pub template_file: Option<PathBuf>,

    /// Source tree root inside the output directory.
    #[arg(long = "source-root", value_name = "DIR")]
    pub source_root: Option<PathBuf>,

    /// Project directory that receives the source tree.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Replace existing source files.
    #[arg(long = "overwrite")]
    pub overwrite: bool,

    /// Extract and report without writing any file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Also write the extracted model as JSON.
    #[arg(long = "schema-json", value_name = "PATH")]
    pub schema_json: Option<PathBuf>,
}

impl GenerateArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            table_prefix: self.source.prefix.clone(),
            package: self.package.clone(),
            template: self.template,
            template_file: self.template_file.clone(),
            source_root: self.source_root.clone(),
            output_dir: self.output_dir.clone(),
            overwrite: self.overwrite,
        }
    }
}

#[derive(Parser)]
pub struct InspectArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print the extracted model as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

impl InspectArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            table_prefix: self.source.prefix.clone(),
            ..ConfigOverrides::default()
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
