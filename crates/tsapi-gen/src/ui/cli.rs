use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::colors::{ColorMode, ThemeMode};
use crate::generator::{renderer::Preset, status::StatusCodeStrategy};

#[derive(Parser, Debug)]
#[command(name = "tsapi-gen")]
#[command(version, about = "OpenAPI to typed API module generator")]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List information derived from an OpenAPI specification
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Generate API modules from an OpenAPI specification
  Generate(GenerateCommand),
}

#[derive(Args, Debug)]
pub struct GenerateCommand {
  /// Path to the OpenAPI specification file (JSON or YAML)
  #[arg(short, long, value_name = "FILE")]
  pub input: Option<PathBuf>,

  /// Directory the generated modules are written to
  #[arg(short, long, value_name = "DIR")]
  pub output: Option<PathBuf>,

  /// Path prefix stripped from schema paths for grouping and URLs
  #[arg(short, long, value_name = "PREFIX")]
  pub base: Option<String>,

  /// Name of the generated type-definitions file
  #[arg(long, value_name = "FILE")]
  pub types_filename: Option<String>,

  /// Emit JavaScript modules instead of TypeScript
  #[arg(long, default_value_t = false)]
  pub js: bool,

  /// Module template preset
  #[arg(short, long, value_enum)]
  pub preset: Option<Preset>,

  /// Success-status selection strategy
  #[arg(short, long, value_enum)]
  pub strategy: Option<StatusCodeStrategy>,

  /// Per-method success-status override (e.g. post=200); repeatable
  #[arg(long = "status-override", value_name = "METHOD=CODE")]
  pub status_override: Vec<String>,

  /// Noun exempt from pluralization (e.g. fish); repeatable
  #[arg(long = "uncountable", value_name = "WORD")]
  pub uncountable: Vec<String>,

  /// Overwrite existing module files, optionally limited to the given modules
  #[arg(long, value_name = "MODULE", num_args = 0..)]
  pub overwrite: Option<Vec<String>>,

  /// Never overwrite existing module files
  #[arg(long, conflicts_with = "overwrite", default_value_t = false)]
  pub no_overwrite: bool,

  /// Config file to load instead of tsapi-gen.config.json
  #[arg(short, long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Enable verbose output
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List the modules the schema partitions into
  Modules {
    /// Path to the OpenAPI specification file (JSON or YAML)
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Path prefix stripped from schema paths for grouping and URLs
    #[arg(short, long, value_name = "PREFIX")]
    base: Option<String>,
  },
  /// List every operation with its generated function name
  Operations {
    /// Path to the OpenAPI specification file (JSON or YAML)
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Path prefix stripped from schema paths for grouping and URLs
    #[arg(short, long, value_name = "PREFIX")]
    base: Option<String>,
  },
}
