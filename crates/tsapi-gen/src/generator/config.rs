//! Generation options: defaults, config-file loading, and the merged view the
//! orchestrator runs with. The CLI layers its flags on top of these.

use std::{
  collections::{HashMap, HashSet},
  path::{Path, PathBuf},
};

use anyhow::Context as _;
use serde::Deserialize;

use super::{renderer::Preset, status::StatusCodeStrategy, writer::OverwritePolicy};

/// Config file picked up from the working directory when present.
pub const CONFIG_FILE: &str = "tsapi-gen.config.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct GenerateOptions {
  /// Schema document to read.
  pub input: PathBuf,
  /// Directory the generated modules land in.
  pub output: PathBuf,
  /// Path prefix stripped for grouping and URL rewriting.
  pub base: Option<String>,
  /// Name of the standalone type-definitions file.
  pub types_filename: String,
  /// TypeScript output when true, JavaScript when false.
  pub ts: bool,
  pub overwrite: OverwritePolicy,
  pub preset: Preset,
  pub strategy: StatusCodeStrategy,
  /// Per-method success-status overrides, keyed by lowercase method.
  pub status_overrides: HashMap<String, u16>,
  /// Nouns exempt from singular/plural conversion.
  pub uncountables: Vec<String>,
}

impl Default for GenerateOptions {
  fn default() -> Self {
    Self {
      input: PathBuf::from("./schema.json"),
      output: PathBuf::from("./src/apis"),
      base: None,
      types_filename: "types.generated.ts".to_string(),
      ts: true,
      overwrite: OverwritePolicy::default(),
      preset: Preset::default(),
      strategy: StatusCodeStrategy::default(),
      status_overrides: HashMap::new(),
      uncountables: Vec::new(),
    }
  }
}

impl GenerateOptions {
  /// Explicit path must exist; the well-known file is optional.
  pub async fn load(config_path: Option<&Path>) -> anyhow::Result<Self> {
    match config_path {
      Some(path) => Self::from_file(path).await,
      None => {
        let default_path = Path::new(CONFIG_FILE);
        if tokio::fs::try_exists(default_path).await.unwrap_or(false) {
          Self::from_file(default_path).await
        } else {
          Ok(Self::default())
        }
      }
    }
  }

  async fn from_file(path: &Path) -> anyhow::Result<Self> {
    let content = tokio::fs::read_to_string(path)
      .await
      .with_context(|| format!("Reading config {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))
  }

  /// Uncountables, lowercased for segment matching.
  pub fn uncountable_set(&self) -> HashSet<String> {
    self.uncountables.iter().map(|word| word.to_lowercase()).collect()
  }
}
