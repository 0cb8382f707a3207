//! Persists rendered modules, honoring the overwrite policy so re-runs never
//! clobber hand-edited files unless asked to.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

use super::{
  payload::{ApiModule, ApiModuleTemplateData},
  renderer::Renderer,
};

/// Either a blanket yes/no or an explicit allow-list of module names.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OverwritePolicy {
  All(bool),
  Modules(Vec<String>),
}

impl Default for OverwritePolicy {
  fn default() -> Self {
    Self::All(true)
  }
}

impl OverwritePolicy {
  pub fn allows(&self, module: &str) -> bool {
    match self {
      Self::All(all) => *all,
      Self::Modules(modules) => modules.iter().any(|name| name == module),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteDisposition {
  Written,
  /// Target already exists and the policy does not grant overwriting; the
  /// existing file is left untouched.
  SkippedExisting,
}

/// Outcome of one module write, surfaced in the run summary.
#[derive(Debug, Clone)]
pub struct WriteReport {
  pub module: String,
  pub path: PathBuf,
  pub disposition: WriteDisposition,
}

impl WriteReport {
  pub fn written(&self) -> bool {
    self.disposition == WriteDisposition::Written
  }
}

pub struct OutputWriter<'a> {
  output_dir: &'a Path,
  renderer: &'a dyn Renderer,
  overwrite: &'a OverwritePolicy,
  types_filename: &'a str,
  ts: bool,
}

impl<'a> OutputWriter<'a> {
  pub fn new(
    output_dir: &'a Path,
    renderer: &'a dyn Renderer,
    overwrite: &'a OverwritePolicy,
    types_filename: &'a str,
    ts: bool,
  ) -> Self {
    Self {
      output_dir,
      renderer,
      overwrite,
      types_filename,
      ts,
    }
  }

  /// Renders and persists every module. Content is fully materialized before
  /// any write, and each file is written whole.
  pub async fn write_modules(&self, modules: &[ApiModule]) -> anyhow::Result<Vec<WriteReport>> {
    tokio::fs::create_dir_all(self.output_dir)
      .await
      .with_context(|| format!("Creating output directory {}", self.output_dir.display()))?;

    let types_stem = self.types_filename.strip_suffix(".ts").unwrap_or(self.types_filename);
    let extension = if self.ts { "ts" } else { "js" };

    let mut reports = Vec::with_capacity(modules.len());
    for module in modules {
      let data = ApiModuleTemplateData {
        api_module: module.clone(),
        types_filename: types_stem.to_string(),
        ts: self.ts,
      };
      let content = self.renderer.render(&data)?;

      let target = self.output_dir.join(format!("{}.{extension}", module.name));
      let exists = tokio::fs::try_exists(&target).await.unwrap_or(false);

      let disposition = if exists && !self.overwrite.allows(&module.name) {
        WriteDisposition::SkippedExisting
      } else {
        tokio::fs::write(&target, content)
          .await
          .with_context(|| format!("Writing {}", target.display()))?;
        WriteDisposition::Written
      };

      reports.push(WriteReport {
        module: module.name.clone(),
        path: target,
        disposition,
      });
    }

    Ok(reports)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::generator::payload::ApiModuleTemplateData;

  struct StubRenderer;

  impl Renderer for StubRenderer {
    fn render(&self, data: &ApiModuleTemplateData) -> anyhow::Result<String> {
      Ok(format!("// module {} ({})\n", data.api_module.name, data.types_filename))
    }
  }

  fn module(name: &str) -> ApiModule {
    ApiModule {
      name: name.to_string(),
      payloads: Vec::new(),
    }
  }

  #[tokio::test]
  async fn test_writes_new_files() {
    let dir = tempfile::tempdir().unwrap();
    let overwrite = OverwritePolicy::default();
    let writer = OutputWriter::new(dir.path(), &StubRenderer, &overwrite, "types.generated.ts", true);

    let reports = writer.write_modules(&[module("users"), module("pets")]).await.unwrap();

    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(WriteReport::written));
    let content = std::fs::read_to_string(dir.path().join("users.ts")).unwrap();
    assert_eq!(content, "// module users (types.generated)\n");
  }

  #[tokio::test]
  async fn test_skip_preserves_existing_content() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("users.ts");
    std::fs::write(&target, "// hand edited\n").unwrap();

    let overwrite = OverwritePolicy::All(false);
    let writer = OutputWriter::new(dir.path(), &StubRenderer, &overwrite, "types.generated.ts", true);
    let reports = writer.write_modules(&[module("users")]).await.unwrap();

    assert_eq!(reports[0].disposition, WriteDisposition::SkippedExisting);
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "// hand edited\n");
  }

  #[tokio::test]
  async fn test_disabled_overwrite_still_writes_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let overwrite = OverwritePolicy::All(false);
    let writer = OutputWriter::new(dir.path(), &StubRenderer, &overwrite, "types.generated.ts", true);

    let reports = writer.write_modules(&[module("users")]).await.unwrap();
    assert!(reports[0].written());
  }

  #[tokio::test]
  async fn test_allow_list_overwrites_only_listed_modules() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("users.ts"), "// old users\n").unwrap();
    std::fs::write(dir.path().join("pets.ts"), "// old pets\n").unwrap();

    let overwrite = OverwritePolicy::Modules(vec!["users".to_string()]);
    let writer = OutputWriter::new(dir.path(), &StubRenderer, &overwrite, "types.generated.ts", true);
    let reports = writer.write_modules(&[module("users"), module("pets")]).await.unwrap();

    assert!(reports[0].written());
    assert_eq!(reports[1].disposition, WriteDisposition::SkippedExisting);
    assert_eq!(std::fs::read_to_string(dir.path().join("users.ts")).unwrap(), "// module users (types.generated)\n");
    assert_eq!(std::fs::read_to_string(dir.path().join("pets.ts")).unwrap(), "// old pets\n");
  }

  #[tokio::test]
  async fn test_javascript_flavor_extension() {
    let dir = tempfile::tempdir().unwrap();
    let overwrite = OverwritePolicy::default();
    let writer = OutputWriter::new(dir.path(), &StubRenderer, &overwrite, "types.generated.ts", false);

    let reports = writer.write_modules(&[module("users")]).await.unwrap();
    assert_eq!(reports[0].path, dir.path().join("users.js"));
  }

  #[tokio::test]
  async fn test_rerun_with_overwrite_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let overwrite = OverwritePolicy::default();
    let writer = OutputWriter::new(dir.path(), &StubRenderer, &overwrite, "types.generated.ts", true);

    writer.write_modules(&[module("users")]).await.unwrap();
    let first = std::fs::read_to_string(dir.path().join("users.ts")).unwrap();
    writer.write_modules(&[module("users")]).await.unwrap();
    let second = std::fs::read_to_string(dir.path().join("users.ts")).unwrap();

    assert_eq!(first, second);
  }
}
