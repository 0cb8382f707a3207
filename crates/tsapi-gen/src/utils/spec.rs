use std::{ffi::OsStr, path::Path};

use anyhow::Context as _;
use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};
use oas3::OpenApiV3Spec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecFormat {
  #[default]
  Json,
  Yaml,
}

impl SpecFormat {
  #[must_use]
  pub fn from_extension(ext: &str) -> Self {
    match ext {
      "yaml" | "yml" => Self::Yaml,
      _ => Self::Json,
    }
  }
}

/// Memory-mapped schema reader. Parsing happens once, after open; any failure
/// here is fatal to the run.
pub struct SpecLoader {
  file: AsyncMmapFile,
  format: SpecFormat,
}

impl SpecLoader {
  pub async fn open(path: &Path) -> anyhow::Result<Self> {
    let format = path
      .extension()
      .and_then(OsStr::to_str)
      .map_or(SpecFormat::default(), SpecFormat::from_extension);

    let file = AsyncMmapFile::open(path)
      .await
      .with_context(|| format!("Reading schema {}", path.display()))?;

    Ok(Self { file, format })
  }

  pub fn parse(&self) -> anyhow::Result<oas3::Spec> {
    match self.format {
      SpecFormat::Json => {
        let value: serde_json::Value = serde_json::from_slice(self.file.as_slice()).context("Parsing schema JSON")?;
        ensure_not_swagger(value.get("swagger").is_some())?;
        serde_json::from_value::<OpenApiV3Spec>(value).context("Invalid OpenAPI 3.x document")
      }
      SpecFormat::Yaml => {
        let content = std::str::from_utf8(self.file.as_slice()).context("Schema is not valid UTF-8")?;
        ensure_not_swagger(content.lines().any(|line| line.starts_with("swagger:")))?;
        oas3::from_yaml(content).context("Invalid OpenAPI 3.x document")
      }
    }
  }
}

fn ensure_not_swagger(is_swagger: bool) -> anyhow::Result<()> {
  if is_swagger {
    anyhow::bail!("Swagger 2.x documents are not supported; convert the schema to OpenAPI 3.x first");
  }
  Ok(())
}
