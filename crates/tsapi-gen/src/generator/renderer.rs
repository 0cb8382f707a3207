//! Template rendering: structured module data in, module source text out.
//!
//! The renderer is a capability; the default implementation drives Tera with
//! one of the embedded presets or a caller-supplied template file.

use std::path::Path;

use anyhow::Context as _;
use clap::ValueEnum;
use serde::Deserialize;
use tera::Tera;

use super::payload::ApiModuleTemplateData;

const AXLE_TEMPLATE: &str = include_str!("../../templates/axle.ts.tera");
const AXIOS_TEMPLATE: &str = include_str!("../../templates/axios.ts.tera");
const MODULE_TEMPLATE_NAME: &str = "api_module";

/// A template file with this name in the working directory replaces the
/// selected preset.
pub const CUSTOM_TEMPLATE_FILE: &str = "tsapi-gen.tera";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Preset {
  /// `api<ResponseBody, QueryOrBody, RequestBody>(url, method)` factories.
  #[default]
  Axle,
  /// `(config) => request<ResponseBody>({ url, method, ...config })` wrappers.
  Axios,
}

/// Pure rendering capability: `(structured data) -> text`.
pub trait Renderer {
  fn render(&self, data: &ApiModuleTemplateData) -> anyhow::Result<String>;
}

pub struct TemplateRenderer {
  tera: Tera,
}

impl TemplateRenderer {
  pub fn from_preset(preset: Preset) -> anyhow::Result<Self> {
    let source = match preset {
      Preset::Axle => AXLE_TEMPLATE,
      Preset::Axios => AXIOS_TEMPLATE,
    };
    Self::from_source(source)
  }

  pub fn from_source(source: &str) -> anyhow::Result<Self> {
    let mut tera = Tera::default();
    // Output is source code, not markup.
    tera.autoescape_on(Vec::new());
    tera.add_raw_template(MODULE_TEMPLATE_NAME, source).context("Invalid module template")?;
    Ok(Self { tera })
  }

  pub async fn from_template_file(path: &Path) -> anyhow::Result<Self> {
    let source = tokio::fs::read_to_string(path)
      .await
      .with_context(|| format!("Reading template {}", path.display()))?;
    Self::from_source(&source)
  }

  /// Uses the custom template file when one exists next to the invocation,
  /// the embedded preset otherwise.
  pub async fn resolve(preset: Preset) -> anyhow::Result<Self> {
    let custom = Path::new(CUSTOM_TEMPLATE_FILE);
    if tokio::fs::try_exists(custom).await.unwrap_or(false) {
      Self::from_template_file(custom).await
    } else {
      Self::from_preset(preset)
    }
  }
}

impl Renderer for TemplateRenderer {
  fn render(&self, data: &ApiModuleTemplateData) -> anyhow::Result<String> {
    let context = tera::Context::from_serialize(data).context("Serializing template data")?;
    let text = self
      .tera
      .render(MODULE_TEMPLATE_NAME, &context)
      .with_context(|| format!("Rendering module {}", data.api_module.name))?;
    Ok(text)
  }
}
