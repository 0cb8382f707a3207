//! Sequences a generation run: effective options in, files and a summary out.
//! Holds no transformation logic of its own.

use std::path::PathBuf;

use anyhow::Context as _;
use oas3::Spec;

use super::{
  config::GenerateOptions,
  partitioner::Partitioner,
  payload::ApiModule,
  renderer::{Renderer, TemplateRenderer},
  status::{DefaultStatusResolver, StatusPolicy, StatusResolver},
  transformer::{DefaultTransformer, Transformer},
  types_emitter::TypesEmitter,
  writer::{OutputWriter, WriteReport},
};

/// What a run did: per-module outcomes, operation count, and the type
/// definitions file when one was emitted.
#[derive(Debug)]
pub struct GenerationSummary {
  pub reports: Vec<WriteReport>,
  pub operations: usize,
  pub types_file: Option<PathBuf>,
}

impl GenerationSummary {
  pub fn written(&self) -> usize {
    self.reports.iter().filter(|report| report.written()).count()
  }

  pub fn skipped(&self) -> usize {
    self.reports.len() - self.written()
  }
}

pub struct Orchestrator {
  options: GenerateOptions,
  policy: StatusPolicy,
  transformer: Box<dyn Transformer>,
  resolver: Box<dyn StatusResolver>,
  renderer: Box<dyn Renderer>,
}

impl Orchestrator {
  /// Builds the default pipeline for the given options: stock naming grammar,
  /// stock status resolution, preset (or custom-file) template.
  pub async fn new(options: GenerateOptions) -> anyhow::Result<Self> {
    let policy = StatusPolicy::new(options.strategy, options.status_overrides.clone());
    let renderer = TemplateRenderer::resolve(options.preset).await?;

    Ok(Self {
      options,
      policy,
      transformer: Box::new(DefaultTransformer),
      resolver: Box::new(DefaultStatusResolver),
      renderer: Box::new(renderer),
    })
  }

  #[must_use]
  pub fn with_transformer(mut self, transformer: impl Transformer + 'static) -> Self {
    self.transformer = Box::new(transformer);
    self
  }

  #[must_use]
  pub fn with_resolver(mut self, resolver: impl StatusResolver + 'static) -> Self {
    self.resolver = Box::new(resolver);
    self
  }

  #[must_use]
  pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
    self.renderer = Box::new(renderer);
    self
  }

  #[must_use]
  pub fn with_policy(mut self, policy: StatusPolicy) -> Self {
    self.policy = policy;
    self
  }

  pub fn partition(&self, spec: &Spec) -> Vec<ApiModule> {
    let uncountables = self.options.uncountable_set();
    Partitioner::new(
      spec,
      self.transformer.as_ref(),
      self.resolver.as_ref(),
      &self.policy,
      self.options.base.as_deref(),
      &uncountables,
    )
    .partition()
  }

  /// Full run: optional type-definitions file, then one output file per
  /// module. The schema is already parsed; acquisition failures abort before
  /// this is ever called.
  pub async fn run(&self, spec: &Spec) -> anyhow::Result<GenerationSummary> {
    tokio::fs::create_dir_all(&self.options.output)
      .await
      .with_context(|| format!("Creating output directory {}", self.options.output.display()))?;

    let types_file = if self.options.ts {
      let path = self.options.output.join(&self.options.types_filename);
      let text = TypesEmitter::new(spec).emit();
      tokio::fs::write(&path, text)
        .await
        .with_context(|| format!("Writing {}", path.display()))?;
      Some(path)
    } else {
      None
    };

    let modules = self.partition(spec);
    let writer = OutputWriter::new(
      &self.options.output,
      self.renderer.as_ref(),
      &self.options.overwrite,
      &self.options.types_filename,
      self.options.ts,
    );
    let reports = writer.write_modules(&modules).await?;
    let operations = modules.iter().map(|module| module.payloads.len()).sum();

    Ok(GenerationSummary {
      reports,
      operations,
      types_file,
    })
  }
}
