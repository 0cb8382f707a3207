use std::collections::HashMap;

use anyhow::Context as _;
use chrono::{Local, Timelike};
use crossterm::style::Stylize;

use crate::{
  generator::{
    config::GenerateOptions,
    orchestrator::{GenerationSummary, Orchestrator},
    writer::OverwritePolicy,
  },
  ui::{Colors, GenerateCommand},
  utils::spec::SpecLoader,
};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

/// Effective generation settings: config file merged under CLI flags.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
  pub options: GenerateOptions,
  pub verbose: bool,
  pub quiet: bool,
}

impl GenerateConfig {
  pub async fn from_command(command: GenerateCommand) -> anyhow::Result<Self> {
    let mut options = GenerateOptions::load(command.config.as_deref()).await?;

    if let Some(input) = command.input {
      options.input = input;
    }
    if let Some(output) = command.output {
      options.output = output;
    }
    if let Some(base) = command.base {
      options.base = Some(base);
    }
    if let Some(types_filename) = command.types_filename {
      options.types_filename = types_filename;
    }
    if command.js {
      options.ts = false;
    }
    if let Some(preset) = command.preset {
      options.preset = preset;
    }
    if let Some(strategy) = command.strategy {
      options.strategy = strategy;
    }

    for (method, code) in parse_status_overrides(&command.status_override)? {
      options.status_overrides.insert(method, code);
    }
    options.uncountables.extend(command.uncountable);

    if command.no_overwrite {
      options.overwrite = OverwritePolicy::All(false);
    } else if let Some(modules) = command.overwrite {
      options.overwrite = if modules.is_empty() {
        OverwritePolicy::All(true)
      } else {
        OverwritePolicy::Modules(modules)
      };
    }

    Ok(Self {
      options,
      verbose: command.verbose,
      quiet: command.quiet,
    })
  }
}

fn parse_status_overrides(entries: &[String]) -> anyhow::Result<HashMap<String, u16>> {
  let mut map = HashMap::new();
  for entry in entries {
    let (method, code) = entry
      .split_once('=')
      .ok_or_else(|| anyhow::anyhow!("Invalid status override '{entry}': expected METHOD=CODE (e.g., post=200)"))?;
    let code = code
      .parse::<u16>()
      .with_context(|| format!("Invalid status code in override '{entry}'"))?;
    map.insert(method.to_lowercase(), code);
  }
  Ok(map)
}

struct GenerateLogger<'a> {
  config: &'a GenerateConfig,
  colors: &'a Colors,
}

impl<'a> GenerateLogger<'a> {
  fn new(config: &'a GenerateConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      println!("{} {message}", format_timestamp().with(self.colors.timestamp()));
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      println!(
        "            {:<25} {}",
        label.with(self.colors.label()),
        value.with(self.colors.value())
      );
    }
  }

  fn log_loading(&self) {
    self.info(
      &format!("Loading OpenAPI spec from: {}", self.config.options.input.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_generating(&self) {
    let message = if self.config.options.ts {
      "Generating TypeScript API modules..."
    } else {
      "Generating JavaScript API modules..."
    };
    self.info(&message.with(self.colors.primary()).to_string());
  }

  fn print_reports(&self, summary: &GenerationSummary) {
    if self.config.quiet {
      return;
    }

    if let Some(types_file) = &summary.types_file {
      self.info(
        &format!("Generated {}", types_file.display())
          .with(self.colors.success())
          .to_string(),
      );
    }

    for report in &summary.reports {
      if report.written() {
        self.info(
          &format!("Generated {}", report.path.display())
            .with(self.colors.success())
            .to_string(),
        );
      } else {
        eprintln!(
          "{} {}",
          "Skipped:".with(self.colors.accent()),
          format!("file already exists: {}", report.path.display()).with(self.colors.primary())
        );
      }
    }
  }

  fn print_statistics(&self, summary: &GenerationSummary) {
    if self.config.quiet {
      return;
    }

    self.stat("Modules written:", summary.written().to_string());
    if summary.skipped() > 0 {
      self.stat("Modules skipped:", summary.skipped().to_string());
    }
    self.stat("Functions generated:", summary.operations.to_string());

    if self.config.verbose {
      self.stat("Preset:", self.config.options.preset.to_string());
      self.stat("Strategy:", self.config.options.strategy.to_string());
      for report in &summary.reports {
        self.stat("", report.path.display().to_string());
      }
    }
  }

  fn log_success(&self) {
    if !self.config.quiet {
      println!();
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        "Successfully generated API modules".with(self.colors.success())
      );
    }
  }
}

pub async fn generate_code(config: GenerateConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = GenerateLogger::new(&config, colors);

  logger.log_loading();
  let spec = SpecLoader::open(&config.options.input).await?.parse()?;

  logger.log_generating();
  let orchestrator = Orchestrator::new(config.options.clone()).await?;
  let summary = orchestrator.run(&spec).await?;

  logger.print_reports(&summary);
  logger.print_statistics(&summary);
  logger.log_success();
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    generator::{renderer::Preset, status::StatusCodeStrategy},
    ui::GenerateCommand,
  };

  fn bare_command() -> GenerateCommand {
    GenerateCommand {
      input: None,
      output: None,
      base: None,
      types_filename: None,
      js: false,
      preset: None,
      strategy: None,
      status_override: Vec::new(),
      uncountable: Vec::new(),
      overwrite: None,
      no_overwrite: false,
      config: None,
      verbose: false,
      quiet: false,
    }
  }

  #[test]
  fn test_parse_status_overrides_empty() {
    assert!(parse_status_overrides(&[]).unwrap().is_empty());
  }

  #[test]
  fn test_parse_status_overrides_entries() {
    let map = parse_status_overrides(&["post=200".to_string(), "DELETE=200".to_string()]).unwrap();
    assert_eq!(map.get("post"), Some(&200));
    assert_eq!(map.get("delete"), Some(&200));
  }

  #[test]
  fn test_parse_status_overrides_missing_equals() {
    let error = parse_status_overrides(&["post".to_string()]).unwrap_err();
    assert!(error.to_string().contains("expected METHOD=CODE"));
  }

  #[test]
  fn test_parse_status_overrides_bad_code() {
    assert!(parse_status_overrides(&["post=created".to_string()]).is_err());
  }

  #[tokio::test]
  async fn test_from_command_applies_flags_over_defaults() {
    let command = GenerateCommand {
      input: Some("./openapi.json".into()),
      base: Some("/api/v1".to_string()),
      js: true,
      preset: Some(Preset::Axios),
      strategy: Some(StatusCodeStrategy::Smart),
      status_override: vec!["post=200".to_string()],
      uncountable: vec!["fish".to_string()],
      no_overwrite: true,
      ..bare_command()
    };

    let config = GenerateConfig::from_command(command).await.unwrap();
    let options = &config.options;

    assert_eq!(options.input, std::path::PathBuf::from("./openapi.json"));
    assert_eq!(options.base.as_deref(), Some("/api/v1"));
    assert!(!options.ts);
    assert_eq!(options.preset, Preset::Axios);
    assert_eq!(options.strategy, StatusCodeStrategy::Smart);
    assert_eq!(options.status_overrides.get("post"), Some(&200));
    assert_eq!(options.uncountables, vec!["fish".to_string()]);
    assert!(!options.overwrite.allows("users"));
  }

  #[tokio::test]
  async fn test_from_command_overwrite_allow_list() {
    let command = GenerateCommand {
      overwrite: Some(vec!["users".to_string()]),
      ..bare_command()
    };

    let config = GenerateConfig::from_command(command).await.unwrap();
    assert!(config.options.overwrite.allows("users"));
    assert!(!config.options.overwrite.allows("pets"));
  }
}
