use std::path::{Path, PathBuf};

use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};

use crate::{
  generator::{config::GenerateOptions, orchestrator::Orchestrator, payload::ApiModule},
  ui::{Colors, colors::to_comfy, term_width},
  utils::spec::SpecLoader,
};

async fn partition_schema(input: &Path, base: Option<String>) -> anyhow::Result<Vec<ApiModule>> {
  let spec = SpecLoader::open(input).await?.parse()?;
  let options = GenerateOptions {
    input: input.to_path_buf(),
    base,
    ..GenerateOptions::default()
  };
  let orchestrator = Orchestrator::new(options).await?;
  Ok(orchestrator.partition(&spec))
}

fn new_table(colors: &Colors, headers: &[&str]) -> Table {
  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut row = Row::new();
  for header in headers {
    row.add_cell(Cell::new(*header).fg(to_comfy(colors.label())));
  }
  table.set_header(row);
  table
}

pub async fn list_modules(input: &PathBuf, base: Option<String>, colors: &Colors) -> anyhow::Result<()> {
  let modules = partition_schema(input, base).await?;

  let mut table = new_table(colors, &["MODULE", "FILE", "FUNCTIONS"]);
  for module in modules {
    let mut row = Row::new();
    row.add_cell(Cell::new(&module.name).fg(to_comfy(colors.value())).add_attribute(Attribute::Bold));
    row.add_cell(Cell::new(format!("{}.ts", module.name)).fg(to_comfy(colors.primary())));
    row.add_cell(
      Cell::new(module.payloads.len())
        .fg(to_comfy(colors.accent()))
        .set_alignment(CellAlignment::Right),
    );
    table.add_row(row);
  }

  println!("{table}");
  Ok(())
}

pub async fn list_operations(input: &PathBuf, base: Option<String>, colors: &Colors) -> anyhow::Result<()> {
  let modules = partition_schema(input, base).await?;

  let mut table = new_table(colors, &["FUNCTION", "METHOD", "URL"]);
  for module in modules {
    for payload in module.payloads {
      let mut row = Row::new();
      row.add_cell(Cell::new(&payload.fn_name).fg(to_comfy(colors.value())).add_attribute(Attribute::Bold));
      row.add_cell(
        Cell::new(payload.method.to_uppercase())
          .fg(to_comfy(colors.accent()))
          .set_alignment(CellAlignment::Right),
      );
      row.add_cell(Cell::new(&payload.url).fg(to_comfy(colors.primary())));
      table.add_row(row);
    }
  }

  println!("{table}");
  Ok(())
}
