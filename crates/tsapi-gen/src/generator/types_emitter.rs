//! Emits the standalone `types.generated.ts` file: `paths` and `components`
//! interfaces derived from the raw schema, in the shape TypeScript consumers
//! index from the generated modules (`paths['/users']['get']…`).

use std::collections::BTreeMap;

use itertools::Itertools;
use oas3::{
  Spec,
  spec::{BooleanSchema, MediaType, ObjectOrReference, ObjectSchema, Operation, Parameter, ParameterIn, PathItem, Schema, SchemaType, SchemaTypeSet},
};

const INDENT: &str = "    ";

/// HTTP members of a path entry, in emission order.
const PATH_MEMBERS: &[&str] = &["get", "put", "post", "delete", "options", "head", "patch", "trace"];

#[derive(Default)]
struct Emitter {
  buffer: String,
}

impl Emitter {
  fn line(&mut self, level: usize, text: &str) {
    for _ in 0..level {
      self.buffer.push_str(INDENT);
    }
    self.buffer.push_str(text);
    self.buffer.push('\n');
  }

  /// `/** … */` block: single-line for one entry, multi-line otherwise.
  fn doc(&mut self, level: usize, lines: &[String]) {
    match lines {
      [] => {}
      [only] => self.line(level, &format!("/** {only} */")),
      _ => {
        self.line(level, "/**");
        for entry in lines {
          self.line(level, &format!(" * {entry}"));
        }
        self.line(level, " */");
      }
    }
  }

  fn finish(self) -> String {
    self.buffer
  }
}

fn doc_entries(summary: Option<&str>, format: Option<&str>, description: Option<&str>) -> Vec<String> {
  let mut lines = Vec::new();
  if let Some(summary) = summary {
    lines.push(summary.to_string());
  }
  if let Some(format) = format {
    lines.push(format!("Format: {format}"));
  }
  if let Some(description) = description {
    lines.push(format!("@description {description}"));
  }
  lines
}

fn is_identifier(name: &str) -> bool {
  let mut chars = name.chars();
  chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
    && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Bare for identifiers and plain numbers (status codes), quoted otherwise.
fn property_key(name: &str) -> String {
  if is_identifier(name) || (!name.is_empty() && name.chars().all(|c| c.is_ascii_digit())) {
    name.to_string()
  } else {
    format!("\"{name}\"")
  }
}

pub struct TypesEmitter<'a> {
  spec: &'a Spec,
}

impl<'a> TypesEmitter<'a> {
  pub fn new(spec: &'a Spec) -> Self {
    Self { spec }
  }

  pub fn emit(&self) -> String {
    let mut out = Emitter::default();
    self.emit_paths(&mut out);
    out.line(0, "export type webhooks = Record<string, never>;");
    self.emit_components(&mut out);
    out.line(0, "export type $defs = Record<string, never>;");
    out.line(0, "export type operations = Record<string, never>;");
    out.finish()
  }

  fn emit_paths(&self, out: &mut Emitter) {
    out.line(0, "export interface paths {");
    if let Some(paths) = self.spec.paths.as_ref() {
      for (path, item) in paths {
        out.line(1, &format!("\"{path}\": {{"));
        self.emit_path_item(out, item);
        out.line(1, "};");
      }
    }
    out.line(0, "}");
  }

  fn emit_path_item(&self, out: &mut Emitter, item: &PathItem) {
    let shared = item
      .parameters
      .iter()
      .filter_map(|parameter| parameter.resolve(self.spec).ok())
      .collect::<Vec<_>>();
    self.emit_parameters(out, 2, &shared);

    let operations = item.methods().into_iter().collect::<Vec<_>>();
    for member in PATH_MEMBERS {
      let declared = operations.iter().find(|(method, _)| method.as_str().eq_ignore_ascii_case(member));
      match declared {
        Some((_, operation)) => self.emit_operation(out, 2, member, operation),
        None => out.line(2, &format!("{member}?: never;")),
      }
    }
  }

  fn emit_operation(&self, out: &mut Emitter, level: usize, member: &str, operation: &Operation) {
    out.doc(level, &doc_entries(operation.summary.as_deref(), None, operation.description.as_deref()));
    out.line(level, &format!("{member}: {{"));

    let parameters = operation
      .parameters
      .iter()
      .filter_map(|parameter| parameter.resolve(self.spec).ok())
      .collect::<Vec<_>>();
    self.emit_parameters(out, level + 1, &parameters);

    self.emit_request_body(out, level + 1, operation);
    self.emit_responses(out, level + 1, operation);

    out.line(level, "};");
  }

  fn emit_parameters(&self, out: &mut Emitter, level: usize, parameters: &[Parameter]) {
    out.line(level, "parameters: {");
    for (location, keyword) in [
      (ParameterIn::Query, "query"),
      (ParameterIn::Header, "header"),
      (ParameterIn::Path, "path"),
      (ParameterIn::Cookie, "cookie"),
    ] {
      let group = parameters.iter().filter(|p| p.location == location).collect::<Vec<_>>();
      if group.is_empty() {
        out.line(level + 1, &format!("{keyword}?: never;"));
        continue;
      }

      let any_required = group.iter().any(|p| p.required == Some(true));
      let marker = if any_required { "" } else { "?" };
      out.line(level + 1, &format!("{keyword}{marker}: {{"));
      for parameter in group {
        out.doc(level + 2, &doc_entries(None, None, parameter.description.as_deref()));
        let ts_type = parameter
          .schema
          .as_ref()
          .map_or_else(|| "unknown".to_string(), |schema| self.type_of(schema));
        let optional = if parameter.required == Some(true) { "" } else { "?" };
        out.line(level + 2, &format!("{}{optional}: {ts_type};", property_key(&parameter.name)));
      }
      out.line(level + 1, "};");
    }
    out.line(level, "};");
  }

  fn emit_request_body(&self, out: &mut Emitter, level: usize, operation: &Operation) {
    let Some(body) = operation.request_body.as_ref().and_then(|r| r.resolve(self.spec).ok()) else {
      out.line(level, "requestBody?: never;");
      return;
    };

    out.doc(level, &doc_entries(None, None, body.description.as_deref()));
    let marker = if body.required == Some(true) { "" } else { "?" };
    out.line(level, &format!("requestBody{marker}: {{"));
    self.emit_content(out, level + 1, &body.content);
    out.line(level, "};");
  }

  fn emit_responses(&self, out: &mut Emitter, level: usize, operation: &Operation) {
    let Some(responses) = operation.responses.as_ref() else {
      out.line(level, "responses?: never;");
      return;
    };

    out.line(level, "responses: {");
    for (status, response_ref) in responses {
      let Ok(response) = response_ref.resolve(self.spec) else {
        continue;
      };
      out.doc(level + 1, &doc_entries(None, None, response.description.as_deref()));
      out.line(level + 1, &format!("{}: {{", property_key(status)));
      out.line(level + 2, "headers: {");
      out.line(level + 3, "[name: string]: unknown;");
      out.line(level + 2, "};");
      self.emit_content(out, level + 2, &response.content);
      out.line(level + 1, "};");
    }
    out.line(level, "};");
  }

  fn emit_content(&self, out: &mut Emitter, level: usize, content: &BTreeMap<String, MediaType>) {
    if content.is_empty() {
      out.line(level, "content?: never;");
      return;
    }

    out.line(level, "content: {");
    for (content_type, media_type) in content {
      let ts_type = media_type
        .schema
        .as_ref()
        .map_or_else(|| "unknown".to_string(), |schema| self.type_of(schema));
      out.line(level + 1, &format!("\"{content_type}\": {ts_type};"));
    }
    out.line(level, "};");
  }

  fn emit_components(&self, out: &mut Emitter) {
    out.line(0, "export interface components {");

    let schemas = self.spec.components.as_ref().map(|c| &c.schemas);
    match schemas {
      Some(schemas) if !schemas.is_empty() => {
        out.line(1, "schemas: {");
        for (name, schema_ref) in schemas {
          self.emit_named_schema(out, 2, name, schema_ref);
        }
        out.line(1, "};");
      }
      _ => out.line(1, "schemas: never;"),
    }

    for member in ["responses", "parameters", "requestBodies", "headers", "pathItems"] {
      out.line(1, &format!("{member}: never;"));
    }
    out.line(0, "}");
  }

  /// Object schemas with properties get a multi-line block with per-property
  /// doc comments; everything else renders on one line.
  fn emit_named_schema(&self, out: &mut Emitter, level: usize, name: &str, schema_ref: &ObjectOrReference<ObjectSchema>) {
    let key = property_key(name);

    let Ok(schema) = schema_ref.resolve(self.spec) else {
      out.line(level, &format!("{key}: unknown;"));
      return;
    };

    if schema.properties.is_empty() {
      out.line(level, &format!("{key}: {};", self.schema_type_of(&schema)));
      return;
    }

    out.line(level, &format!("{key}: {{"));
    for (property, property_ref) in &schema.properties {
      let resolved = property_ref.resolve(self.spec).ok();
      let format = resolved.as_ref().and_then(|s| s.format.clone());
      let description = resolved.as_ref().and_then(|s| s.description.clone());
      out.doc(level + 1, &doc_entries(None, format.as_deref(), description.as_deref()));

      let optional = if schema.required.iter().any(|r| r == property) { "" } else { "?" };
      out.line(
        level + 1,
        &format!("{}{optional}: {};", property_key(property), self.type_of(property_ref)),
      );
    }
    out.line(level, "};");
  }

  fn type_of(&self, schema_ref: &ObjectOrReference<ObjectSchema>) -> String {
    match schema_ref {
      ObjectOrReference::Ref { ref_path, .. } => ref_path
        .strip_prefix("#/components/schemas/")
        .map_or_else(|| "unknown".to_string(), |name| format!("components[\"schemas\"][\"{name}\"]")),
      ObjectOrReference::Object(schema) => self.schema_type_of(schema),
    }
  }

  fn schema_type_of(&self, schema: &ObjectSchema) -> String {
    if !schema.enum_values.is_empty() {
      return schema.enum_values.iter().map(literal_of).join(" | ");
    }

    if !schema.one_of.is_empty() || !schema.any_of.is_empty() {
      return schema
        .one_of
        .iter()
        .chain(&schema.any_of)
        .map(|variant| self.type_of(variant))
        .join(" | ");
    }

    if !schema.all_of.is_empty() {
      return schema.all_of.iter().map(|variant| self.type_of(variant)).join(" & ");
    }

    match &schema.schema_type {
      Some(SchemaTypeSet::Single(single)) => self.single_type_of(*single, schema),
      Some(SchemaTypeSet::Multiple(types)) => types.iter().map(|t| self.single_type_of(*t, schema)).join(" | "),
      None => "unknown".to_string(),
    }
  }

  fn single_type_of(&self, schema_type: SchemaType, schema: &ObjectSchema) -> String {
    match schema_type {
      SchemaType::String => "string".to_string(),
      SchemaType::Integer | SchemaType::Number => "number".to_string(),
      SchemaType::Boolean => "boolean".to_string(),
      SchemaType::Null => "null".to_string(),
      SchemaType::Array => self.array_type_of(schema),
      SchemaType::Object => self.object_type_of(schema),
    }
  }

  fn array_type_of(&self, schema: &ObjectSchema) -> String {
    let items = schema.items.as_ref().and_then(|items| match items.as_ref() {
      Schema::Object(object) => Some(self.type_of(object)),
      Schema::Boolean(_) => None,
    });

    match items {
      Some(item_type) if item_type.contains(" | ") || item_type.contains(" & ") => format!("({item_type})[]"),
      Some(item_type) => format!("{item_type}[]"),
      None => "unknown[]".to_string(),
    }
  }

  fn object_type_of(&self, schema: &ObjectSchema) -> String {
    if !schema.properties.is_empty() {
      let members = schema
        .properties
        .iter()
        .map(|(property, property_ref)| {
          let optional = if schema.required.iter().any(|r| r == property) { "" } else { "?" };
          format!("{}{optional}: {};", property_key(property), self.type_of(property_ref))
        })
        .join(" ");
      return format!("{{ {members} }}");
    }

    match schema.additional_properties.as_ref() {
      Some(Schema::Object(value)) => format!("{{ [key: string]: {}; }}", self.type_of(value)),
      Some(Schema::Boolean(BooleanSchema(true))) => "{ [key: string]: unknown; }".to_string(),
      _ => "Record<string, never>".to_string(),
    }
  }
}

fn literal_of(value: &serde_json::Value) -> String {
  match value {
    serde_json::Value::String(text) => format!("\"{text}\""),
    serde_json::Value::Null => "null".to_string(),
    other => other.to_string(),
  }
}
