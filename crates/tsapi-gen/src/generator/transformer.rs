//! Naming grammar: pure functions from URL structure and HTTP method to the
//! canonical names used in generated modules.
//!
//! Every transform is a free function plus a default method on [`Transformer`],
//! so callers can swap any single step without touching the rest.

use std::collections::HashSet;

use inflections::Inflect;

/// Entity used when a path consists of parameter segments only (e.g. `/{id}`).
/// The grammar derives nothing from such a path, so the name is fixed.
pub const FALLBACK_ENTITY: &str = "Root";

fn strip_base<'a>(path: &'a str, base: Option<&str>) -> &'a str {
  match base {
    Some(base) if !base.is_empty() => path.strip_prefix(base).unwrap_or(path),
    _ => path,
  }
}

fn is_parameter_segment(segment: &str) -> bool {
  segment.contains('{')
}

/// `post` -> "Create", `put` -> "Update", anything else capitalized.
pub fn transform_verb(method: &str) -> String {
  match method {
    "post" => "Create".to_string(),
    "put" => "Update".to_string(),
    _ => method.to_pascal_case(),
  }
}

/// Strips the base prefix and rewrites `{param}` segments to `:param`.
pub fn transform_url(path: &str, base: Option<&str>) -> String {
  strip_base(path, base).replace('{', ":").replace('}', "")
}

/// Derives the entity noun from the path segments.
///
/// Parameter segments are dropped from the name but keep their position:
/// `/users/{userId}` ends on a parameter, so `users` is not the last segment
/// and stays singular ("get one user"), while `/users` pluralizes under `get`
/// ("list users"). Uncountable nouns skip singular/plural conversion and take
/// a `List` suffix where pluralization would apply.
pub fn transform_entity(path: &str, method: &str, base: Option<&str>, uncountables: &HashSet<String>) -> String {
  let stripped = strip_base(path, base);
  let segments = stripped.split('/').filter(|s| !s.is_empty()).collect::<Vec<_>>();
  let last = segments.len().saturating_sub(1);

  let mut entity = String::new();
  for (index, segment) in segments.iter().enumerate() {
    if is_parameter_segment(segment) {
      continue;
    }

    let uncountable = uncountables.contains(&segment.to_lowercase());
    let pascal = segment.to_pascal_case();
    let mut word = if uncountable { pascal } else { cruet::to_singular(&pascal) };

    if method == "get" && index == last {
      word = if uncountable {
        format!("{word}List")
      } else {
        cruet::to_plural(&word)
      };
    }

    entity.push_str(&word);
  }

  if entity.is_empty() {
    FALLBACK_ENTITY.to_string()
  } else {
    entity
  }
}

pub fn transform_fn(verb: &str, entity: &str) -> String {
  format!("api{verb}{entity}")
}

pub fn transform_type(verb: &str, entity: &str) -> String {
  format!("Api{verb}{entity}")
}

pub fn transform_type_value(path: &str, method: &str) -> String {
  format!("paths['{path}']['{method}']")
}

pub fn transform_type_query(verb: &str, entity: &str) -> String {
  format!("Api{verb}{entity}Query")
}

pub fn transform_type_query_value(type_name: &str) -> String {
  format!("{type_name}['parameters']['query']")
}

pub fn transform_type_request_body(verb: &str, entity: &str) -> String {
  format!("Api{verb}{entity}RequestBody")
}

/// Required bodies index the request body directly; optional bodies go
/// through `NonNullable` and admit `undefined`.
pub fn transform_type_request_body_value(type_name: &str, content_type: &str, required: bool) -> String {
  if required {
    format!("{type_name}['requestBody']['content']['{content_type}']")
  } else {
    format!("NonNullable<{type_name}['requestBody']>['content']['{content_type}'] | undefined")
  }
}

pub fn transform_type_response_body(verb: &str, entity: &str) -> String {
  format!("Api{verb}{entity}ResponseBody")
}

pub fn transform_type_response_body_value(type_name: &str, status: u16, content_type: &str) -> String {
  format!("{type_name}['responses']['{status}']['content']['{content_type}']")
}

/// Naming capability consumed by the partitioner. Every method defaults to
/// the matching free function; implementors override the steps they want to
/// customize and inherit the rest.
pub trait Transformer {
  fn verb(&self, method: &str) -> String {
    transform_verb(method)
  }

  fn url(&self, path: &str, base: Option<&str>) -> String {
    transform_url(path, base)
  }

  fn entity(&self, path: &str, method: &str, base: Option<&str>, uncountables: &HashSet<String>) -> String {
    transform_entity(path, method, base, uncountables)
  }

  fn fn_name(&self, verb: &str, entity: &str) -> String {
    transform_fn(verb, entity)
  }

  fn type_name(&self, verb: &str, entity: &str) -> String {
    transform_type(verb, entity)
  }

  fn type_value(&self, path: &str, method: &str) -> String {
    transform_type_value(path, method)
  }

  fn type_query(&self, verb: &str, entity: &str) -> String {
    transform_type_query(verb, entity)
  }

  fn type_query_value(&self, type_name: &str) -> String {
    transform_type_query_value(type_name)
  }

  fn type_request_body(&self, verb: &str, entity: &str) -> String {
    transform_type_request_body(verb, entity)
  }

  fn type_request_body_value(&self, type_name: &str, content_type: &str, required: bool) -> String {
    transform_type_request_body_value(type_name, content_type, required)
  }

  fn type_response_body(&self, verb: &str, entity: &str) -> String {
    transform_type_response_body(verb, entity)
  }

  fn type_response_body_value(&self, type_name: &str, status: u16, content_type: &str) -> String {
    transform_type_response_body_value(type_name, status, content_type)
  }
}

/// The stock naming grammar with no overrides.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTransformer;

impl Transformer for DefaultTransformer {}
