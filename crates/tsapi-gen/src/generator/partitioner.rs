//! Walks the schema's path map and groups operations into renderable modules.

use std::collections::HashSet;

use http::Method;
use indexmap::IndexMap;
use inflections::Inflect;
use itertools::Itertools;
use oas3::{Spec, spec::Operation};

use super::{
  payload::{ABSENT_TYPE, ApiModule, ApiModulePayload},
  status::{StatusPolicy, StatusResolver},
  transformer::Transformer,
};

/// Module used when the grouping segment is empty (path `/` or a path of
/// parameter segments only).
pub const FALLBACK_MODULE: &str = "root";

/// HTTP methods that produce payloads, in output order. Anything else on a
/// path item (`trace`, vendor extensions) is ignored.
pub const SUPPORTED_METHODS: &[Method] = &[
  Method::GET,
  Method::POST,
  Method::PUT,
  Method::DELETE,
  Method::PATCH,
  Method::OPTIONS,
  Method::HEAD,
];

fn module_name(segment: &str) -> String {
  if segment.is_empty() {
    FALLBACK_MODULE.to_string()
  } else {
    segment.to_camel_case()
  }
}

/// Partitions a schema into ordered [`ApiModule`]s: one module per first path
/// segment, one payload per supported (path, method) pair.
pub struct Partitioner<'a> {
  spec: &'a Spec,
  transformer: &'a dyn Transformer,
  resolver: &'a dyn StatusResolver,
  policy: &'a StatusPolicy,
  base: Option<&'a str>,
  uncountables: &'a HashSet<String>,
}

impl<'a> Partitioner<'a> {
  pub fn new(
    spec: &'a Spec,
    transformer: &'a dyn Transformer,
    resolver: &'a dyn StatusResolver,
    policy: &'a StatusPolicy,
    base: Option<&'a str>,
    uncountables: &'a HashSet<String>,
  ) -> Self {
    Self {
      spec,
      transformer,
      resolver,
      policy,
      base,
      uncountables,
    }
  }

  /// Groups path keys by their first non-empty segment (after base-prefix
  /// stripping, for grouping only) and builds payloads in first-seen order.
  pub fn partition(&self) -> Vec<ApiModule> {
    let Some(paths) = self.spec.paths.as_ref() else {
      return Vec::new();
    };

    let mut groups: IndexMap<String, Vec<&String>> = IndexMap::new();
    for path in paths.keys() {
      let stripped = match self.base {
        Some(base) if !base.is_empty() => path.strip_prefix(base).unwrap_or(path),
        _ => path,
      };
      let segment = stripped.split('/').find(|s| !s.is_empty()).unwrap_or_default();
      groups.entry(segment.to_string()).or_default().push(path);
    }

    groups
      .into_iter()
      .map(|(segment, group_paths)| {
        let payloads = group_paths
          .into_iter()
          .flat_map(|path| self.path_payloads(path))
          .collect::<Vec<_>>();

        ApiModule {
          name: module_name(&segment),
          payloads,
        }
      })
      .collect()
  }

  fn path_payloads(&self, path: &str) -> Vec<ApiModulePayload> {
    let Some(path_item) = self.spec.paths.as_ref().and_then(|paths| paths.get(path)) else {
      return Vec::new();
    };

    let available = path_item.methods().into_iter().collect::<Vec<_>>();

    SUPPORTED_METHODS
      .iter()
      .filter_map(|method| {
        available
          .iter()
          .find(|(declared, _)| declared.as_str().eq_ignore_ascii_case(method.as_str()))
          .map(|(_, operation)| self.build_payload(path, method, operation))
      })
      .collect()
  }

  fn build_payload(&self, path: &str, method: &Method, operation: &Operation) -> ApiModulePayload {
    let method_name = method.as_str().to_lowercase();

    let url = self.transformer.url(path, self.base);
    let entity = self.transformer.entity(path, &method_name, self.base, self.uncountables);
    let verb = self.transformer.verb(&method_name);
    let fn_name = self.transformer.fn_name(&verb, &entity);
    let type_name = self.transformer.type_name(&verb, &entity);

    let type_query_value = if self.resolver.has_query_parameter(operation, self.spec) {
      self.transformer.type_query_value(&type_name)
    } else {
      ABSENT_TYPE.to_string()
    };

    let body = self.resolver.request_body_target(operation, self.spec);
    let type_request_body_value = body
      .as_ref()
      .map(|body| self.transformer.type_request_body_value(&type_name, &body.content_type, body.required))
      .unwrap_or_else(|| ABSENT_TYPE.to_string());

    let targets = self.resolver.response_targets(self.policy, &method_name, operation, self.spec);
    let type_response_body_value = if targets.is_empty() {
      ABSENT_TYPE.to_string()
    } else {
      targets
        .iter()
        .map(|target| self.transformer.type_response_body_value(&type_name, target.status, &target.content_type))
        .join(" | ")
    };

    ApiModulePayload {
      fn_name,
      path: path.to_string(),
      url,
      method: method_name.clone(),
      verb: verb.clone(),
      entity: entity.clone(),
      summary: operation.summary.clone(),
      description: operation.description.clone(),
      request_content_type: body.map(|body| body.content_type),
      type_value: self.transformer.type_value(path, &method_name),
      type_query: self.transformer.type_query(&verb, &entity),
      type_query_value,
      type_request_body: self.transformer.type_request_body(&verb, &entity),
      type_request_body_value,
      type_response_body: self.transformer.type_response_body(&verb, &entity),
      type_response_body_value,
      type_name,
    }
  }
}
