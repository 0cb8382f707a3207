//! Success-status and content-type resolution for operations.
//!
//! A [`StatusPolicy`] decides which declared response statuses count as
//! success; the [`StatusResolver`] capability turns those into concrete
//! (status, content-type) targets and resolves request-body content types.

use std::{collections::HashMap, fmt};

use clap::ValueEnum;
use oas3::{
  Spec,
  spec::{Operation, ParameterIn, RequestBody, Response},
};
use serde::Deserialize;

/// Content types considered for response bodies, in resolution order.
pub const RESPONSE_CONTENT_TYPES: &[&str] = &[
  "application/json",
  "*/*",
  "application/x-www-form-urlencoded",
  "multipart/form-data",
];

/// Content types considered for request bodies, in resolution order.
pub const REQUEST_CONTENT_TYPES: &[&str] = &[
  "application/json",
  "application/x-www-form-urlencoded",
  "multipart/form-data",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StatusCodeStrategy {
  /// Exactly the conventional code for the method (post 201, delete 204, ...).
  #[default]
  Strict,
  /// Every declared code passing the validity predicate; unions when several remain.
  Loose,
  /// The first declared code at or above the conventional one.
  Smart,
}

/// One resolvable success response: a status code plus the content type its
/// body is declared under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseTarget {
  pub status: u16,
  pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBodyTarget {
  pub content_type: String,
  pub required: bool,
}

/// Status selection policy: strategy, per-method overrides, and the validity
/// predicate declared statuses must pass before the strategy narrows them.
pub struct StatusPolicy {
  strategy: StatusCodeStrategy,
  overrides: HashMap<String, u16>,
  validate: Box<dyn Fn(u16) -> bool + Send + Sync>,
}

impl fmt::Debug for StatusPolicy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StatusPolicy")
      .field("strategy", &self.strategy)
      .field("overrides", &self.overrides)
      .finish_non_exhaustive()
  }
}

impl Default for StatusPolicy {
  fn default() -> Self {
    Self::new(StatusCodeStrategy::default(), HashMap::new())
  }
}

impl StatusPolicy {
  pub fn new(strategy: StatusCodeStrategy, overrides: HashMap<String, u16>) -> Self {
    Self {
      strategy,
      overrides,
      validate: Box::new(|status| (200..300).contains(&status)),
    }
  }

  /// Replaces the validity predicate (default: `200 <= status < 300`).
  #[must_use]
  pub fn with_validator(mut self, validate: impl Fn(u16) -> bool + Send + Sync + 'static) -> Self {
    self.validate = Box::new(validate);
    self
  }

  /// The conventional success code for a method under this policy.
  pub fn expected_status(&self, method: &str) -> u16 {
    if let Some(code) = self.overrides.get(method) {
      return *code;
    }

    match self.strategy {
      StatusCodeStrategy::Strict => match method {
        "post" => 201,
        "delete" | "options" => 204,
        _ => 200,
      },
      StatusCodeStrategy::Loose | StatusCodeStrategy::Smart => 200,
    }
  }

  /// Declared statuses that survive the predicate and the strategy, sorted
  /// ascending. Non-numeric response keys (`default`, `4XX`) never match.
  pub fn success_statuses(&self, method: &str, operation: &Operation) -> Vec<u16> {
    let mut declared = operation
      .responses
      .as_ref()
      .map(|responses| responses.keys().filter_map(|key| key.parse::<u16>().ok()).collect::<Vec<_>>())
      .unwrap_or_default();

    declared.sort_unstable();
    declared.retain(|status| (self.validate)(*status));

    let expected = self.expected_status(method);
    match self.strategy {
      StatusCodeStrategy::Strict => declared.into_iter().filter(|status| *status == expected).collect(),
      StatusCodeStrategy::Smart => declared.into_iter().find(|status| *status >= expected).into_iter().collect(),
      StatusCodeStrategy::Loose => declared,
    }
  }
}

/// Picks the content type a response body resolves under, or None when the
/// response declares no usable content.
pub fn resolve_response_content_type(response: &Response) -> Option<String> {
  RESPONSE_CONTENT_TYPES
    .iter()
    .find(|content_type| response.content.contains_key(**content_type))
    .map(|content_type| (*content_type).to_string())
}

/// Picks the content type a request body is sent as: priority order first,
/// then whatever the body declares.
pub fn resolve_request_content_type(body: &RequestBody) -> Option<String> {
  REQUEST_CONTENT_TYPES
    .iter()
    .find(|content_type| body.content.contains_key(**content_type))
    .map(|content_type| (*content_type).to_string())
    .or_else(|| body.content.keys().next().cloned())
}

/// Resolution capability consumed by the partitioner. Default methods carry
/// the stock behavior; implementors override individual steps.
pub trait StatusResolver {
  /// The (status, content-type) pairs to surface as response-body candidates,
  /// ordered ascending by status. Statuses whose response declares no
  /// resolvable content type drop out.
  fn response_targets(&self, policy: &StatusPolicy, method: &str, operation: &Operation, spec: &Spec) -> Vec<ResponseTarget> {
    policy
      .success_statuses(method, operation)
      .into_iter()
      .filter_map(|status| {
        let response = operation.responses.as_ref()?.get(&status.to_string())?.resolve(spec).ok()?;
        let content_type = resolve_response_content_type(&response)?;
        Some(ResponseTarget { status, content_type })
      })
      .collect()
  }

  /// The content type and required flag of a declared request body, None when
  /// the operation has no body.
  fn request_body_target(&self, operation: &Operation, spec: &Spec) -> Option<RequestBodyTarget> {
    let body = operation.request_body.as_ref()?.resolve(spec).ok()?;
    let content_type = resolve_request_content_type(&body)?;

    Some(RequestBodyTarget {
      content_type,
      required: body.required.unwrap_or(false),
    })
  }

  /// True iff at least one declared parameter lives in the query string.
  fn has_query_parameter(&self, operation: &Operation, spec: &Spec) -> bool {
    operation
      .parameters
      .iter()
      .filter_map(|parameter| parameter.resolve(spec).ok())
      .any(|parameter| parameter.location == ParameterIn::Query)
  }
}

/// The stock resolution rules with no overrides.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStatusResolver;

impl StatusResolver for DefaultStatusResolver {}

#[cfg(test)]
mod tests {
  use std::collections::BTreeMap;

  use oas3::spec::{MediaType, ObjectOrReference, Parameter};
  use serde_json::json;

  use super::*;

  fn empty_spec() -> Spec {
    serde_json::from_value(json!({
      "openapi": "3.0.0",
      "info": { "title": "Test API", "version": "1.0.0" },
      "paths": {}
    }))
    .unwrap()
  }

  fn response_with_content(content_types: &[&str]) -> ObjectOrReference<Response> {
    let content = content_types
      .iter()
      .map(|content_type| ((*content_type).to_string(), MediaType::default()))
      .collect::<BTreeMap<_, _>>();

    ObjectOrReference::Object(Response {
      content,
      ..Default::default()
    })
  }

  fn operation_with_responses(entries: &[(&str, &[&str])]) -> Operation {
    let responses = entries
      .iter()
      .map(|(status, content_types)| ((*status).to_string(), response_with_content(content_types)))
      .collect::<BTreeMap<_, _>>();

    Operation {
      responses: Some(responses),
      ..Default::default()
    }
  }

  #[test]
  fn test_strict_selects_only_the_expected_status() {
    let policy = StatusPolicy::new(StatusCodeStrategy::Strict, HashMap::new());
    let operation = operation_with_responses(&[("200", &["application/json"]), ("404", &["application/json"])]);

    assert_eq!(policy.success_statuses("get", &operation), vec![200]);
  }

  #[test]
  fn test_strict_post_expects_created() {
    let policy = StatusPolicy::new(StatusCodeStrategy::Strict, HashMap::new());
    let operation = operation_with_responses(&[("200", &[]), ("201", &["application/json"])]);

    assert_eq!(policy.success_statuses("post", &operation), vec![201]);
  }

  #[test]
  fn test_loose_retains_every_valid_status() {
    let policy = StatusPolicy::new(StatusCodeStrategy::Loose, HashMap::new());
    let operation = operation_with_responses(&[
      ("200", &["application/json"]),
      ("201", &["application/json"]),
      ("404", &["application/json"]),
    ]);

    assert_eq!(policy.success_statuses("get", &operation), vec![200, 201]);
  }

  #[test]
  fn test_smart_picks_first_declared_at_or_above_expected() {
    let policy = StatusPolicy::new(StatusCodeStrategy::Smart, HashMap::new());
    let operation = operation_with_responses(&[("201", &["application/json"]), ("404", &["application/json"])]);

    assert_eq!(policy.success_statuses("post", &operation), vec![201]);
  }

  #[test]
  fn test_smart_without_valid_statuses_selects_nothing() {
    let policy = StatusPolicy::new(StatusCodeStrategy::Smart, HashMap::new());
    let operation = operation_with_responses(&[("404", &["application/json"])]);

    assert!(policy.success_statuses("get", &operation).is_empty());
  }

  #[test]
  fn test_per_method_override_wins_over_strategy_table() {
    let overrides = HashMap::from([("get".to_string(), 202)]);
    let policy = StatusPolicy::new(StatusCodeStrategy::Strict, overrides);
    let operation = operation_with_responses(&[("200", &["application/json"]), ("202", &["application/json"])]);

    assert_eq!(policy.success_statuses("get", &operation), vec![202]);
  }

  #[test]
  fn test_non_numeric_status_keys_are_ignored() {
    let policy = StatusPolicy::new(StatusCodeStrategy::Loose, HashMap::new());
    let operation = operation_with_responses(&[("default", &["application/json"]), ("200", &["application/json"])]);

    assert_eq!(policy.success_statuses("get", &operation), vec![200]);
  }

  #[test]
  fn test_custom_validity_predicate() {
    let policy = StatusPolicy::new(StatusCodeStrategy::Loose, HashMap::new()).with_validator(|status| status == 404);
    let operation = operation_with_responses(&[("200", &["application/json"]), ("404", &["application/json"])]);

    assert_eq!(policy.success_statuses("get", &operation), vec![404]);
  }

  #[test]
  fn test_response_content_type_priority() {
    let targets = |content_types: &[&str]| {
      let policy = StatusPolicy::default();
      let operation = operation_with_responses(&[("200", content_types)]);
      DefaultStatusResolver.response_targets(&policy, "get", &operation, &empty_spec())
    };

    assert_eq!(targets(&["*/*", "application/json"])[0].content_type, "application/json");
    assert_eq!(targets(&["text/html", "*/*"])[0].content_type, "*/*");
    assert_eq!(
      targets(&["application/x-www-form-urlencoded"])[0].content_type,
      "application/x-www-form-urlencoded"
    );
  }

  #[test]
  fn test_statuses_without_resolvable_content_drop_out() {
    let policy = StatusPolicy::new(StatusCodeStrategy::Loose, HashMap::new());
    let operation = operation_with_responses(&[("200", &["text/html"]), ("201", &["application/json"])]);

    let targets = DefaultStatusResolver.response_targets(&policy, "get", &operation, &empty_spec());
    assert_eq!(targets, vec![ResponseTarget {
      status: 201,
      content_type: "application/json".to_string(),
    }]);
  }

  #[test]
  fn test_no_responses_yields_no_targets() {
    let policy = StatusPolicy::default();
    let operation = Operation::default();

    assert!(DefaultStatusResolver.response_targets(&policy, "get", &operation, &empty_spec()).is_empty());
  }

  fn operation_with_body(content_types: &[&str], required: Option<bool>) -> Operation {
    let content = content_types
      .iter()
      .map(|content_type| ((*content_type).to_string(), MediaType::default()))
      .collect::<BTreeMap<_, _>>();

    Operation {
      request_body: Some(ObjectOrReference::Object(RequestBody {
        content,
        required,
        ..Default::default()
      })),
      ..Default::default()
    }
  }

  #[test]
  fn test_request_body_absent() {
    assert!(DefaultStatusResolver.request_body_target(&Operation::default(), &empty_spec()).is_none());
  }

  #[test]
  fn test_request_body_content_type_priority() {
    let target = DefaultStatusResolver
      .request_body_target(
        &operation_with_body(&["multipart/form-data", "application/json"], Some(true)),
        &empty_spec(),
      )
      .unwrap();

    assert_eq!(target.content_type, "application/json");
    assert!(target.required);
  }

  #[test]
  fn test_request_body_falls_back_to_first_declared_content_type() {
    let target = DefaultStatusResolver
      .request_body_target(&operation_with_body(&["text/plain"], None), &empty_spec())
      .unwrap();

    assert_eq!(target.content_type, "text/plain");
    assert!(!target.required);
  }

  fn query_parameter(name: &str) -> ObjectOrReference<Parameter> {
    ObjectOrReference::Object(Parameter {
      name: name.to_string(),
      location: ParameterIn::Query,
      required: Some(false),
      schema: None,
      description: None,
      deprecated: None,
      allow_empty_value: None,
      allow_reserved: None,
      explode: None,
      style: None,
      content: None,
      example: None,
      examples: BTreeMap::default(),
      extensions: BTreeMap::default(),
    })
  }

  #[test]
  fn test_query_parameter_detection() {
    let mut operation = Operation::default();
    assert!(!DefaultStatusResolver.has_query_parameter(&operation, &empty_spec()));

    operation.parameters.push(query_parameter("limit"));
    assert!(DefaultStatusResolver.has_query_parameter(&operation, &empty_spec()));

    let mut path_only = query_parameter("id");
    if let ObjectOrReference::Object(parameter) = &mut path_only {
      parameter.location = ParameterIn::Path;
    }
    let operation = Operation {
      parameters: vec![path_only],
      ..Default::default()
    };
    assert!(!DefaultStatusResolver.has_query_parameter(&operation, &empty_spec()));
  }
}
