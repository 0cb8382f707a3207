use serde::Serialize;

/// Marker used wherever a payload has no source to derive a type from: an
/// operation without a request body, a response set with no resolvable
/// success status, or an operation without query parameters. Rendered
/// verbatim into the generated type aliases.
pub const ABSENT_TYPE: &str = "never";

/// One generated request function: everything the template needs to emit the
/// function plus its type aliases for a single (path, method) pair.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiModulePayload {
  /// Generated function name, e.g. `apiGetUsers`.
  #[serde(rename = "fn")]
  pub fn_name: String,
  /// Original schema path, brace parameters intact, e.g. `/users/{userId}`.
  pub path: String,
  /// Routing URL: base prefix stripped, `{param}` rewritten to `:param`.
  pub url: String,
  /// Lowercase HTTP method.
  pub method: String,
  /// Semantic verb: Create/Update/Get/Delete/...
  pub verb: String,
  /// Noun derived from the path segments.
  pub entity: String,
  pub summary: Option<String>,
  pub description: Option<String>,
  /// Content type the request body is sent as, when the operation has one.
  pub request_content_type: Option<String>,
  /// Root type alias name, e.g. `ApiGetUsers`.
  #[serde(rename = "type")]
  pub type_name: String,
  /// Root type alias value, e.g. `paths['/users']['get']`.
  pub type_value: String,
  pub type_query: String,
  pub type_query_value: String,
  pub type_request_body: String,
  pub type_request_body_value: String,
  pub type_response_body: String,
  pub type_response_body_value: String,
}

/// A named group of payloads sharing the same first path segment. One module
/// becomes one output file.
#[derive(Debug, Clone, Serialize)]
pub struct ApiModule {
  /// Camel-cased grouping segment, also the output file stem.
  pub name: String,
  pub payloads: Vec<ApiModulePayload>,
}

/// The renderer contract: the full data handed to the template for one
/// module file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiModuleTemplateData {
  pub api_module: ApiModule,
  /// Import stem of the shared type-definitions file (extension stripped).
  pub types_filename: String,
  /// TypeScript output when true, JavaScript when false.
  pub ts: bool,
}
