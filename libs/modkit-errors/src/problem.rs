//! RFC 9457 Problem Details document (pure data model, no HTTP framework dependencies)

use http::StatusCode;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Content type for Problem Details as per RFC 9457.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// Member names with a dedicated field; never copied into an extension bag.
pub const RESERVED_MEMBERS: [&str; 11] = [
    "type",
    "title",
    "status",
    "detail",
    "instance",
    "pointer",
    "property",
    "trace_id",
    "not_found",
    "errors",
    "inner_details",
];

/// Whether `key` names a member that has a dedicated field.
#[must_use]
pub fn is_reserved_member(key: &str) -> bool {
    RESERVED_MEMBERS.contains(&key)
}

/// Custom serializer for `StatusCode` to u16
#[allow(clippy::trivially_copy_pass_by_ref)] // serde requires &T signature
fn serialize_status_code<S>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u16(status.as_u16())
}

/// Custom deserializer for `StatusCode` from u16
fn deserialize_status_code<'de, D>(deserializer: D) -> Result<StatusCode, D::Error>
where
    D: Deserializer<'de>,
{
    let code = u16::deserialize(deserializer)?;
    StatusCode::from_u16(code).map_err(serde::de::Error::custom)
}

/// RFC 9457 Problem Details for one or many accumulated problems.
///
/// A single problem is rendered directly. Several problems are rendered as
/// an envelope whose `not_found`, `errors` and `inner_details` members carry
/// the individual problems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct ProblemDetails {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub type_url: String,
    /// A short, human-readable summary of the problem type.
    pub title: String,
    /// The HTTP status code for this occurrence of the problem.
    /// Serializes as u16 for RFC 9457 compatibility.
    #[serde(
        serialize_with = "serialize_status_code",
        deserialize_with = "deserialize_status_code"
    )]
    pub status: StatusCode,
    /// A human-readable explanation specific to this occurrence of the problem.
    pub detail: String,
    /// A URI reference that identifies the specific occurrence of the problem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// JSON pointer to the offending member, on single-problem documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,
    /// Optional trace id useful for tracing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    /// Not-found problems of an aggregated document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_found: Option<Vec<ErrorItem>>,
    /// Every other built-in problem of an aggregated document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorItem>>,
    /// Custom problems of an aggregated document, each a full document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_details: Option<Vec<ProblemDetails>>,
    /// Extension members.
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

/// One problem inside the `not_found` or `errors` member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct ErrorItem {
    /// Human-readable message describing the problem
    pub detail: String,
    /// JSON pointer to the offending member, e.g. `#/items/0/name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,
    /// Status of the original problem; always present on `errors` items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Extension members of the original problem
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl ErrorItem {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            pointer: None,
            status: None,
            extensions: Map::new(),
        }
    }

    pub fn with_pointer(mut self, pointer: impl Into<String>) -> Self {
        self.pointer = Some(pointer.into());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

impl ProblemDetails {
    /// Create a new document with the given status, title, and detail.
    ///
    /// Note: This function accepts `http::StatusCode` for type safety.
    /// The status is serialized as `u16` for RFC 9457 compatibility.
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_owned(),
            title: title.into(),
            status,
            detail: detail.into(),
            instance: None,
            pointer: None,
            trace_id: None,
            not_found: None,
            errors: None,
            inner_details: None,
            extensions: Map::new(),
        }
    }

    pub fn with_type(mut self, type_url: impl Into<String>) -> Self {
        self.type_url = type_url.into();
        self
    }

    pub fn with_instance(mut self, uri: impl Into<String>) -> Self {
        self.instance = Some(uri.into());
        self
    }

    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    pub fn with_pointer(mut self, pointer: impl Into<String>) -> Self {
        self.pointer = Some(pointer.into());
        self
    }

    pub fn with_not_found(mut self, items: Vec<ErrorItem>) -> Self {
        self.not_found = Some(items);
        self
    }

    pub fn with_errors(mut self, items: Vec<ErrorItem>) -> Self {
        self.errors = Some(items);
        self
    }

    pub fn with_inner_details(mut self, details: Vec<ProblemDetails>) -> Self {
        self.inner_details = Some(details);
        self
    }

    /// Adds an extension member. Reserved member names are ignored.
    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if !is_reserved_member(&key) {
            self.extensions.insert(key, value.into());
        }
        self
    }

    /// Whether any of the grouping members carries at least one entry.
    #[must_use]
    pub fn is_aggregate(&self) -> bool {
        let non_empty = |v: Option<usize>| v.is_some_and(|n| n > 0);
        non_empty(self.not_found.as_ref().map(Vec::len))
            || non_empty(self.errors.as_ref().map(Vec::len))
            || non_empty(self.inner_details.as_ref().map(Vec::len))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn problem_details_builder_pattern() {
        let p = ProblemDetails::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Validation Failed",
            "Input validation errors",
        )
        .with_instance("/users/123")
        .with_trace_id("req-456")
        .with_errors(vec![
            ErrorItem::new("Email is required")
                .with_pointer("#/email")
                .with_status(422),
        ]);

        assert_eq!(p.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(p.instance.as_deref(), Some("/users/123"));
        assert_eq!(p.trace_id, Some("req-456".to_owned()));
        assert!(p.is_aggregate());
        assert_eq!(p.errors.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn problem_details_serializes_status_as_u16() {
        let p = ProblemDetails::new(StatusCode::NOT_FOUND, "Not Found", "Resource not found");
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"status\":404"));
        assert!(!json.contains("not_found"));
        assert!(!json.contains("instance"));
    }

    #[test]
    fn problem_details_deserializes_status_from_u16() {
        let json = r#"{"type":"about:blank","title":"Not Found","status":404,"detail":"Resource not found"}"#;
        let p: ProblemDetails = serde_json::from_str(json).unwrap();
        assert_eq!(p.status, StatusCode::NOT_FOUND);
        assert!(!p.is_aggregate());
    }

    #[test]
    fn extensions_are_flattened_and_reserved_names_skipped() {
        let p = ProblemDetails::new(StatusCode::CONFLICT, "Invalid State", "locked")
            .with_extension("retry_after", 30)
            .with_extension("status", 500);
        let value = serde_json::to_value(&p).unwrap();
        assert_eq!(value["retry_after"], json!(30));
        assert_eq!(value["status"], json!(409));

        let back: ProblemDetails = serde_json::from_value(value).unwrap();
        assert_eq!(back.extensions.get("retry_after"), Some(&json!(30)));
        assert_eq!(back, p);
    }

    #[test]
    fn error_items_flatten_extensions() {
        let mut item = ErrorItem::new("too short").with_pointer("#/name");
        item.extensions.insert("min".to_owned(), json!(3));
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            json!({"detail": "too short", "pointer": "#/name", "min": 3})
        );
    }
}
