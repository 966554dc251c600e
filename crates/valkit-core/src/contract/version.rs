//! Version compatibility advisories.
//!
//! These never fail validation; they only produce warnings for the host.

use serde_json::Value;

/// Versions that produce no advisory.
pub const SUPPORTED_VERSIONS: [&str; 3] = ["2.0", "3.0.0", "3.1.0"];

/// Non-fatal finding about the declared version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionAdvisory {
    Unspecified,
    Unsupported(String),
}

impl VersionAdvisory {
    pub fn message(&self) -> String {
        match self {
            VersionAdvisory::Unspecified => "API version not specified in the spec.".to_string(),
            VersionAdvisory::Unsupported(version) => format!(
                "API version {version} is not fully supported. Consider using OpenAPI 3.0.0 or 3.1.0."
            ),
        }
    }
}

/// The `swagger` field, or `openapi` when `swagger` is absent. Non-string
/// values are rendered as JSON text.
pub fn declared_version(doc: &Value) -> Option<String> {
    ["swagger", "openapi"]
        .iter()
        .filter_map(|key| doc.get(*key))
        .find(|v| !v.is_null() && v.as_str() != Some(""))
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
}

/// Advisory for the document's declared version, if any.
pub fn check_version(doc: &Value) -> Option<VersionAdvisory> {
    match declared_version(doc) {
        None => Some(VersionAdvisory::Unspecified),
        Some(v) if SUPPORTED_VERSIONS.contains(&v.as_str()) => None,
        Some(v) => Some(VersionAdvisory::Unsupported(v)),
    }
}
