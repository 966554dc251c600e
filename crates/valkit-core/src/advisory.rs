//! Canned remediation hints for API validation failures.

use crate::host::{Host, NoticeLevel};
use crate::obs;

/// `(keyword, suggestion)` pairs in priority order. Keywords are lowercase
/// and matched by case-insensitive containment.
pub const REMEDIATIONS: &[(&str, &str)] = &[
    ("missing", "Check required fields in your API spec."),
    ("invalid type", "Ensure correct data types for properties."),
    ("unsupported", "Verify OpenAPI/Swagger version compatibility."),
    ("circular $ref", "Remove or fix circular references in $ref paths."),
    ("syntax", "Validate JSON/YAML formatting."),
    (
        "timeout",
        "Check network connection or increase timeout for large specs.",
    ),
];

/// Shown when no keyword matches.
pub const GENERIC_SUGGESTION: &str = "Consider reviewing the API spec for potential issues.";

/// A chosen hint. `keyword` is `None` for the generic fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion {
    pub keyword: Option<&'static str>,
    pub text: &'static str,
}

/// First matching remediation for an error message.
pub fn suggest_fix(error_message: &str) -> Suggestion {
    let lowered = error_message.to_lowercase();
    REMEDIATIONS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|&(keyword, text)| Suggestion {
            keyword: Some(keyword),
            text,
        })
        .unwrap_or(Suggestion {
            keyword: None,
            text: GENERIC_SUGGESTION,
        })
}

/// Pick a hint and show it. Never fails.
pub fn present_suggestion(host: &mut dyn Host, error_message: &str) -> Suggestion {
    let suggestion = suggest_fix(error_message);
    obs::emit_advisory(suggestion.keyword, suggestion.text);

    let notice = match suggestion.keyword {
        Some(_) => format!("Suggested fix: {}", suggestion.text),
        None => suggestion.text.to_string(),
    };
    host.notify(NoticeLevel::Info, &notice);
    suggestion
}
