//! Structural validation of a bundled API document.
//!
//! Each schema family carries an embedded JSON-Schema rule set. Rule-set
//! violations and the semantic checks that JSON Schema cannot express are
//! reported together as one [`ToolkitError::Schema`] with a detail list.

use std::collections::HashMap;
use std::fmt;

use jsonschema::Draft;
use serde_json::Value;

use crate::error::{Result, SchemaIssue, ToolkitError};

const SWAGGER_2_0_RULES: &str = include_str!("../../schemas/swagger-2.0.json");
const OPENAPI_3_0_RULES: &str = include_str!("../../schemas/openapi-3.0.json");
const OPENAPI_3_1_RULES: &str = include_str!("../../schemas/openapi-3.1.json");

/// HTTP methods that may appear as operations under a path item.
const OPERATION_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Legacy (`2.0`) or modern (`3.x`) description format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFamily {
    Swagger2,
    OpenApi30,
    OpenApi31,
}

impl SchemaFamily {
    /// Pick the family from the document's `swagger`/`openapi` field.
    pub fn detect(doc: &Value) -> Result<Self> {
        if let Some(swagger) = doc.get("swagger") {
            return match swagger.as_str() {
                Some("2.0") => Ok(SchemaFamily::Swagger2),
                _ => Err(ToolkitError::schema(format!(
                    "unsupported Swagger version: {}",
                    render(swagger)
                ))),
            };
        }

        match doc.get("openapi") {
            Some(Value::String(v)) if v.starts_with("3.0.") => Ok(SchemaFamily::OpenApi30),
            Some(Value::String(v)) if v.starts_with("3.1.") => Ok(SchemaFamily::OpenApi31),
            Some(other) => Err(ToolkitError::schema(format!(
                "unsupported OpenAPI version: {}. Supported families are 2.0, 3.0.x and 3.1.x",
                render(other)
            ))),
            None => Err(ToolkitError::schema(
                "missing 'swagger' or 'openapi' version field",
            )),
        }
    }

    fn rules(self) -> &'static str {
        match self {
            SchemaFamily::Swagger2 => SWAGGER_2_0_RULES,
            SchemaFamily::OpenApi30 => OPENAPI_3_0_RULES,
            SchemaFamily::OpenApi31 => OPENAPI_3_1_RULES,
        }
    }
}

impl fmt::Display for SchemaFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchemaFamily::Swagger2 => "Swagger 2.0",
            SchemaFamily::OpenApi30 => "OpenAPI 3.0",
            SchemaFamily::OpenApi31 => "OpenAPI 3.1",
        };
        f.write_str(name)
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Validate a fully bundled document against its schema family.
pub fn validate_structure(doc: &Value) -> Result<SchemaFamily> {
    let family = SchemaFamily::detect(doc)?;

    let rules: Value = serde_json::from_str(family.rules()).map_err(|e| {
        ToolkitError::schema(format!("embedded {family} rule set is unreadable: {e}"))
    })?;
    let validator = jsonschema::options()
        .with_draft(Draft::Draft7)
        .build(&rules)
        .map_err(|e| {
            ToolkitError::schema(format!("embedded {family} rule set does not compile: {e}"))
        })?;

    let mut issues: Vec<SchemaIssue> = validator
        .iter_errors(doc)
        .map(|err| SchemaIssue {
            path: err.instance_path.to_string(),
            message: describe(&err.to_string()),
        })
        .collect();
    issues.extend(duplicate_operation_ids(doc));

    if issues.is_empty() {
        return Ok(family);
    }

    let first = &issues[0];
    let at = if first.path.is_empty() {
        "document root"
    } else {
        first.path.as_str()
    };
    Err(ToolkitError::Schema {
        message: format!(
            "{family} document has {} issue(s); first at {at}: {}",
            issues.len(),
            first.message
        ),
        details: issues,
    })
}

/// Reword validator messages so the advisory table can key on them.
fn describe(raw: &str) -> String {
    if let Some(property) = raw.strip_suffix(" is a required property") {
        format!("missing required property {property}")
    } else if raw.contains(" is not of type ") {
        format!("invalid type: {raw}")
    } else {
        raw.to_string()
    }
}

/// `operationId` must be unique across all operations.
fn duplicate_operation_ids(doc: &Value) -> Vec<SchemaIssue> {
    let mut seen: HashMap<&str, String> = HashMap::new();
    let mut issues = Vec::new();

    let Some(paths) = doc.get("paths").and_then(Value::as_object) else {
        return issues;
    };

    for (path, item) in paths {
        for method in OPERATION_METHODS {
            let Some(id) = item
                .get(method)
                .and_then(|op| op.get("operationId"))
                .and_then(Value::as_str)
            else {
                continue;
            };
            let pointer = format!("/paths/{}/{method}/operationId", escape_pointer(path));
            match seen.get(id) {
                Some(first) => issues.push(SchemaIssue {
                    path: pointer,
                    message: format!("duplicate operationId '{id}' (first declared at {first})"),
                }),
                None => {
                    seen.insert(id, pointer);
                }
            }
        }
    }

    issues
}

/// Escape one JSON-pointer reference token.
pub(crate) fn escape_pointer(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}
