//! Document interpreter: raw text to a structured tree.

use serde_json::Value;

use crate::error::{Result, ToolkitError};

/// Decoder picked from a name or extension hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// YAML for `.yaml`/`.yml` names, JSON for everything else.
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".yaml") || lower.ends_with(".yml") {
            DocumentFormat::Yaml
        } else {
            DocumentFormat::Json
        }
    }

    fn label(self) -> &'static str {
        match self {
            DocumentFormat::Json => "JSON",
            DocumentFormat::Yaml => "YAML",
        }
    }
}

/// Decode `text` as the format implied by `name`. All or nothing.
pub fn interpret(text: &str, name: &str) -> Result<Value> {
    let format = DocumentFormat::from_name(name);
    let decoded = match format {
        DocumentFormat::Json => serde_json::from_str::<Value>(text).map_err(|e| e.to_string()),
        DocumentFormat::Yaml => serde_yaml::from_str::<Value>(text).map_err(|e| e.to_string()),
    };

    decoded.map_err(|e| ToolkitError::Parse(format!("{} syntax error: {e}", format.label())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_from_name() {
        assert_eq!(DocumentFormat::from_name("api.yaml"), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_name("API.YML"), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_name("api.json"), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_name("/v1/spec"), DocumentFormat::Json);
    }

    #[test]
    fn test_interpret_yaml() {
        let doc = interpret("openapi: 3.0.0\ninfo:\n  title: Pets\n", "pets.yml").unwrap();
        assert_eq!(doc["openapi"], json!("3.0.0"));
        assert_eq!(doc["info"]["title"], json!("Pets"));
    }

    #[test]
    fn test_interpret_json() {
        let doc = interpret(r#"{"swagger": "2.0"}"#, "swagger.json").unwrap();
        assert_eq!(doc["swagger"], json!("2.0"));
    }

    #[test]
    fn test_yaml_text_under_json_name_fails() {
        let err = interpret("openapi: 3.0.0\n", "spec.json").unwrap_err();
        assert!(matches!(err, ToolkitError::Parse(_)));
        assert!(err.to_string().contains("JSON syntax error"));
    }

    #[test]
    fn test_malformed_yaml_fails() {
        let err = interpret("info: [unclosed\n", "spec.yaml").unwrap_err();
        assert!(err.to_string().starts_with("Parsing error: YAML syntax error"));
    }
}
