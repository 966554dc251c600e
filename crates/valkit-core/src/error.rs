//! Error taxonomy for valkit flows.

use serde::Serialize;

/// One structural problem found while validating an API document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaIssue {
    /// JSON pointer into the bundled document (empty for the root).
    pub path: String,
    pub message: String,
}

/// Errors produced by valkit flows.
///
/// Every variant is caught at the flow boundary and turned into a failed
/// [`crate::ValidationOutcome`]; none escapes to the host.
#[derive(Debug, thiserror::Error)]
pub enum ToolkitError {
    #[error("API file not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parsing error: {0}")]
    Parse(String),

    #[error("Bundling error: {0}")]
    Bundle(String),

    #[error("Schema validation failed: {message}")]
    Schema {
        message: String,
        details: Vec<SchemaIssue>,
    },

    #[error("No workspace is open!")]
    NoWorkspace,

    #[error("No {prefix} files found!")]
    NoEnvFiles { prefix: String },

    #[error("No environment variables found in the {prefix} files.")]
    NoVariables { prefix: String },

    #[error("No active editor found to check variable usage.")]
    NoActiveBuffer,

    #[error("{0}")]
    NoInput(String),
}

impl ToolkitError {
    pub(crate) fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Text shown to the user: the structured detail list as pretty JSON when
    /// one is present, the flat message otherwise.
    pub fn detailed(&self) -> String {
        match self {
            Self::Schema { details, .. } if !details.is_empty() => {
                serde_json::to_string_pretty(details).unwrap_or_else(|_| self.to_string())
            }
            _ => self.to_string(),
        }
    }
}

/// Result type for valkit operations.
pub type Result<T> = std::result::Result<T, ToolkitError>;
