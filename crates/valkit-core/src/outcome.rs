//! The single return contract shared by every flow.

use serde::{Deserialize, Serialize};

use crate::error::ToolkitError;

/// Success flag plus a human-readable summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub success: bool,
    pub message: String,
}

impl ValidationOutcome {
    pub fn passed(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl From<&ToolkitError> for ValidationOutcome {
    fn from(err: &ToolkitError) -> Self {
        Self::failed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_error() {
        let outcome = ValidationOutcome::from(&ToolkitError::NoWorkspace);
        assert!(!outcome.success);
        assert_eq!(outcome.message, "No workspace is open!");
    }

    #[test]
    fn test_outcome_serializes_flat() {
        let json = serde_json::to_value(ValidationOutcome::passed("ok")).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "message": "ok" }));
    }
}
