//! Messages for the passive result panel and their rendering.

use serde::{Deserialize, Serialize};

use crate::outcome::ValidationOutcome;

/// One message posted to a [`crate::host::DisplaySurface`].
///
/// Serialized without a tag so the wire shapes are
/// `{title, success, message}`, `{error}` and `{status: "loading", command}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PanelMessage {
    Feedback {
        title: String,
        success: bool,
        message: String,
    },
    Error {
        error: String,
    },
    Loading {
        status: LoadingStatus,
        command: String,
    },
}

/// Marker serialized as the literal `"loading"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingStatus {
    Loading,
}

/// Visual state a message renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelState {
    Success,
    Error,
    Warning,
    Loading,
}

impl PanelMessage {
    pub fn feedback(title: &str, outcome: &ValidationOutcome) -> Self {
        PanelMessage::Feedback {
            title: title.to_string(),
            success: outcome.success,
            message: outcome.message.clone(),
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        PanelMessage::Error {
            error: error.into(),
        }
    }

    pub fn loading(command: &str) -> Self {
        PanelMessage::Loading {
            status: LoadingStatus::Loading,
            command: command.to_string(),
        }
    }

    /// A failed flow is shown as a warning; only transport-level errors use
    /// the error state.
    pub fn state(&self) -> PanelState {
        match self {
            PanelMessage::Loading { .. } => PanelState::Loading,
            PanelMessage::Feedback { success: true, .. } => PanelState::Success,
            PanelMessage::Error { .. } => PanelState::Error,
            PanelMessage::Feedback { success: false, .. } => PanelState::Warning,
        }
    }

    /// Status line text for this message.
    pub fn render(&self) -> String {
        match self {
            PanelMessage::Loading { command, .. } => format!("⚡ {command} in progress..."),
            PanelMessage::Feedback {
                title,
                success: true,
                message,
            } => format!("✅ {title}: {message}"),
            PanelMessage::Error { error } => format!("❌ Error: {error}"),
            PanelMessage::Feedback { title, message, .. } => format!("⚠️ {title}: {message}"),
        }
    }
}
