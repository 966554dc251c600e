//! Host collaborator seams.
//!
//! The flows never talk to a UI toolkit directly. A front end (terminal,
//! web view, editor) implements [`Host`] for prompts and notifications and
//! [`DisplaySurface`] for the passive result panel.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::outcome::ValidationOutcome;
use crate::panel::PanelMessage;
use crate::source::ApiSource;

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// User decision after a commit message fails the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitAction {
    AutoFix,
    Proceed,
}

impl std::str::FromStr for CommitAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fix" | "autofix" | "auto-fix" => Ok(Self::AutoFix),
            "proceed" => Ok(Self::Proceed),
            other => Err(format!("unknown commit action: {other}")),
        }
    }
}

/// Prompts, workspace state and notifications provided by the front end.
///
/// Every prompt returns `None` when the user dismisses it.
#[async_trait]
pub trait Host: Send {
    /// Ask for a local file (restricted to `.json`/`.yaml`/`.yml`) or a URL.
    async fn select_source(&mut self) -> Option<ApiSource>;

    /// Ask for a free-text commit message.
    async fn prompt_commit_message(&mut self) -> Option<String>;

    /// Offer auto-fix or proceed for an invalid commit message.
    async fn choose_commit_action(&mut self, diagnosis: &str) -> Option<CommitAction>;

    /// Root directory of the open workspace.
    fn workspace_root(&self) -> Option<PathBuf>;

    /// Full text of the active buffer.
    fn active_buffer(&self) -> Option<String>;

    fn notify(&mut self, level: NoticeLevel, message: &str);

    fn copy_to_clipboard(&mut self, text: &str);

    /// Surface a finished flow's outcome.
    fn present_outcome(&mut self, title: &str, outcome: &ValidationOutcome) {
        self.notify(
            NoticeLevel::Info,
            &format!("{}: {}", title, outcome.message),
        );
    }
}

/// Passive sink for panel messages. Holds no state beyond what it renders.
pub trait DisplaySurface: Send {
    fn post(&mut self, message: PanelMessage);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_action_parse() {
        assert_eq!("fix".parse::<CommitAction>().unwrap(), CommitAction::AutoFix);
        assert_eq!(
            "Proceed".parse::<CommitAction>().unwrap(),
            CommitAction::Proceed
        );
        assert!("reject".parse::<CommitAction>().is_err());
    }
}
