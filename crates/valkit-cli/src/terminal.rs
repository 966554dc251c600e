//! Terminal implementations of the host seams.
//!
//! Prompts read lines from stdin, notices go to stderr and panel messages
//! are printed to stdout.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use valkit_core::source::has_api_extension;
use valkit_core::{ApiSource, CommitAction, DisplaySurface, Host, NoticeLevel, PanelMessage};

/// Answers fixed on the command line; anything missing is asked for.
#[derive(Debug, Default)]
pub struct Presets {
    pub source: Option<String>,
    pub commit_message: Option<String>,
    pub commit_action: Option<CommitAction>,
    pub workspace_root: Option<PathBuf>,
    pub active_buffer: Option<String>,
}

pub struct TerminalHost {
    presets: Presets,
    stdin: Lines<BufReader<Stdin>>,
    clipboard: Option<String>,
}

impl TerminalHost {
    pub fn new(presets: Presets) -> Self {
        Self {
            presets,
            stdin: BufReader::new(tokio::io::stdin()).lines(),
            clipboard: None,
        }
    }

    /// Print `prompt` and read one trimmed line. `None` on EOF, read failure
    /// or an empty answer.
    pub async fn read_line(&mut self, prompt: &str) -> Option<String> {
        eprint!("{prompt} ");
        match self.stdin.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim().to_string();
                (!line.is_empty()).then_some(line)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read from stdin");
                None
            }
        }
    }

    /// Last text "copied" by a flow.
    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    fn local_source(&mut self, input: &str) -> Option<ApiSource> {
        let source = ApiSource::from_input(input);
        if let ApiSource::Local { path } = &source {
            if !has_api_extension(path) {
                self.notify(
                    NoticeLevel::Error,
                    "Only .json, .yaml and .yml files can be validated.",
                );
                return None;
            }
        }
        Some(source)
    }
}

#[async_trait]
impl Host for TerminalHost {
    async fn select_source(&mut self) -> Option<ApiSource> {
        if let Some(input) = self.presets.source.take() {
            return self.local_source(&input);
        }

        let kind = self
            .read_line("Validate a local file or a remote URL? [local/remote]")
            .await?;
        match kind.to_ascii_lowercase().as_str() {
            "local" | "l" => {
                let path = self.read_line("Path to API file (.json, .yaml, .yml):").await?;
                self.local_source(&path)
            }
            "remote" | "r" => {
                let url = self.read_line("Enter API URL:").await?;
                Some(ApiSource::Remote { url })
            }
            _ => None,
        }
    }

    async fn prompt_commit_message(&mut self) -> Option<String> {
        if let Some(message) = self.presets.commit_message.take() {
            return Some(message);
        }
        self.read_line("Enter commit message (e.g., feat(login): add user authentication):")
            .await
    }

    async fn choose_commit_action(&mut self, diagnosis: &str) -> Option<CommitAction> {
        if let Some(action) = self.presets.commit_action {
            return Some(action);
        }
        eprintln!("{diagnosis}");
        self.read_line("Choose an action: [fix] to Conventional Commit format, [proceed] anyway:")
            .await?
            .parse()
            .ok()
    }

    fn workspace_root(&self) -> Option<PathBuf> {
        self.presets.workspace_root.clone()
    }

    fn active_buffer(&self) -> Option<String> {
        self.presets.active_buffer.clone()
    }

    fn notify(&mut self, level: NoticeLevel, message: &str) {
        let tag = match level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        eprintln!("[{tag}] {message}");
    }

    fn copy_to_clipboard(&mut self, text: &str) {
        self.clipboard = Some(text.to_string());
    }
}

/// Prints panel messages, rendered or as JSON lines.
pub struct TerminalPanel {
    json: bool,
}

impl TerminalPanel {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    fn line(&self, message: &PanelMessage) -> String {
        if self.json {
            serde_json::to_string(message).unwrap_or_else(|_| message.render())
        } else {
            message.render()
        }
    }
}

impl DisplaySurface for TerminalPanel {
    fn post(&mut self, message: PanelMessage) {
        println!("{}", self.line(&message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use valkit_core::ValidationOutcome;

    #[test]
    fn test_panel_line_formats() {
        let message = PanelMessage::feedback("Env Tracking", &ValidationOutcome::passed("ok"));
        assert_eq!(TerminalPanel::new(false).line(&message), "✅ Env Tracking: ok");
        assert_eq!(
            TerminalPanel::new(true).line(&message),
            r#"{"title":"Env Tracking","success":true,"message":"ok"}"#
        );
    }

    #[tokio::test]
    async fn test_presets_answer_prompts() {
        let mut host = TerminalHost::new(Presets {
            source: Some("https://example.com/openapi.json".to_string()),
            commit_message: Some("fix: typo".to_string()),
            commit_action: Some(CommitAction::Proceed),
            ..Presets::default()
        });

        assert!(matches!(
            host.select_source().await,
            Some(ApiSource::Remote { .. })
        ));
        assert_eq!(host.prompt_commit_message().await.as_deref(), Some("fix: typo"));
        assert_eq!(
            host.choose_commit_action("diag").await,
            Some(CommitAction::Proceed)
        );
    }

    #[tokio::test]
    async fn test_local_preset_requires_api_extension() {
        let mut host = TerminalHost::new(Presets {
            source: Some("notes.txt".to_string()),
            ..Presets::default()
        });
        assert_eq!(host.select_source().await, None);
    }
}
