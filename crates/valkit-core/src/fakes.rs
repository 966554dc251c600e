//! In-memory fakes for the host seams (testing only)
//!
//! Provides `ScriptedHost`, `MemoryLoader` and `RecordingDisplay` that satisfy
//! the trait contracts without a terminal, a file system or a network.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Result, ToolkitError};
use crate::host::{CommitAction, DisplaySurface, Host, NoticeLevel};
use crate::panel::PanelMessage;
use crate::source::{ApiSource, DocumentLoader, Location};

// ---------------------------------------------------------------------------
// ScriptedHost
// ---------------------------------------------------------------------------

/// Host whose prompt answers are fixed up front. Records every notification
/// and clipboard write.
#[derive(Debug, Default, Clone)]
pub struct ScriptedHost {
    source: Option<ApiSource>,
    commit_message: Option<String>,
    commit_action: Option<CommitAction>,
    workspace_root: Option<PathBuf>,
    active_buffer: Option<String>,
    pub notices: Vec<(NoticeLevel, String)>,
    pub clipboard: Option<String>,
    /// Diagnoses shown when asking for a commit action.
    pub diagnoses: Vec<String>,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: ApiSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_commit_message(mut self, message: &str) -> Self {
        self.commit_message = Some(message.to_string());
        self
    }

    pub fn with_commit_action(mut self, action: CommitAction) -> Self {
        self.commit_action = Some(action);
        self
    }

    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(root.into());
        self
    }

    pub fn with_active_buffer(mut self, text: &str) -> Self {
        self.active_buffer = Some(text.to_string());
        self
    }

    /// Messages notified at `level`, in order.
    pub fn notices_at(&self, level: NoticeLevel) -> Vec<&str> {
        self.notices
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.as_str())
            .collect()
    }

    pub fn was_notified(&self, needle: &str) -> bool {
        self.notices.iter().any(|(_, m)| m.contains(needle))
    }
}

#[async_trait]
impl Host for ScriptedHost {
    async fn select_source(&mut self) -> Option<ApiSource> {
        self.source.clone()
    }

    async fn prompt_commit_message(&mut self) -> Option<String> {
        self.commit_message.clone()
    }

    async fn choose_commit_action(&mut self, diagnosis: &str) -> Option<CommitAction> {
        self.diagnoses.push(diagnosis.to_string());
        self.commit_action
    }

    fn workspace_root(&self) -> Option<PathBuf> {
        self.workspace_root.clone()
    }

    fn active_buffer(&self) -> Option<String> {
        self.active_buffer.clone()
    }

    fn notify(&mut self, level: NoticeLevel, message: &str) {
        self.notices.push((level, message.to_string()));
    }

    fn copy_to_clipboard(&mut self, text: &str) {
        self.clipboard = Some(text.to_string());
    }
}

// ---------------------------------------------------------------------------
// MemoryLoader
// ---------------------------------------------------------------------------

/// Document loader backed by a `HashMap<Location, text>`.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    documents: HashMap<Location, String>,
    requests: Mutex<Vec<Location>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, location: Location, text: &str) -> Self {
        self.documents.insert(location, text.to_string());
        self
    }

    /// Every location requested so far, in order.
    pub fn requests(&self) -> Vec<Location> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentLoader for MemoryLoader {
    async fn load(&self, location: &Location) -> Result<String> {
        self.requests.lock().unwrap().push(location.clone());
        self.documents
            .get(location)
            .cloned()
            .ok_or_else(|| ToolkitError::NotFound(location.to_string()))
    }
}

// ---------------------------------------------------------------------------
// RecordingDisplay
// ---------------------------------------------------------------------------

/// Display surface that keeps every posted message.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    pub messages: Vec<PanelMessage>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&PanelMessage> {
        self.messages.last()
    }
}

impl DisplaySurface for RecordingDisplay {
    fn post(&mut self, message: PanelMessage) {
        self.messages.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_loader_missing_document() {
        let loader = MemoryLoader::new();
        let location = Location::File(PathBuf::from("/nope.json"));
        let err = loader.load(&location).await.unwrap_err();
        assert!(matches!(err, ToolkitError::NotFound(_)));
        assert_eq!(loader.requests(), vec![location]);
    }

    #[tokio::test]
    async fn test_scripted_host_records() {
        let mut host = ScriptedHost::new().with_commit_action(CommitAction::Proceed);
        assert_eq!(
            host.choose_commit_action("why").await,
            Some(CommitAction::Proceed)
        );
        host.notify(NoticeLevel::Warning, "careful");
        host.copy_to_clipboard("text");

        assert_eq!(host.diagnoses, vec!["why"]);
        assert_eq!(host.notices_at(NoticeLevel::Warning), vec!["careful"]);
        assert_eq!(host.clipboard.as_deref(), Some("text"));
    }
}
