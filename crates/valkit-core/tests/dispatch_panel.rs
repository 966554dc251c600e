//! Dispatcher wiring: host outcome reporting and panel mirroring.

use std::path::PathBuf;
use std::sync::Arc;

use valkit_core::fakes::{MemoryLoader, RecordingDisplay, ScriptedHost};
use valkit_core::{
    Action, ApiSource, CommitAction, Dispatcher, NoticeLevel, PanelMessage, PanelState,
    ToolkitConfig,
};

fn dispatcher() -> Dispatcher {
    Dispatcher::new(ToolkitConfig::default(), Arc::new(MemoryLoader::new()))
}

#[tokio::test]
async fn outcome_is_presented_and_mirrored() {
    let mut host = ScriptedHost::new()
        .with_commit_message("update stuff")
        .with_commit_action(CommitAction::AutoFix);
    let mut display = RecordingDisplay::new();

    let outcome = dispatcher()
        .dispatch(Action::LintCommit, &mut host, &mut display)
        .await;

    assert!(outcome.success);
    assert!(host.was_notified("Commit Linting: Commit message auto-fixed."));
    assert_eq!(
        display.messages,
        vec![PanelMessage::Feedback {
            title: "Commit Linting".to_string(),
            success: true,
            message: "Commit message auto-fixed.".to_string(),
        }]
    );
}

#[tokio::test]
async fn failed_flow_renders_as_warning() {
    let mut host = ScriptedHost::new();
    let mut display = RecordingDisplay::new();

    let outcome = dispatcher()
        .dispatch(Action::TrackEnv, &mut host, &mut display)
        .await;

    assert!(!outcome.success);
    let last = display.last().unwrap();
    assert_eq!(last.state(), PanelState::Warning);
    assert_eq!(last.render(), "⚠️ Env Tracking: No workspace is open!");
}

#[tokio::test]
async fn panel_command_posts_loading_then_feedback() {
    let mut host = ScriptedHost::new().with_source(ApiSource::Local {
        path: PathBuf::from("/no/such/openapi.json"),
    });
    let mut display = RecordingDisplay::new();

    let outcome = dispatcher()
        .handle_panel_command("validateAPI", &mut host, &mut display)
        .await
        .unwrap();

    assert!(!outcome.success);
    assert_eq!(display.messages.len(), 2);
    assert_eq!(display.messages[0], PanelMessage::loading("validateAPI"));
    assert_eq!(
        display.messages[1].render(),
        "⚠️ API Validation: API file not found: /no/such/openapi.json"
    );
    assert!(!host.notices_at(NoticeLevel::Error).is_empty());
}

#[tokio::test]
async fn unknown_panel_command_posts_error() {
    let mut host = ScriptedHost::new();
    let mut display = RecordingDisplay::new();

    let outcome = dispatcher()
        .handle_panel_command("deploy", &mut host, &mut display)
        .await;

    assert!(outcome.is_none());
    assert_eq!(
        display.messages,
        vec![
            PanelMessage::loading("deploy"),
            PanelMessage::error("Unknown command: deploy"),
        ]
    );
    assert!(host.notices.is_empty());
}

#[tokio::test]
async fn show_panel_needs_no_host_interaction() {
    let mut host = ScriptedHost::new();
    let mut display = RecordingDisplay::new();

    let outcome = dispatcher()
        .dispatch(Action::ShowPanel, &mut host, &mut display)
        .await;

    assert!(outcome.success);
    assert!(display.messages.is_empty());
    assert!(host.notices.is_empty());
}
