//! Commit linter flow with scripted prompt answers.

use valkit_core::commit_linter::{lint_commit, LintState, MISSING_TYPE};
use valkit_core::fakes::ScriptedHost;
use valkit_core::{CommitAction, NoticeLevel, ToolkitConfig};

#[tokio::test]
async fn conventional_message_is_valid_without_prompt() {
    let mut host = ScriptedHost::new().with_commit_message("feat(auth): add login");

    let report = lint_commit(&mut host, &ToolkitConfig::default()).await;

    assert_eq!(report.state, LintState::Valid);
    assert!(report.outcome.success);
    assert_eq!(report.outcome.message, "Commit message is valid.");
    assert!(host.diagnoses.is_empty());
}

#[tokio::test]
async fn auto_fix_prepends_type_and_copies() {
    let mut host = ScriptedHost::new()
        .with_commit_message("update stuff")
        .with_commit_action(CommitAction::AutoFix);

    let report = lint_commit(&mut host, &ToolkitConfig::default()).await;

    assert_eq!(host.diagnoses, vec![MISSING_TYPE]);
    assert_eq!(report.state, LintState::AutoFixed);
    assert_eq!(report.outcome.message, "Commit message auto-fixed.");
    assert_eq!(report.fixed.as_deref(), Some("chore: update stuff"));
    assert_eq!(host.clipboard.as_deref(), Some("chore: update stuff"));
    assert!(host.was_notified("Fixed commit message: chore: update stuff"));
}

#[tokio::test]
async fn proceed_accepts_unchanged() {
    let mut host = ScriptedHost::new()
        .with_commit_message("feat add login")
        .with_commit_action(CommitAction::Proceed);

    let report = lint_commit(&mut host, &ToolkitConfig::default()).await;

    assert_eq!(report.state, LintState::ProceededAnyway);
    assert!(report.outcome.success);
    assert_eq!(report.outcome.message, "Commit accepted without changes.");
    assert!(host.clipboard.is_none());
    assert_eq!(
        host.notices_at(NoticeLevel::Warning),
        vec!["Commit issue: Missing colon and space after type/scope (e.g., feat(login): ...)."]
    );
}

#[tokio::test]
async fn dismissed_choice_rejects() {
    let mut host = ScriptedHost::new().with_commit_message("wip");

    let report = lint_commit(&mut host, &ToolkitConfig::default()).await;

    assert_eq!(report.state, LintState::Rejected);
    assert!(!report.outcome.success);
    assert_eq!(report.outcome.message, "Commit was not processed.");
}

#[tokio::test]
async fn empty_message_is_no_input() {
    let mut host = ScriptedHost::new().with_commit_message("");

    let report = lint_commit(&mut host, &ToolkitConfig::default()).await;

    assert!(!report.outcome.success);
    assert_eq!(report.outcome.message, "No commit message provided.");
    assert!(host.diagnoses.is_empty());
}
