//! Conventional Commits linting with an optional auto-fix.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::config::ToolkitConfig;
use crate::error::ToolkitError;
use crate::host::{CommitAction, Host, NoticeLevel};
use crate::outcome::ValidationOutcome;

const COMMIT_TYPES: &str = "feat|fix|docs|style|refactor|test|chore|perf|build|ci|revert|hotfix|release";

pub const MISSING_TYPE: &str = "Missing valid commit type (e.g., feat, fix, chore).";
pub const MISSING_SEPARATOR: &str =
    "Missing colon and space after type/scope (e.g., feat(login): ...).";
pub const TOO_SHORT: &str = "Commit message is too short. Provide a meaningful description.";
pub const GENERAL_ISSUE: &str = "General format issue. Follow Conventional Commits.";

fn grammar() -> &'static Regex {
    static GRAMMAR: OnceLock<Regex> = OnceLock::new();
    GRAMMAR.get_or_init(|| {
        Regex::new(&format!(r"(?s)^({COMMIT_TYPES})(\([\w\-.,]+\))?(!)?: .+"))
            .expect("commit grammar is valid")
    })
}

fn type_prefix() -> &'static Regex {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    PREFIX.get_or_init(|| {
        Regex::new(&format!(r"^({COMMIT_TYPES})")).expect("type prefix pattern is valid")
    })
}

/// Type, optional scope and breaking marker followed by whatever separator
/// the author typed.
fn header_separator() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| {
        Regex::new(&format!(r"^({COMMIT_TYPES})\b(\([^)]*\))?(!)?\s*:?\s*"))
            .expect("header pattern is valid")
    })
}

/// Lifecycle of one lint invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LintState {
    Idle,
    Checking,
    Valid,
    Invalid,
    AutoFixed,
    ProceededAnyway,
    Rejected,
}

impl LintState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            LintState::Valid | LintState::AutoFixed | LintState::ProceededAnyway | LintState::Rejected
        )
    }
}

/// Grammar check result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintVerdict {
    Valid,
    Invalid { diagnosis: &'static str },
}

/// Whether `message` matches the Conventional Commits grammar.
pub fn is_conventional(message: &str) -> bool {
    grammar().is_match(message)
}

/// First applicable diagnosis for a message that failed the grammar.
pub fn diagnose(message: &str, min_length: usize) -> &'static str {
    if !type_prefix().is_match(message) {
        MISSING_TYPE
    } else if !message.contains(": ") {
        MISSING_SEPARATOR
    } else if message.trim().chars().count() < min_length {
        TOO_SHORT
    } else {
        GENERAL_ISSUE
    }
}

/// Check a message against the grammar.
pub fn check(message: &str, min_length: usize) -> LintVerdict {
    if is_conventional(message) {
        LintVerdict::Valid
    } else {
        LintVerdict::Invalid {
            diagnosis: diagnose(message, min_length),
        }
    }
}

/// Best-effort rewrite into `type(scope): subject` form. The result is not
/// re-validated.
pub fn auto_fix(message: &str, default_type: &str) -> String {
    let mut fixed = message.trim().to_string();

    let typed = header_separator().is_match(&fixed);
    if !typed {
        fixed = format!("{default_type}: {fixed}");
    }

    if !fixed.contains(": ") {
        fixed = header_separator()
            .replace(&fixed, "${1}${2}${3}: ")
            .into_owned();
    }

    fixed
}

/// Everything a lint invocation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintReport {
    pub outcome: ValidationOutcome,
    pub state: LintState,
    /// Rewritten message when the user chose auto-fix.
    pub fixed: Option<String>,
}

impl LintReport {
    fn finish(state: LintState, outcome: ValidationOutcome) -> Self {
        debug_assert!(state.is_terminal());
        Self {
            outcome,
            state,
            fixed: None,
        }
    }
}

/// Lint `message`, asking the host how to proceed when it is invalid.
pub async fn lint_message(
    host: &mut dyn Host,
    config: &ToolkitConfig,
    message: &str,
) -> LintReport {
    let mut state = LintState::Checking;
    let verdict = check(message, config.min_commit_length);
    debug!(?state, ?verdict, "commit message checked");

    let diagnosis = match verdict {
        LintVerdict::Valid => {
            host.notify(
                NoticeLevel::Info,
                "Commit message follows Conventional Commits!",
            );
            return LintReport::finish(
                LintState::Valid,
                ValidationOutcome::passed("Commit message is valid."),
            );
        }
        LintVerdict::Invalid { diagnosis } => diagnosis,
    };

    state = LintState::Invalid;
    host.notify(NoticeLevel::Warning, &format!("Commit issue: {diagnosis}"));

    let choice = host.choose_commit_action(diagnosis).await;
    debug!(?state, ?choice, "commit action chosen");

    match choice {
        Some(CommitAction::AutoFix) => {
            let fixed = auto_fix(message, &config.default_commit_type);
            host.notify(NoticeLevel::Info, &format!("Fixed commit message: {fixed}"));
            host.copy_to_clipboard(&fixed);
            host.notify(NoticeLevel::Info, "Fixed message copied to clipboard.");

            LintReport {
                outcome: ValidationOutcome::passed("Commit message auto-fixed."),
                state: LintState::AutoFixed,
                fixed: Some(fixed),
            }
        }
        Some(CommitAction::Proceed) => {
            host.notify(NoticeLevel::Info, "Commit processed without changes.");
            LintReport::finish(
                LintState::ProceededAnyway,
                ValidationOutcome::passed("Commit accepted without changes."),
            )
        }
        None => LintReport::finish(
            LintState::Rejected,
            ValidationOutcome::failed("Commit was not processed."),
        ),
    }
}

/// The `lintCommit` action.
pub async fn lint_commit(host: &mut dyn Host, config: &ToolkitConfig) -> LintReport {
    let message = host.prompt_commit_message().await.unwrap_or_default();
    if message.is_empty() {
        let err = ToolkitError::NoInput("No commit message provided.".to_string());
        host.notify(NoticeLevel::Warning, &err.to_string());
        return LintReport {
            outcome: ValidationOutcome::from(&err),
            state: LintState::Idle,
            fixed: None,
        };
    }

    lint_message(host, config, &message).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grammar_accepts_conventional_messages() {
        assert!(is_conventional("feat(auth): add login"));
        assert!(is_conventional("fix!: drop legacy flag"));
        assert!(is_conventional("chore(deps,ci): bump\n\nbody text"));
        assert!(!is_conventional("feat add login"));
        assert!(!is_conventional("Feat: add login"));
    }

    #[test]
    fn test_diagnosis_priority() {
        assert_eq!(diagnose("update stuff", 10), MISSING_TYPE);
        assert_eq!(diagnose("feat add login", 10), MISSING_SEPARATOR);
        assert_eq!(diagnose("feat(x y): ", 10), GENERAL_ISSUE);
        assert_eq!(diagnose("feat(): a", 10), TOO_SHORT);
    }

    #[test]
    fn test_auto_fix_prepends_default_type() {
        assert_eq!(auto_fix("  update stuff ", "chore"), "chore: update stuff");
    }

    #[test]
    fn test_auto_fix_normalizes_separator() {
        assert_eq!(auto_fix("feat add login", "chore"), "feat: add login");
        assert_eq!(auto_fix("feat(auth) add login", "chore"), "feat(auth): add login");
        assert_eq!(auto_fix("fix(core)!:handle nulls", "chore"), "fix(core)!: handle nulls");
    }

    #[test]
    fn test_auto_fix_keeps_single_separator() {
        let fixed = auto_fix("feat(x y): add login", "chore");
        assert_eq!(fixed, "feat(x y): add login");
        assert_eq!(fixed.matches(": ").count(), 1);
    }

    #[test]
    fn test_auto_fix_does_not_split_words() {
        assert_eq!(auto_fix("feature toggle", "chore"), "chore: feature toggle");
    }

    #[test]
    fn test_terminal_states() {
        assert!(!LintState::Idle.is_terminal());
        assert!(!LintState::Checking.is_terminal());
        assert!(!LintState::Invalid.is_terminal());
        assert!(LintState::AutoFixed.is_terminal());
        assert!(LintState::Rejected.is_terminal());
    }
}
