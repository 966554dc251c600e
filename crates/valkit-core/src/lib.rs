//! valkit core library
//!
//! Three independent checks behind host-agnostic flows: API contract
//! validation, unused env variable tracking and commit message linting.

pub mod advisory;
pub mod commit_linter;
pub mod config;
pub mod contract;
pub mod dispatcher;
pub mod document;
pub mod env_tracker;
pub mod error;
pub mod fakes;
pub mod host;
pub mod obs;
pub mod outcome;
pub mod panel;
pub mod source;
pub mod telemetry;

pub use advisory::{suggest_fix, Suggestion, GENERIC_SUGGESTION};
pub use commit_linter::{lint_commit, lint_message, LintReport, LintState, LintVerdict};
pub use config::{ToolkitConfig, UsageMode};
pub use contract::{validate_api, SchemaFamily};
pub use dispatcher::{Action, Dispatcher};
pub use document::{interpret, DocumentFormat};
pub use env_tracker::{track_env, EnvReport};
pub use error::{Result, SchemaIssue, ToolkitError};
pub use host::{CommitAction, DisplaySurface, Host, NoticeLevel};
pub use outcome::ValidationOutcome;
pub use panel::{PanelMessage, PanelState};
pub use source::{ApiSource, DocumentLoader, Location, SourceFetcher};
pub use telemetry::init_tracing;
