//! Action dispatch.
//!
//! Exposes every flow as a named action, reports its outcome to the host and
//! mirrors it into the display surface.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use tracing::Instrument;

use crate::commit_linter;
use crate::config::ToolkitConfig;
use crate::contract;
use crate::env_tracker;
use crate::error::Result;
use crate::host::{DisplaySurface, Host};
use crate::obs::{self, FlowSpan};
use crate::outcome::ValidationOutcome;
use crate::panel::PanelMessage;
use crate::source::{DocumentLoader, SourceFetcher};

/// Invocable actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ValidateApi,
    TrackEnv,
    LintCommit,
    ShowPanel,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::ValidateApi,
        Action::TrackEnv,
        Action::LintCommit,
        Action::ShowPanel,
    ];

    /// Command name used by the panel and in logs.
    pub fn name(self) -> &'static str {
        match self {
            Action::ValidateApi => "validateAPI",
            Action::TrackEnv => "trackEnv",
            Action::LintCommit => "lintCommit",
            Action::ShowPanel => "showPanel",
        }
    }

    /// Whether the outcome is shown to the host and mirrored into the panel.
    /// Opening the panel has nothing to report.
    pub fn reports_outcome(self) -> bool {
        self != Action::ShowPanel
    }

    /// Title used for notifications and panel feedback.
    pub fn title(self) -> &'static str {
        match self {
            Action::ValidateApi => "API Validation",
            Action::TrackEnv => "Env Tracking",
            Action::LintCommit => "Commit Linting",
            Action::ShowPanel => "Panel",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.name() == s.trim())
            .ok_or_else(|| format!("Unknown command: {s}"))
    }
}

pub const PANEL_READY: &str = "Panel ready.";

/// Runs actions against a host and a display surface.
pub struct Dispatcher {
    config: ToolkitConfig,
    loader: Arc<dyn DocumentLoader>,
}

impl Dispatcher {
    pub fn new(config: ToolkitConfig, loader: Arc<dyn DocumentLoader>) -> Self {
        Self { config, loader }
    }

    /// Dispatcher backed by the real file/HTTP fetcher.
    pub fn with_fetcher(config: ToolkitConfig) -> Result<Self> {
        let fetcher = SourceFetcher::new(&config)?;
        Ok(Self::new(config, Arc::new(fetcher)))
    }

    pub fn config(&self) -> &ToolkitConfig {
        &self.config
    }

    /// Run one action to completion.
    pub async fn dispatch(
        &self,
        action: Action,
        host: &mut dyn Host,
        display: &mut dyn DisplaySurface,
    ) -> ValidationOutcome {
        let started = Instant::now();
        obs::emit_flow_started(action.name());

        let outcome = match action {
            Action::ValidateApi => {
                contract::validate_api(host, self.loader.as_ref())
                    .instrument(obs::flow_span(action.name()))
                    .await
            }
            Action::LintCommit => {
                commit_linter::lint_commit(host, &self.config)
                    .instrument(obs::flow_span(action.name()))
                    .await
                    .outcome
            }
            Action::TrackEnv => {
                let _span = FlowSpan::enter(action.name());
                env_tracker::track_env(host, &self.config)
            }
            Action::ShowPanel => ValidationOutcome::passed(PANEL_READY),
        };

        obs::emit_flow_finished(
            action.name(),
            started.elapsed().as_millis() as u64,
            outcome.success,
        );

        if action.reports_outcome() {
            host.present_outcome(action.title(), &outcome);
            display.post(PanelMessage::feedback(action.title(), &outcome));
        }
        outcome
    }

    /// Handle a command name sent from the panel. Posts a loading message
    /// first; an unknown command posts an error and returns `None`.
    pub async fn handle_panel_command(
        &self,
        command: &str,
        host: &mut dyn Host,
        display: &mut dyn DisplaySurface,
    ) -> Option<ValidationOutcome> {
        display.post(PanelMessage::loading(command));

        match command.parse::<Action>() {
            Ok(action) if action.reports_outcome() => {
                Some(self.dispatch(action, host, display).await)
            }
            _ => {
                display.post(PanelMessage::error(format!("Unknown command: {command}")));
                None
            }
        }
    }
}
