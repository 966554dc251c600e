//! valkit - API contract, env variable and commit message checks
//!
//! ## Commands
//!
//! - `validate-api`: Validate a Swagger 2.0 / OpenAPI 3.x document
//! - `track-env`: Report `.env` variables unused by a source file
//! - `lint-commit`: Lint a commit message against Conventional Commits
//! - `panel`: Interactive command loop mirroring results into a status panel

mod terminal;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use valkit_core::{Action, CommitAction, Dispatcher, ToolkitConfig, UsageMode, ValidationOutcome};

use crate::terminal::{Presets, TerminalHost, TerminalPanel};

#[derive(Parser)]
#[command(name = "valkit")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "API contract, env variable and commit message checks", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines and panel messages
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an API description (local .json/.yaml/.yml file or http(s) URL)
    ValidateApi {
        /// File path or URL (prompted for when omitted)
        spec: Option<String>,

        /// Remote fetch timeout in seconds
        #[arg(long, env = "VALKIT_FETCH_TIMEOUT_SECS")]
        timeout: Option<u64>,
    },

    /// Find variables declared in env files but unused in a source file
    TrackEnv {
        /// Workspace root holding the env files (default: current directory)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Source file checked for usages
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Require a word boundary before each variable name
        #[arg(long)]
        strict: bool,

        /// Env file name prefix
        #[arg(long, env = "VALKIT_ENV_PREFIX")]
        prefix: Option<String>,
    },

    /// Lint a commit message against Conventional Commits
    LintCommit {
        /// Commit message (prompted for when omitted)
        #[arg(conflicts_with = "file")]
        message: Option<String>,

        /// Read the message from a file, e.g. .git/COMMIT_EDITMSG
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Answer for an invalid message: fix or proceed
        #[arg(short, long)]
        action: Option<CommitAction>,

        /// Write an auto-fixed message back to --file
        #[arg(long, requires = "file")]
        write: bool,
    },

    /// Run commands from stdin and show results as panel status lines
    Panel {
        /// Workspace root holding the env files (default: current directory)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Source file used as the active buffer for trackEnv
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    valkit_core::init_tracing(cli.json, level);

    let config = ToolkitConfig::from_env();
    let mut panel = TerminalPanel::new(cli.json);

    let outcome = match cli.command {
        Commands::ValidateApi { spec, timeout } => {
            cmd_validate_api(config, spec, timeout, &mut panel).await?
        }
        Commands::TrackEnv {
            root,
            file,
            strict,
            prefix,
        } => cmd_track_env(config, root, file.as_deref(), strict, prefix, &mut panel).await?,
        Commands::LintCommit {
            message,
            file,
            action,
            write,
        } => cmd_lint_commit(config, message, file.as_deref(), action, write, &mut panel).await?,
        Commands::Panel { root, file } => {
            cmd_panel(config, root, file.as_deref(), &mut panel).await?
        }
    };

    Ok(if outcome.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Validate an API document
async fn cmd_validate_api(
    config: ToolkitConfig,
    spec: Option<String>,
    timeout: Option<u64>,
    panel: &mut TerminalPanel,
) -> Result<ValidationOutcome> {
    let config = match timeout {
        Some(secs) => config.with_fetch_timeout(Duration::from_secs(secs)),
        None => config,
    };
    let dispatcher = Dispatcher::with_fetcher(config).context("Failed to set up API fetcher")?;

    let mut host = TerminalHost::new(Presets {
        source: spec,
        ..Presets::default()
    });
    Ok(dispatcher
        .dispatch(Action::ValidateApi, &mut host, panel)
        .await)
}

/// Report unused env variables
async fn cmd_track_env(
    config: ToolkitConfig,
    root: Option<PathBuf>,
    file: Option<&Path>,
    strict: bool,
    prefix: Option<String>,
    panel: &mut TerminalPanel,
) -> Result<ValidationOutcome> {
    let mut config = config;
    if strict {
        config = config.with_usage_mode(UsageMode::Strict);
    }
    if let Some(prefix) = prefix.filter(|p| !p.is_empty()) {
        config = config.with_env_file_prefix(&prefix);
    }

    let dispatcher = Dispatcher::with_fetcher(config)?;
    let mut host = TerminalHost::new(workspace_presets(root, file)?);
    Ok(dispatcher.dispatch(Action::TrackEnv, &mut host, panel).await)
}

/// Workspace root and active buffer for env tracking.
fn workspace_presets(root: Option<PathBuf>, file: Option<&Path>) -> Result<Presets> {
    let workspace_root = match root {
        Some(root) => Some(root),
        None => std::env::current_dir().ok(),
    };
    let active_buffer = match file {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
        ),
        None => None,
    };

    Ok(Presets {
        workspace_root,
        active_buffer,
        ..Presets::default()
    })
}

/// Lint a commit message, optionally rewriting the message file
async fn cmd_lint_commit(
    config: ToolkitConfig,
    message: Option<String>,
    file: Option<&Path>,
    action: Option<CommitAction>,
    write: bool,
    panel: &mut TerminalPanel,
) -> Result<ValidationOutcome> {
    let commit_message = match file {
        Some(path) => Some(read_commit_file(path)?),
        None => message,
    };

    let dispatcher = Dispatcher::with_fetcher(config)?;
    let mut host = TerminalHost::new(Presets {
        commit_message,
        commit_action: action,
        ..Presets::default()
    });
    let outcome = dispatcher
        .dispatch(Action::LintCommit, &mut host, panel)
        .await;

    if let Some(fixed) = host.clipboard() {
        match file.filter(|_| write) {
            Some(path) => {
                std::fs::write(path, format!("{fixed}\n"))
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                debug!(path = %path.display(), "wrote fixed commit message");
            }
            None => println!("{fixed}"),
        }
    }

    Ok(outcome)
}

/// Commit message file contents without git comment lines.
fn read_commit_file(path: &Path) -> Result<String> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read commit message from {}", path.display()))?;
    Ok(strip_comments(&raw))
}

fn strip_comments(raw: &str) -> String {
    raw.lines()
        .filter(|line| !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}

/// Interactive panel loop
async fn cmd_panel(
    config: ToolkitConfig,
    root: Option<PathBuf>,
    file: Option<&Path>,
    panel: &mut TerminalPanel,
) -> Result<ValidationOutcome> {
    let dispatcher = Dispatcher::with_fetcher(config).context("Failed to set up API fetcher")?;
    let mut host = TerminalHost::new(workspace_presets(root, file)?);

    let ready = dispatcher
        .dispatch(Action::ShowPanel, &mut host, panel)
        .await;
    eprintln!("{}", ready.message);
    eprintln!("Commands: validateAPI, trackEnv, lintCommit (quit to exit)");

    let mut handled = 0usize;
    while let Some(command) = host.read_line(">").await {
        if matches!(command.as_str(), "quit" | "exit") {
            break;
        }
        if dispatcher
            .handle_panel_command(&command, &mut host, panel)
            .await
            .is_some()
        {
            handled += 1;
        }
    }

    debug!(handled, "panel closed");
    Ok(ready)
}
