//! Unused environment variable detection.
//!
//! Declarations come from `NAME=value` lines in the workspace's env files;
//! usage is a textual search over the active buffer.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::config::{ToolkitConfig, UsageMode};
use crate::error::{Result, ToolkitError};
use crate::host::{Host, NoticeLevel};
use crate::outcome::ValidationOutcome;

fn declaration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?m)^([A-Z0-9_]+)=").expect("declaration pattern is valid")
    })
}

/// Result of one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvReport {
    pub files_scanned: usize,
    /// Declared names, deduplicated in first-seen order.
    pub declared: Vec<String>,
    pub unused: Vec<String>,
}

impl EnvReport {
    pub fn summary(&self, prefix: &str) -> String {
        let tail = if self.unused.is_empty() {
            "No unused variables.".to_string()
        } else {
            format!("{} unused variable(s) found.", self.unused.len())
        };
        format!("Checked {} {prefix} file(s). {tail}", self.files_scanned)
    }
}

/// Regular files directly under `root` whose name starts with `prefix`,
/// sorted by name.
pub fn env_files(root: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(root).map_err(|_| ToolkitError::NoWorkspace)?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(prefix))
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}

/// Names declared as `NAME=` at the start of a line.
pub fn declared_variables(content: &str) -> Vec<String> {
    declaration_pattern()
        .captures_iter(content)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Whether `name` appears in `text` under the given mode.
pub fn is_used(name: &str, text: &str, mode: UsageMode) -> bool {
    let escaped = regex::escape(name);
    let pattern = match mode {
        UsageMode::Permissive => format!(r"process\.env\.{escaped}\b|{escaped}\b"),
        UsageMode::Strict => format!(r"process\.env\.{escaped}\b|\b{escaped}\b"),
    };
    Regex::new(&pattern)
        .map(|re| re.is_match(text))
        .unwrap_or(true)
}

/// Declared names that do not occur in `text`, in declaration order.
pub fn find_unused(declared: &[String], text: &str, mode: UsageMode) -> Vec<String> {
    declared
        .iter()
        .filter(|name| !is_used(name, text, mode))
        .cloned()
        .collect()
}

fn scan(host: &mut dyn Host, config: &ToolkitConfig) -> Result<EnvReport> {
    let root = host.workspace_root().ok_or(ToolkitError::NoWorkspace)?;
    let prefix = config.env_file_prefix.as_str();

    let files = env_files(&root, prefix)?;
    if files.is_empty() {
        return Err(ToolkitError::NoEnvFiles {
            prefix: prefix.to_string(),
        });
    }

    let mut seen = HashSet::new();
    let mut declared = Vec::new();
    for file in &files {
        match std::fs::read_to_string(file) {
            Ok(content) => {
                for name in declared_variables(&content) {
                    if seen.insert(name.clone()) {
                        declared.push(name);
                    }
                }
            }
            Err(e) => {
                warn!(file = %file.display(), error = %e, "failed to read env file");
                let name = file.file_name().unwrap_or(file.as_os_str());
                host.notify(
                    NoticeLevel::Error,
                    &format!("Error reading {}: {e}", name.to_string_lossy()),
                );
            }
        }
    }

    if declared.is_empty() {
        return Err(ToolkitError::NoVariables {
            prefix: prefix.to_string(),
        });
    }

    let text = host.active_buffer().ok_or(ToolkitError::NoActiveBuffer)?;
    let unused = find_unused(&declared, &text, config.usage_mode);
    debug!(
        files = files.len(),
        declared = declared.len(),
        unused = unused.len(),
        "env scan complete"
    );

    Ok(EnvReport {
        files_scanned: files.len(),
        declared,
        unused,
    })
}

/// The `trackEnv` action.
pub fn track_env(host: &mut dyn Host, config: &ToolkitConfig) -> ValidationOutcome {
    match scan(host, config) {
        Ok(report) => {
            if report.unused.is_empty() {
                host.notify(NoticeLevel::Info, "All env variables are used!");
            } else {
                host.notify(
                    NoticeLevel::Warning,
                    &format!("Unused env variables: {}", report.unused.join(", ")),
                );
            }
            ValidationOutcome::passed(report.summary(&config.env_file_prefix))
        }
        Err(err) => {
            let level = match err {
                ToolkitError::NoWorkspace => NoticeLevel::Error,
                _ => NoticeLevel::Warning,
            };
            host.notify(level, &err.to_string());
            ValidationOutcome::from(&err)
        }
    }
}
