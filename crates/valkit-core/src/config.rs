//! Runtime configuration shared by all flows.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default timeout for remote API document fetches.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// How the env tracker decides that a declared name is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageMode {
    /// `process.env.NAME` or `NAME` followed by a word boundary, anywhere.
    #[default]
    Permissive,
    /// `NAME` must also be preceded by a word boundary.
    Strict,
}

impl std::str::FromStr for UsageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(Self::Permissive),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown usage mode: {other}")),
        }
    }
}

/// Toolkit configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolkitConfig {
    /// Upper bound for a single remote fetch
    pub fetch_timeout: Duration,
    /// File name prefix identifying env files
    pub env_file_prefix: String,
    /// Env usage detection mode
    pub usage_mode: UsageMode,
    /// Shortest commit message not flagged as too short
    pub min_commit_length: usize,
    /// Type prepended by the commit auto-fix
    pub default_commit_type: String,
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        ToolkitConfig {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            env_file_prefix: ".env".to_string(),
            usage_mode: UsageMode::Permissive,
            min_commit_length: 10,
            default_commit_type: "chore".to_string(),
        }
    }
}

impl ToolkitConfig {
    /// Create a config from `VALKIT_*` environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(secs) = std::env::var("VALKIT_FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.fetch_timeout = Duration::from_secs(secs);
        }
        if let Ok(prefix) = std::env::var("VALKIT_ENV_PREFIX") {
            if !prefix.is_empty() {
                config.env_file_prefix = prefix;
            }
        }
        if let Some(mode) = std::env::var("VALKIT_ENV_USAGE")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.usage_mode = mode;
        }

        config
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_env_file_prefix(mut self, prefix: &str) -> Self {
        self.env_file_prefix = prefix.to_string();
        self
    }

    pub fn with_usage_mode(mut self, mode: UsageMode) -> Self {
        self.usage_mode = mode;
        self
    }
}
