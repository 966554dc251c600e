//! Source acquisition: turn a user's choice into API document text.
//!
//! A source is either a local path or a remote URL. Acquisition makes a
//! single attempt; remote fetches are bounded by the configured timeout.
//! The same fetcher implements [`DocumentLoader`] so the bundler can pull
//! in externally referenced documents.

use std::error::Error as _;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ToolkitConfig;
use crate::error::{Result, ToolkitError};

/// Extensions accepted by the local file picker.
pub const API_FILE_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// Where an API description comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApiSource {
    Local { path: PathBuf },
    Remote { url: String },
}

impl ApiSource {
    /// Classify free-form input: `http(s)://` is remote, anything else local.
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            ApiSource::Remote {
                url: trimmed.to_string(),
            }
        } else {
            ApiSource::Local {
                path: PathBuf::from(trimmed),
            }
        }
    }

    /// Concrete location of the source. Local paths must exist and are made
    /// absolute so relative references resolve against the real directory.
    pub async fn resolve(&self) -> Result<Location> {
        match self {
            ApiSource::Remote { url } => Url::parse(url)
                .map(Location::Url)
                .map_err(|e| ToolkitError::Network(format!("{url}: {e}"))),
            ApiSource::Local { path } => {
                if tokio::fs::metadata(path).await.is_err() {
                    return Err(ToolkitError::NotFound(path.display().to_string()));
                }
                let absolute = tokio::fs::canonicalize(path)
                    .await
                    .unwrap_or_else(|_| path.clone());
                Ok(Location::File(absolute))
            }
        }
    }
}

/// Whether a path carries one of [`API_FILE_EXTENSIONS`].
pub fn has_api_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            API_FILE_EXTENSIONS
                .iter()
                .any(|allowed| e.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

/// Resolved location of a document, used as the base for relative `$ref`s.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    File(PathBuf),
    Url(Url),
}

impl Location {
    /// Resolve a reference path relative to this location.
    pub fn join(&self, reference: &str) -> Result<Location> {
        let lower = reference.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let url = Url::parse(reference)
                .map_err(|e| ToolkitError::Bundle(format!("invalid $ref URL '{reference}': {e}")))?;
            return Ok(Location::Url(url));
        }

        match self {
            Location::File(path) => {
                let base = path.parent().unwrap_or_else(|| Path::new(""));
                Ok(Location::File(normalize(&base.join(reference))))
            }
            Location::Url(url) => url
                .join(reference)
                .map(Location::Url)
                .map_err(|e| ToolkitError::Bundle(format!("invalid $ref '{reference}': {e}"))),
        }
    }

    /// Name hint handed to the document interpreter.
    pub fn name_hint(&self) -> String {
        match self {
            Location::File(path) => path.to_string_lossy().into_owned(),
            Location::Url(url) => url.path().to_string(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::File(path) => write!(f, "{}", path.display()),
            Location::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Lexically collapse `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Raw text of an acquired document together with its location.
#[derive(Debug, Clone)]
pub struct AcquiredDocument {
    pub location: Location,
    pub text: String,
}

impl AcquiredDocument {
    pub fn name_hint(&self) -> String {
        self.location.name_hint()
    }
}

/// Loads the text behind a location. Implemented by [`SourceFetcher`] and by
/// in-memory fakes in tests.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    async fn load(&self, location: &Location) -> Result<String>;
}

/// Acquire a source through any loader. Single attempt, no retries.
pub async fn acquire(loader: &dyn DocumentLoader, source: &ApiSource) -> Result<AcquiredDocument> {
    let location = source.resolve().await?;
    let text = loader.load(&location).await?;
    Ok(AcquiredDocument { location, text })
}

/// Local file reader and bounded HTTP fetcher.
pub struct SourceFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl SourceFetcher {
    pub fn new(config: &ToolkitConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("valkit/", env!("CARGO_PKG_VERSION")))
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|e| ToolkitError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(SourceFetcher {
            client,
            timeout: config.fetch_timeout,
        })
    }

    /// Resolve a source to its text and location.
    pub async fn acquire(&self, source: &ApiSource) -> Result<AcquiredDocument> {
        acquire(self, source).await
    }

    async fn fetch_remote(&self, url: &Url) -> Result<String> {
        debug!(url = %url, "fetching remote API document");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.describe(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ToolkitError::Network(format!(
                "failed to fetch API: HTTP {status}"
            )));
        }

        response.text().await.map_err(|e| self.describe(url, e))
    }

    async fn read_local(&self, path: &Path) -> Result<String> {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ToolkitError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(ToolkitError::NotFound(format!("{}: {e}", path.display()))),
        }
    }

    fn describe(&self, url: &Url, err: reqwest::Error) -> ToolkitError {
        if err.is_timeout() {
            return ToolkitError::Network(format!(
                "timeout of {}ms exceeded fetching {url}",
                self.timeout.as_millis()
            ));
        }

        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        ToolkitError::Network(message)
    }
}

#[async_trait]
impl DocumentLoader for SourceFetcher {
    async fn load(&self, location: &Location) -> Result<String> {
        match location {
            Location::File(path) => self.read_local(path).await,
            Location::Url(url) => self.fetch_remote(url).await,
        }
    }
}
