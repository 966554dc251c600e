//! API contract validation flow.
//!
//! acquire → interpret → version advisory → bundle → structural validation.
//! Any failure becomes a failed outcome plus one remediation hint.

pub mod bundle;
pub mod schema;
pub mod version;

pub use bundle::Bundler;
pub use schema::{validate_structure, SchemaFamily};
pub use version::{check_version, declared_version, VersionAdvisory, SUPPORTED_VERSIONS};

use serde_json::Value;

use crate::advisory;
use crate::document::interpret;
use crate::error::{Result, ToolkitError};
use crate::host::{Host, NoticeLevel};
use crate::obs;
use crate::outcome::ValidationOutcome;
use crate::source::{acquire, ApiSource, DocumentLoader, Location};

pub const VALID_MESSAGE: &str = "API validated successfully!";

/// Validate an already parsed document. Version advisories go to `host`.
pub async fn validate_document(
    host: &mut dyn Host,
    loader: &dyn DocumentLoader,
    doc: &Value,
    location: &Location,
) -> Result<SchemaFamily> {
    if let Some(advisory) = check_version(doc) {
        host.notify(NoticeLevel::Warning, &advisory.message());
    }

    let bundled = Bundler::new(loader).bundle(doc, location).await?;
    validate_structure(&bundled)
}

async fn validate_source(
    host: &mut dyn Host,
    loader: &dyn DocumentLoader,
    source: &ApiSource,
) -> Result<SchemaFamily> {
    let acquired = acquire(loader, source).await?;
    let doc = interpret(&acquired.text, &acquired.name_hint())?;
    validate_document(host, loader, &doc, &acquired.location).await
}

/// The `validateAPI` action.
pub async fn validate_api(host: &mut dyn Host, loader: &dyn DocumentLoader) -> ValidationOutcome {
    let Some(source) = host.select_source().await else {
        let err = ToolkitError::NoInput("No API file selected.".to_string());
        host.notify(NoticeLevel::Error, &err.to_string());
        return ValidationOutcome::from(&err);
    };

    match validate_source(host, loader, &source).await {
        Ok(family) => {
            host.notify(
                NoticeLevel::Info,
                &format!("API contract is valid ({family})."),
            );
            ValidationOutcome::passed(VALID_MESSAGE)
        }
        Err(err) => {
            obs::emit_flow_error("validateAPI", &err);
            host.notify(
                NoticeLevel::Error,
                &format!("API validation error:\n{}", err.detailed()),
            );
            advisory::present_suggestion(host, &err.to_string());
            ValidationOutcome::from(&err)
        }
    }
}
