use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

pub const DEFAULT_ERROR_MESSAGE: &str = "gnviewer.syncErrorDefault";
pub const CANNOT_PERFORM_ACTION: &str = "gnviewer.cannotPerfomAction";

#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("resource {pk} has no link named {link:?}")]
    #[diagnostic(help("the requested metadata format is not exposed by this resource"))]
    MissingLink { pk: String, link: String },

    #[error("no resource is currently selected")]
    MissingResource,

    #[error("service returned an exception report")]
    ServiceException(String),

    #[error("catalog request failed: {0}")]
    Http(String),

    #[error("catalog returned status {status}")]
    Status {
        status: u16,
        message: Option<String>,
        detail: Option<String>,
    },

    #[error("invalid resource pk: {0}")]
    InvalidPk(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),

    #[error("effect handler for {0} panicked")]
    EffectPanicked(String),
}

impl CatalogError {
    /// Errors that point at a caller bug rather than a failed request.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CatalogError::MissingLink { .. } | CatalogError::MissingResource
        )
    }

    /// Best-effort human message: server `message`, server `detail`,
    /// transport message, then the generic fallback key.
    pub fn notification_message(&self) -> String {
        match self {
            CatalogError::Status {
                message, detail, ..
            } => message
                .as_deref()
                .or(detail.as_deref())
                .unwrap_or(DEFAULT_ERROR_MESSAGE)
                .to_string(),
            CatalogError::ServiceException(xml) if !xml.trim().is_empty() => xml.clone(),
            CatalogError::Http(message) | CatalogError::Filesystem(message)
                if !message.trim().is_empty() =>
            {
                message.clone()
            }
            _ => DEFAULT_ERROR_MESSAGE.to_string(),
        }
    }
}
