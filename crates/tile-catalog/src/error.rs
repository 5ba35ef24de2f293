//! Error types for collection enrichment.

use catalog_common::CatalogError;
use thiserror::Error;

/// Result type alias using EnrichError.
pub type EnrichResult<T> = Result<T, EnrichError>;

/// Failures that abort enrichment of one collection.
///
/// Per-entry problems (bad timestamps, unmatched entries) are not errors;
/// they are reported as [`SkippedEntry`](crate::reconcile::SkippedEntry).
#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("Missing required endpoint field: {0}")]
    MissingField(&'static str),

    #[error("Invalid value for '{field}': {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Overlay copy failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl EnrichError {
    /// Whether the error comes from the handler configuration rather than
    /// from the catalog or the file system.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            EnrichError::MissingField(_) | EnrichError::InvalidField { .. }
        )
    }
}
