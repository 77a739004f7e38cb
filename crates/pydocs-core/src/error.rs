use thiserror::Error;

/// Application-wide error types for pydocs.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed (fetching a page).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// A required element is missing from the parsed page.
    #[error("Tag not found: {tag} {attrs}")]
    TagNotFound { tag: String, attrs: String },

    /// The page does not have the structure an extraction routine expects.
    #[error("Structure not found: {0}")]
    StructureNotFound(String),

    /// An element was found but lacks a required attribute.
    #[error("Tag <{tag}> has no '{attr}' attribute")]
    MissingAttribute { tag: String, attr: String },

    /// A mode routine failed; wraps whatever escaped it.
    #[error("Extraction failed in mode '{mode}': {source}")]
    ExtractionFailed {
        mode: String,
        #[source]
        source: Box<AppError>,
    },

    /// A URL could not be parsed or joined.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A result row does not have the header's arity.
    #[error("Row has {found} columns, header has {expected}")]
    ColumnMismatch { expected: usize, found: usize },

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The on-disk HTTP cache could not be read or written.
    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// Returns true for network-level failures that the page fetcher
    /// contains instead of propagating.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AppError::HttpError(_) | AppError::NetworkError(_) | AppError::Timeout(_)
        )
    }

    /// Returns true if this error means the target page changed shape.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            AppError::TagNotFound { .. }
                | AppError::StructureNotFound(_)
                | AppError::MissingAttribute { .. }
        )
    }

    /// Wrap an error escaping a mode routine. Already-wrapped errors are
    /// returned unchanged so the wrap happens exactly once.
    pub fn extraction_failed(mode: impl Into<String>, source: AppError) -> Self {
        match source {
            wrapped @ AppError::ExtractionFailed { .. } => wrapped,
            other => AppError::ExtractionFailed {
                mode: mode.into(),
                source: Box::new(other),
            },
        }
    }
}
