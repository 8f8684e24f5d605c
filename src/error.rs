//! Error types for translation
//!
//! Translation failures are terminal for the call that produced them. Nothing
//! in the translator retries; callers decide whether to re-read configuration.

use crate::resolver::ResolveError;
use thiserror::Error;

/// Result type alias for translator operations.
pub type Result<T> = std::result::Result<T, TranslateError>;

/// Errors raised while expanding or flattening an instance.
#[derive(Error, Debug)]
pub enum TranslateError {
    /// Declarative input violates a structural precondition.
    #[error("{0}")]
    ConfigShape(String),

    /// A reference could not be canonicalized.
    #[error("cannot resolve {field}: {source}")]
    ReferenceResolution {
        /// Field path that triggered the resolution, e.g. `network_interface.0.subnetwork`
        field: String,
        #[source]
        source: ResolveError,
    },
}

impl TranslateError {
    pub fn config_shape(message: impl Into<String>) -> Self {
        Self::ConfigShape(message.into())
    }

    pub fn resolution(field: impl Into<String>, source: ResolveError) -> Self {
        Self::ReferenceResolution {
            field: field.into(),
            source,
        }
    }

    /// True for errors caused by the shape of the declarative input.
    pub fn is_config_shape(&self) -> bool {
        matches!(self, Self::ConfigShape(_))
    }
}
