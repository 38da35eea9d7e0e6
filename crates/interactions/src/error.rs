use std::error::Error as StdError;

/// Crate-wide result type for interaction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed errors shared across the engine and its messenger boundary.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input payload or parameter is invalid (e.g. a pager with no pages).
    #[error("invalid interaction input: {message}")]
    InvalidInput { message: String },

    /// A downstream platform action (send/edit/delete/react) failed.
    #[error("platform action failed: {context}: {source}")]
    Platform {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl Error {
    #[must_use]
    pub fn invalid_input(message: impl std::fmt::Display) -> Self {
        Self::InvalidInput {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn platform(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Platform {
            context: context.into(),
            source: Box::new(source),
        }
    }
}
