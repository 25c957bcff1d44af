//! Application-level errors (wraps domain errors)

use std::path::Path;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    /// I/O failure on `path` while performing `action`.
    pub fn io(action: &str, path: &Path, source: std::io::Error) -> Self {
        Self::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(source),
        }
    }

    /// The underlying I/O error, if this is one.
    pub fn io_source(&self) -> Option<&std::io::Error> {
        match self {
            Self::OperationFailed { source, .. } => source.downcast_ref::<std::io::Error>(),
            _ => None,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
