//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors are invalid-argument conditions raised while a
/// project is constructed. Nothing is written when one of these occurs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid project name: '{0}'")]
    InvalidProjectName(String),

    #[error("unknown license: '{name}' (known: {known})")]
    UnknownLicense { name: String, known: String },
}
