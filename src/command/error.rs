//! Command-tree errors and their exit codes

use std::io;

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::exitcode;

/// Errors raised while building or running a command tree.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{0}")]
    Parse(#[from] clap::Error),

    #[error("duplicate subcommand '{name}' under '{parent}'")]
    DuplicateCommand { parent: String, name: String },

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("interrupted")]
    Interrupted,

    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Failed(String),
}

/// Result type for command operations.
pub type CommandResult<T> = Result<T, CommandError>;

impl From<DomainError> for CommandError {
    fn from(e: DomainError) -> Self {
        CommandError::Application(e.into())
    }
}

impl CommandError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandError::Parse(_) | CommandError::UnknownCommand(_) => exitcode::NOT_FOUND,
            CommandError::Interrupted => exitcode::CANCELED,
            CommandError::Io { source, .. } if source.kind() == io::ErrorKind::Interrupted => {
                exitcode::CANCELED
            }
            CommandError::Application(e)
                if e.io_source().map(io::Error::kind) == Some(io::ErrorKind::Interrupted) =>
            {
                exitcode::CANCELED
            }
            _ => exitcode::NOT_RECOVERABLE,
        }
    }
}
