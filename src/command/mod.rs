//! Command trees: declarative subcommand registration on top of clap
//!
//! A [`CommandTree`] owns [`CommandArgument`] nodes. Each node declares its
//! own arguments and binds a [`CommandExecutor`] with optional prep/done
//! hooks. [`CommandTree::run`] parses `argv`, runs the matched chain from
//! the root down and maps failures to exit codes (see [`crate::exitcode`]).

pub mod argument;
pub mod context;
pub mod error;
pub mod executor;
pub mod tree;

pub use argument::{ArgumentsFn, CommandArgument};
pub use context::CommandContext;
pub use error::{CommandError, CommandResult};
pub use executor::{CommandExecutor, Handler};
pub use tree::{CommandId, CommandTree};
