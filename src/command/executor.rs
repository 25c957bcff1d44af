//! Executors: the main body of a command plus its prepare/cleanup hooks

use std::fmt;

use tracing::{debug, warn};

use crate::command::{CommandContext, CommandResult};
use crate::exitcode;

/// Callable bound to a command node. Returns an exit status.
pub type Handler = Box<dyn Fn(&CommandContext<'_>) -> CommandResult<i32>>;

/// The main body of a command with optional creation (prep) and
/// deletion (done) hooks.
///
/// Execution order for one node:
/// 1. `prep`: a non-zero status skips everything else and is returned.
/// 2. `main`, then the matched subcommand if `main` returned zero.
/// 3. `done`: always runs once `prep` passed; a non-zero status overrides.
pub struct CommandExecutor {
    main: Handler,
    prep: Option<Handler>,
    done: Option<Handler>,
}

impl CommandExecutor {
    pub fn new<F>(main: F) -> Self
    where
        F: Fn(&CommandContext<'_>) -> CommandResult<i32> + 'static,
    {
        Self {
            main: Box::new(main),
            prep: None,
            done: None,
        }
    }

    /// Executor whose body does nothing and succeeds.
    pub fn noop() -> Self {
        Self::new(|_| Ok(exitcode::OK))
    }

    /// Attach a pre-hook run before the main body.
    pub fn with_prep<F>(mut self, prep: F) -> Self
    where
        F: Fn(&CommandContext<'_>) -> CommandResult<i32> + 'static,
    {
        self.prep = Some(Box::new(prep));
        self
    }

    /// Attach a post-hook run after the main body.
    pub fn with_done<F>(mut self, done: F) -> Self
    where
        F: Fn(&CommandContext<'_>) -> CommandResult<i32> + 'static,
    {
        self.done = Some(Box::new(done));
        self
    }

    pub fn has_prep(&self) -> bool {
        self.prep.is_some()
    }

    pub fn has_done(&self) -> bool {
        self.done.is_some()
    }

    /// Run this executor. `descend` runs the matched subcommand chain.
    pub(crate) fn execute<F>(&self, ctx: &CommandContext<'_>, descend: F) -> CommandResult<i32>
    where
        F: FnOnce() -> CommandResult<i32>,
    {
        if let Some(prep) = &self.prep {
            let status = prep(ctx)?;
            if status != exitcode::OK {
                debug!(command = ctx.name(), status, "prep short-circuit");
                return Ok(status);
            }
        }

        let outcome = (self.main)(ctx).and_then(|status| {
            if status == exitcode::OK {
                descend()
            } else {
                Ok(status)
            }
        });

        let Some(done) = &self.done else {
            return outcome;
        };
        match (outcome, done(ctx)) {
            (Ok(status), Ok(exitcode::OK)) => Ok(status),
            (Ok(_), Ok(cleanup)) => {
                debug!(command = ctx.name(), cleanup, "done overrides status");
                Ok(cleanup)
            }
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(_)) => Err(e),
            (Err(e), Err(cleanup)) => {
                warn!(command = ctx.name(), "cleanup failed after error: {}", cleanup);
                Err(e)
            }
        }
    }
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::noop()
    }
}

impl fmt::Debug for CommandExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandExecutor")
            .field("prep", &self.has_prep())
            .field("done", &self.has_done())
            .finish_non_exhaustive()
    }
}
