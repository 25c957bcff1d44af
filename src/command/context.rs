//! Per-invocation view handed to executors

use std::any::Any;

use clap::ArgMatches;

use crate::command::{CommandId, CommandTree};

/// What an executor sees while it runs.
#[derive(Debug, Clone, Copy)]
pub struct CommandContext<'a> {
    tree: &'a CommandTree,
    id: CommandId,
    prog: &'a str,
    matches: &'a ArgMatches,
    root_matches: &'a ArgMatches,
}

impl<'a> CommandContext<'a> {
    pub(crate) fn new(
        tree: &'a CommandTree,
        id: CommandId,
        prog: &'a str,
        matches: &'a ArgMatches,
        root_matches: &'a ArgMatches,
    ) -> Self {
        Self {
            tree,
            id,
            prog,
            matches,
            root_matches,
        }
    }

    pub fn tree(&self) -> &'a CommandTree {
        self.tree
    }

    pub fn id(&self) -> CommandId {
        self.id
    }

    /// Name of the command being executed.
    pub fn name(&self) -> &'a str {
        self.tree.get(self.id).map(|node| node.name()).unwrap_or_default()
    }

    /// Names from the root down to this command.
    pub fn path(&self) -> Vec<&'a str> {
        self.tree.path(self.id)
    }

    /// Program name of this invocation; the root's name unless overridden.
    pub fn prog(&self) -> &'a str {
        self.prog
    }

    pub fn version(&self) -> Option<&'a str> {
        self.tree.version()
    }

    /// Matches for this command's own arguments.
    pub fn matches(&self) -> &'a ArgMatches {
        self.matches
    }

    /// Matches of the root command, carrying the global flags.
    pub fn root_matches(&self) -> &'a ArgMatches {
        self.root_matches
    }

    /// Value of an argument of this command; `None` when absent or undeclared.
    pub fn get_one<T>(&self, id: &str) -> Option<&'a T>
    where
        T: Any + Clone + Send + Sync + 'static,
    {
        self.matches.try_get_one::<T>(id).ok().flatten()
    }

    /// Whether a flag of this command is set; `false` when undeclared.
    pub fn get_flag(&self, id: &str) -> bool {
        self.get_one::<bool>(id).copied().unwrap_or(false)
    }
}
