//! Command nodes and their builder

use std::fmt;

use crate::command::{CommandExecutor, CommandId};

/// Declares a node's own arguments on its `clap::Command`.
pub type ArgumentsFn = Box<dyn Fn(clap::Command) -> clap::Command>;

/// One node of a command tree: a named subcommand, its argument
/// declaration and its executor.
///
/// Built standalone, then attached with [`CommandTree::new`] (root) or
/// [`CommandTree::register`] (children), which set the links.
///
/// [`CommandTree::new`]: crate::command::CommandTree::new
/// [`CommandTree::register`]: crate::command::CommandTree::register
pub struct CommandArgument {
    pub(crate) name: String,
    pub(crate) help: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) arguments: Option<ArgumentsFn>,
    pub(crate) executor: CommandExecutor,
    pub(crate) parent: Option<CommandId>,
    pub(crate) children: Vec<CommandId>,
}

impl CommandArgument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: None,
            description: None,
            arguments: None,
            executor: CommandExecutor::noop(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// One-line help shown in the parent's subcommand list.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Longer text shown in this command's own `--help`.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declare this command's arguments.
    pub fn arguments<F>(mut self, declare: F) -> Self
    where
        F: Fn(clap::Command) -> clap::Command + 'static,
    {
        self.arguments = Some(Box::new(declare));
        self
    }

    pub fn executor(mut self, executor: CommandExecutor) -> Self {
        self.executor = executor;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn bound(&self) -> &CommandExecutor {
        &self.executor
    }

    pub fn parent(&self) -> Option<CommandId> {
        self.parent
    }

    pub fn children(&self) -> &[CommandId] {
        &self.children
    }

    /// Build this node's `clap::Command`, without children.
    pub(crate) fn to_command(&self) -> clap::Command {
        let mut cmd = clap::Command::new(self.name.clone());
        match (&self.help, &self.description) {
            (Some(help), Some(description)) => {
                cmd = cmd.about(help.clone()).long_about(description.clone());
            }
            (Some(text), None) | (None, Some(text)) => cmd = cmd.about(text.clone()),
            (None, None) => {}
        }
        match &self.arguments {
            Some(declare) => declare(cmd),
            None => cmd,
        }
    }
}

impl fmt::Debug for CommandArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandArgument")
            .field("name", &self.name)
            .field("help", &self.help)
            .field("description", &self.description)
            .field("executor", &self.executor)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .finish()
    }
}
