//! Arena-backed command tree: registration, grammar assembly and dispatch

use std::ffi::OsString;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use clap::ArgMatches;
use generational_arena::{Arena, Index};
use tracing::{debug, error, instrument};

use crate::cli::output;
use crate::command::{CommandArgument, CommandContext, CommandError, CommandResult};
use crate::exitcode;
use crate::logging::{self, LogOptions};

/// Handle of a node in a [`CommandTree`].
pub type CommandId = Index;

/// A tree of commands with exactly one root.
///
/// Nodes reference each other by [`CommandId`]; sibling names are unique.
pub struct CommandTree {
    arena: Arena<CommandArgument>,
    root: CommandId,
    version: Option<String>,
    logger: bool,
}

impl CommandTree {
    /// Create a tree whose root is `root`; its name is the program name.
    pub fn new(root: CommandArgument) -> Self {
        let mut arena = Arena::new();
        let mut root = root;
        root.parent = None;
        root.children.clear();
        let root = arena.insert(root);
        Self {
            arena,
            root,
            version: None,
            logger: true,
        }
    }

    /// Enable `--version` on the root.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Do not register the logging flags and never install a subscriber.
    pub fn without_logger(mut self) -> Self {
        self.logger = false;
        self
    }

    pub fn root(&self) -> CommandId {
        self.root
    }

    pub fn prog(&self) -> &str {
        self.arena[self.root].name()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn logger_enabled(&self) -> bool {
        self.logger
    }

    /// Register `argument` as a child of `parent`.
    #[instrument(level = "debug", skip(self, argument), fields(name = argument.name()))]
    pub fn register(
        &mut self,
        parent: CommandId,
        argument: CommandArgument,
    ) -> CommandResult<CommandId> {
        let parent_node = self
            .arena
            .get(parent)
            .ok_or_else(|| CommandError::UnknownCommand(format!("{parent:?}")))?;
        if self.child_by_name(parent, argument.name()).is_some() {
            return Err(CommandError::DuplicateCommand {
                parent: parent_node.name().to_string(),
                name: argument.name().to_string(),
            });
        }

        let mut argument = argument;
        argument.parent = Some(parent);
        argument.children.clear();
        let id = self.arena.insert(argument);
        if let Some(parent_node) = self.arena.get_mut(parent) {
            parent_node.children.push(id);
        }
        Ok(id)
    }

    pub fn get(&self, id: CommandId) -> Option<&CommandArgument> {
        self.arena.get(id)
    }

    pub fn parent(&self, id: CommandId) -> Option<CommandId> {
        self.get(id).and_then(CommandArgument::parent)
    }

    pub fn children(&self, id: CommandId) -> &[CommandId] {
        self.get(id).map(CommandArgument::children).unwrap_or_default()
    }

    /// Whether `id` has registered subcommands.
    pub fn has_sub(&self, id: CommandId) -> bool {
        !self.children(id).is_empty()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    fn child_by_name(&self, parent: CommandId, name: &str) -> Option<CommandId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&child| self.get(child).is_some_and(|node| node.name() == name))
    }

    /// Find a node by the names below the root, e.g. `["remote", "add"]`.
    /// The empty path is the root.
    pub fn find(&self, path: &[&str]) -> Option<CommandId> {
        path.iter()
            .try_fold(self.root, |id, name| self.child_by_name(id, name))
    }

    /// Names from the root down to `id`, root included.
    pub fn path(&self, id: CommandId) -> Vec<&str> {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current.and_then(|id| self.get(id)) {
            names.push(node.name());
            current = node.parent();
        }
        names.reverse();
        names
    }

    /// Assemble the full grammar: root, global flags and nested subcommands.
    pub fn build_command(&self) -> clap::Command {
        self.build_command_from(self.root, None)
    }

    /// Assemble the grammar of the subtree below `id`, named `prog` when given.
    ///
    /// Global flags and `--version` are added as for the whole tree.
    pub fn build_command_from(&self, id: CommandId, prog: Option<&str>) -> clap::Command {
        let mut cmd = self.build_node(id);
        if let Some(prog) = prog {
            cmd = cmd.name(prog.to_string());
        }
        if let Some(version) = &self.version {
            cmd = cmd.version(version.clone()).propagate_version(true);
        }
        if self.logger {
            cmd = logging::arguments(cmd);
        }
        cmd
    }

    fn build_node(&self, id: CommandId) -> clap::Command {
        let node = &self.arena[id];
        node.children
            .iter()
            .fold(node.to_command(), |cmd, &child| {
                cmd.subcommand(self.build_node(child))
            })
    }

    /// Parse `argv` (without the program name) against the grammar.
    pub fn parse<I, T>(&self, argv: I) -> CommandResult<ArgMatches>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.parse_from(self.root, None, argv)
    }

    /// Parse `argv` against the subtree below `id`.
    pub fn parse_from<I, T>(
        &self,
        id: CommandId,
        prog: Option<&str>,
        argv: I,
    ) -> CommandResult<ArgMatches>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let node = self
            .get(id)
            .ok_or_else(|| CommandError::UnknownCommand(format!("{id:?}")))?;
        let prog = prog.unwrap_or(node.name());
        let args = std::iter::once(OsString::from(prog)).chain(argv.into_iter().map(Into::into));
        Ok(self
            .build_command_from(id, Some(prog))
            .try_get_matches_from(args)?)
    }

    /// Parse `argv` (without the program name) and run the matched chain.
    ///
    /// Returns the process exit code: 0 or the executors' status on success,
    /// 0 after `--help`/`--version`, `NOT_FOUND` on parse failures or a
    /// broken grammar, `CANCELED` on interruption and `NOT_RECOVERABLE`
    /// otherwise.
    pub fn run<I, T>(&self, argv: I) -> i32
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.run_from(self.root, None, argv)
    }

    /// Run the subtree below `id` as if it were the whole program.
    ///
    /// `prog` replaces the node's name in usage and help output. Hooks of
    /// the nodes above `id` do not run.
    pub fn run_from<I, T>(&self, id: CommandId, prog: Option<&str>, argv: I) -> i32
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        // argument callbacks and clap's grammar checks may panic
        let parsed = panic::catch_unwind(AssertUnwindSafe(|| self.parse_from(id, prog, argv)));
        let matches = match parsed {
            Ok(Ok(matches)) => matches,
            Ok(Err(CommandError::Parse(e))) => return report_parse_error(&e),
            Ok(Err(e)) => return report_error(&e),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!("invalid command grammar: {}", message);
                output::error(&format!("invalid command grammar: {message}"));
                return exitcode::NOT_FOUND;
            }
        };

        if self.logger {
            let options = LogOptions::from_matches(&matches);
            if let Err(e) = logging::init(&options) {
                let context = match &options.file {
                    Some(path) => format!("open log file {}", path.display()),
                    None => "initialize logging".to_string(),
                };
                return report_error(&CommandError::io(context, e));
            }
        }

        let prog = prog.or_else(|| self.get(id).map(CommandArgument::name)).unwrap_or_default();
        match panic::catch_unwind(AssertUnwindSafe(|| {
            self.dispatch(id, prog, &matches, &matches)
        })) {
            Ok(Ok(status)) => {
                debug!(status, "command finished");
                status
            }
            Ok(Err(e)) => report_error(&e),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!("command panicked: {}", message);
                output::error(&format!("unrecoverable failure: {message}"));
                exitcode::NOT_RECOVERABLE
            }
        }
    }

    fn dispatch(
        &self,
        id: CommandId,
        prog: &str,
        matches: &ArgMatches,
        root_matches: &ArgMatches,
    ) -> CommandResult<i32> {
        let node = self
            .get(id)
            .ok_or_else(|| CommandError::UnknownCommand(format!("{id:?}")))?;
        debug!(command = node.name(), "run");
        let ctx = CommandContext::new(self, id, prog, matches, root_matches);
        node.executor.execute(&ctx, || match matches.subcommand() {
            Some((name, sub_matches)) => {
                let child = self
                    .child_by_name(id, name)
                    .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;
                self.dispatch(child, prog, sub_matches, root_matches)
            }
            None => Ok(exitcode::OK),
        })
    }
}

fn report_parse_error(e: &clap::Error) -> i32 {
    // help and version arrive as errors printed to stdout
    if let Err(print_err) = e.print() {
        debug!("failed to print parse output: {}", print_err);
    }
    if e.use_stderr() {
        exitcode::NOT_FOUND
    } else {
        exitcode::OK
    }
}

fn report_error(e: &CommandError) -> i32 {
    let code = e.exit_code();
    error!(code, "{}", e);
    output::error(e);
    code
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

impl fmt::Debug for CommandTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandTree")
            .field("prog", &self.prog())
            .field("nodes", &self.arena.len())
            .field("version", &self.version)
            .field("logger", &self.logger)
            .finish()
    }
}
