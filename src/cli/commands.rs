//! The `xargproject` command tree
//!
//! ```text
//! xargproject [global flags]
//! ├── init <name> [--license] [--dir] [--author]
//! ├── licenses
//! ├── config
//! │   ├── show
//! │   ├── path
//! │   └── init [--path] [--force]
//! └── completion <shell>
//! ```

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use clap::{value_parser, Arg, ArgAction, ValueHint};
use clap_complete::Shell;
use tracing::{debug, instrument};

use crate::application::ScaffoldService;
use crate::cli::output;
use crate::command::{
    CommandArgument, CommandContext, CommandError, CommandExecutor, CommandResult, CommandTree,
};
use crate::config::{global_config_path, Settings};
use crate::domain::{License, Project};
use crate::exitcode;
use crate::infrastructure::{FileSystem, RealFileSystem};

pub const PROG: &str = "xargproject";

/// Build the `xargproject` command tree on top of loaded settings.
pub fn build_tree(settings: Settings) -> CommandResult<CommandTree> {
    let settings = Rc::new(settings);
    let mut tree = CommandTree::new(
        CommandArgument::new(PROG)
            .description("Scaffold new projects with README, LICENSE and .gitignore files"),
    )
    .with_version(env!("CARGO_PKG_VERSION"));
    let root = tree.root();

    let init_settings = Rc::clone(&settings);
    tree.register(
        root,
        CommandArgument::new("init")
            .help("Create a new project")
            .description(
                "Write README.md, LICENSE and .gitignore for a new project. \
                 Existing files are overwritten.",
            )
            .arguments(init_arguments)
            .executor(CommandExecutor::new(move |ctx| run_init(ctx, &init_settings))),
    )?;

    tree.register(
        root,
        CommandArgument::new("licenses")
            .help("List supported licenses")
            .executor(CommandExecutor::new(run_licenses)),
    )?;

    let config = tree.register(
        root,
        CommandArgument::new("config")
            .help("Manage settings")
            .arguments(|cmd| cmd.subcommand_required(true).arg_required_else_help(true)),
    )?;
    let show_settings = Rc::clone(&settings);
    tree.register(
        config,
        CommandArgument::new("show")
            .help("Show effective settings")
            .executor(CommandExecutor::new(move |_| {
                output::info(&show_settings.to_toml()?);
                Ok(exitcode::OK)
            })),
    )?;
    tree.register(
        config,
        CommandArgument::new("path")
            .help("Show config file path")
            .executor(CommandExecutor::new(run_config_path)),
    )?;
    tree.register(
        config,
        CommandArgument::new("init")
            .help("Create config template")
            .arguments(|cmd| {
                cmd.arg(
                    Arg::new("path")
                        .long("path")
                        .value_name("FILE")
                        .value_hint(ValueHint::FilePath)
                        .value_parser(value_parser!(PathBuf))
                        .help("Write the template here instead of the global config path"),
                )
                .arg(
                    Arg::new("force")
                        .short('f')
                        .long("force")
                        .action(ArgAction::SetTrue)
                        .help("Overwrite an existing config file"),
                )
            })
            .executor(CommandExecutor::new(run_config_init)),
    )?;

    tree.register(
        root,
        CommandArgument::new("completion")
            .help("Generate shell completions")
            .arguments(|cmd| {
                cmd.arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(value_parser!(Shell))
                        .help("Shell type"),
                )
            })
            .executor(CommandExecutor::new(run_completion)),
    )?;

    Ok(tree)
}

/// Build the tree and run `argv` (without the program name).
pub fn run<I, T>(argv: I, settings: Settings) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match build_tree(settings) {
        Ok(tree) => tree.run(argv),
        Err(e) => {
            output::error(&e);
            e.exit_code()
        }
    }
}

fn init_arguments(cmd: clap::Command) -> clap::Command {
    cmd.arg(Arg::new("name").required(true).help("Project name"))
        .arg(
            Arg::new("license")
                .short('l')
                .long("license")
                .value_name("LICENSE")
                .help(format!("License identifier ({})", License::known())),
        )
        .arg(
            Arg::new("dir")
                .long("dir")
                .value_name("DIR")
                .value_hint(ValueHint::DirPath)
                .value_parser(value_parser!(PathBuf))
                .help("Target directory (default: <name>)"),
        )
        .arg(
            Arg::new("author")
                .long("author")
                .value_name("NAME")
                .help("Copyright holder (default: project name)"),
        )
}

#[instrument(level = "debug", skip_all)]
fn run_init(ctx: &CommandContext<'_>, settings: &Settings) -> CommandResult<i32> {
    let name = ctx
        .get_one::<String>("name")
        .ok_or_else(|| CommandError::Failed("missing project name".to_string()))?;
    let license = ctx.get_one::<String>("license").unwrap_or(&settings.license);
    let directory = ctx
        .get_one::<PathBuf>("dir")
        .cloned()
        .unwrap_or_else(|| match &settings.directory {
            Some(base) => base.join(name),
            None => PathBuf::from(name),
        });
    let author = ctx
        .get_one::<String>("author")
        .cloned()
        .or_else(|| settings.author.clone());
    debug!(%name, %license, directory = %directory.display(), "init");

    let project = Project::new(name, license, directory)?.with_author(author);
    let service = ScaffoldService::new(Arc::new(RealFileSystem));
    let written = service.create(&project)?;

    output::header(&format!("Created {} ({})", project.name(), project.license()));
    for path in &written {
        output::created(&path.display());
    }
    Ok(exitcode::OK)
}

fn run_licenses(_ctx: &CommandContext<'_>) -> CommandResult<i32> {
    for license in License::ALL {
        output::info(&format!("{:<14} {}", license.id(), license.spdx()));
    }
    Ok(exitcode::OK)
}

fn run_config_path(_ctx: &CommandContext<'_>) -> CommandResult<i32> {
    match global_config_path() {
        Some(path) => output::info(&path.display()),
        None => output::warning("cannot determine config directory"),
    }
    Ok(exitcode::OK)
}

fn run_config_init(ctx: &CommandContext<'_>) -> CommandResult<i32> {
    let path = ctx
        .get_one::<PathBuf>("path")
        .cloned()
        .or_else(global_config_path)
        .ok_or_else(|| CommandError::Failed("cannot determine config directory".to_string()))?;

    let fs = RealFileSystem;
    if fs.exists(&path) && !ctx.get_flag("force") {
        output::warning(&format!(
            "config already exists: {} (use --force to overwrite)",
            path.display()
        ));
        return Ok(1);
    }
    fs.ensure_parent(&path)
        .map_err(|e| CommandError::io(format!("create directory for {}", path.display()), e))?;
    fs.write(&path, &Settings::template())
        .map_err(|e| CommandError::io(format!("write {}", path.display()), e))?;
    output::created(&path.display());
    Ok(exitcode::OK)
}

fn run_completion(ctx: &CommandContext<'_>) -> CommandResult<i32> {
    let shell = ctx
        .get_one::<Shell>("shell")
        .copied()
        .ok_or_else(|| CommandError::Failed("missing shell".to_string()))?;
    debug!("Generating completion file for {shell:?}");
    let mut cmd = ctx.tree().build_command();
    clap_complete::generate(shell, &mut cmd, ctx.prog().to_string(), &mut io::stdout());
    Ok(exitcode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        build_tree(Settings::default())
            .unwrap()
            .build_command()
            .debug_assert();
    }

    #[test]
    fn given_tree_when_built_then_has_expected_commands() {
        let tree = build_tree(Settings::default()).unwrap();
        let paths: [&[&str]; 6] = [
            &["init"],
            &["licenses"],
            &["config", "show"],
            &["config", "path"],
            &["config", "init"],
            &["completion"],
        ];
        for path in paths {
            assert!(tree.find(path).is_some(), "missing command {path:?}");
        }
        assert!(tree.has_sub(tree.find(&["config"]).unwrap()));
    }
}
