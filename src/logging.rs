//! Global logging flags and subscriber setup
//!
//! Command trees register `--debug`, `--level`, `--stdout`, `--stderr` and
//! `--log` on the root as global arguments. Records go to every chosen sink;
//! stderr is used when none is chosen.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::{Arg, ArgAction, ArgMatches, ValueEnum, ValueHint};
use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

pub const ARG_DEBUG: &str = "debug";
pub const ARG_LEVEL: &str = "level";
pub const ARG_STDOUT: &str = "stdout";
pub const ARG_STDERR: &str = "stderr";
pub const ARG_LOG: &str = "log";

/// Log level selectable with `--level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<Level> for LevelFilter {
    fn from(level: Level) -> Self {
        match level {
            Level::Trace => LevelFilter::TRACE,
            Level::Debug => LevelFilter::DEBUG,
            Level::Info => LevelFilter::INFO,
            Level::Warn => LevelFilter::WARN,
            Level::Error => LevelFilter::ERROR,
        }
    }
}

/// Logger configuration collected from the global flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    pub level: LevelFilter,
    pub stdout: bool,
    pub stderr: bool,
    pub file: Option<PathBuf>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: LevelFilter::WARN,
            stdout: false,
            stderr: false,
            file: None,
        }
    }
}

impl LogOptions {
    /// Read the global logging flags; missing flags keep their defaults.
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let flag = |id: &str| {
            matches
                .try_get_one::<bool>(id)
                .ok()
                .flatten()
                .copied()
                .unwrap_or(false)
        };
        let level = if flag(ARG_DEBUG) {
            LevelFilter::DEBUG
        } else {
            matches
                .try_get_one::<Level>(ARG_LEVEL)
                .ok()
                .flatten()
                .map(|&level| level.into())
                .unwrap_or(LevelFilter::WARN)
        };
        Self {
            level,
            stdout: flag(ARG_STDOUT),
            stderr: flag(ARG_STDERR),
            file: matches
                .try_get_one::<PathBuf>(ARG_LOG)
                .ok()
                .flatten()
                .cloned(),
        }
    }

    /// Stderr is the fallback sink when nothing else was chosen.
    pub fn uses_stderr(&self) -> bool {
        self.stderr || (!self.stdout && self.file.is_none())
    }
}

/// Add the global logging flags to a root command.
pub fn arguments(cmd: clap::Command) -> clap::Command {
    cmd.arg(
        Arg::new(ARG_DEBUG)
            .short('d')
            .long("debug")
            .global(true)
            .action(ArgAction::SetTrue)
            .help("Enable debug logging"),
    )
    .arg(
        Arg::new(ARG_LEVEL)
            .long("level")
            .global(true)
            .value_parser(clap::value_parser!(Level))
            .help("Log level (default: warn)"),
    )
    .arg(
        Arg::new(ARG_STDOUT)
            .long("stdout")
            .global(true)
            .action(ArgAction::SetTrue)
            .help("Write log records to stdout"),
    )
    .arg(
        Arg::new(ARG_STDERR)
            .long("stderr")
            .global(true)
            .action(ArgAction::SetTrue)
            .help("Write log records to stderr"),
    )
    .arg(
        Arg::new(ARG_LOG)
            .long("log")
            .global(true)
            .value_name("FILE")
            .value_hint(ValueHint::FilePath)
            .value_parser(clap::value_parser!(PathBuf))
            .help("Append log records to FILE"),
    )
}

/// Install the global subscriber.
///
/// Only the first call per process installs anything; later calls are
/// logged and ignored. Fails only if the log file cannot be opened.
pub fn init(options: &LogOptions) -> io::Result<()> {
    let file = match &options.file {
        Some(path) => Some(OpenOptions::new().create(true).append(true).open(path)?),
        None => None,
    };

    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
        return Ok(());
    }

    let level = options.level;
    let stdout_layer = options.stdout.then(|| {
        fmt::layer()
            .with_writer(io::stdout)
            .with_target(true)
            .with_filter(level)
    });
    let stderr_layer = options.uses_stderr().then(|| {
        fmt::layer()
            .with_writer(io::stderr)
            .with_target(true)
            .with_filter(level)
    });
    let file_layer = file.map(|file| {
        fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(true)
            .with_filter(level)
    });

    if let Err(e) = tracing_subscriber::registry()
        .with(stdout_layer)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
    {
        debug!("Tracing subscriber already set: {}", e);
        return Ok(());
    }

    match level {
        LevelFilter::INFO => tracing::info!("Log level: info"),
        LevelFilter::DEBUG => tracing::debug!("Log level: debug"),
        LevelFilter::TRACE => tracing::debug!("Log level: trace"),
        _ => {}
    }
    Ok(())
}
