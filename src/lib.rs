//! Declarative command trees with prepare/cleanup hooks on top of clap,
//! and the `xargproject` scaffolder built with them.

pub mod application;
pub mod cli;
pub mod command;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod interrupt;
pub mod logging;
pub mod util;
