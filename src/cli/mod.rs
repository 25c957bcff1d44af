//! CLI layer: the `xargproject` command tree and terminal output

pub mod commands;
pub mod output;

pub use commands::build_tree;
