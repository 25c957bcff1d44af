//! Domain layer: project model, licenses and templates
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod license;
pub mod project;

pub use error::DomainError;
pub use license::License;
pub use project::{expand_env_vars, Project};
