//! Terminal front end for tasklane boards
//!
//! Stands in for a graphical board: each invocation loads the boards from
//! the service, applies one command through [`tasklane::BoardEditor`], and
//! waits for the resulting writes before exiting.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod render;

pub use cli::{Cli, Commands, OutputFormat};
pub use commands::execute;
