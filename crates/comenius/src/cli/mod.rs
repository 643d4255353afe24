//! Command-line interface module.
//!
//! Provides the CLI structure and command handlers for the comenius binary.

mod check;
mod commands;
mod generate;

pub use check::check_provider;
pub use commands::{Cli, Commands, GenerateArgs};
pub use generate::run_generate;
