//! CLI module for the Curio binary.

mod commands;
mod handlers;

pub use commands::{Cli, Commands};
pub use handlers::run_command;
