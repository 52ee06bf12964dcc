pub mod commands;
pub mod context;
pub mod format;
pub mod output;
mod shell;
pub mod table;
pub mod views;

use std::io;

use crate::errors::DashboardError;

pub use context::{LoopControl, ShellContext};
pub use shell::{parse_options, run_cli, CliOptions};

/// Failure of a single command. The shell reports it and keeps running.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("Unknown command `{0}`. Type `help` for a list of commands.")]
    UnknownCommand(String),
    #[error(transparent)]
    Core(#[from] DashboardError),
}

/// Failure that stops the CLI.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] DashboardError),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("{0}")]
    Usage(String),
}
