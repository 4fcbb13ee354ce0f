//! Line-oriented shell over a [`LedgerStore`](crate::core::LedgerStore).

pub mod commands;
pub mod context;
pub mod output;
pub mod registry;
mod shell;

pub use context::{CliError, CliMode, CommandError, ShellContext};
pub use shell::{run_cli, SCRIPT_ENV_VAR};
