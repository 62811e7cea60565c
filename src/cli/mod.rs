//! Command-line interface for muster.
//!
//! Provides the `validate` and `build` commands.

mod commands;

pub use commands::{parse_cli, run_with_cli, BuildArgs, Cli, Commands, ValidateArgs};
