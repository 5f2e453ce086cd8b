//! Subcommands of the `cnis` binary.

pub mod config;
pub mod process;
