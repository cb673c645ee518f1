//! CLI argument parsing and command handling.

mod args;
pub mod commands;
mod validators;

pub use args::{Cli, ColorsAction, Command, ConfigAction, GlobalArgs, SnapshotArgs};
