//! CLI module - argument parsing and command dispatch

pub mod args;
pub mod commands;
pub mod helpers;
pub mod output;
pub mod prompt;

pub use args::{Cli, Commands, CompletionsArgs, GlobalOpts, OutputFormat};
