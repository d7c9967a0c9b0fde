//! Command-line interface: argument parsing and the interactive shell.

pub mod args;
pub mod repl;

pub use args::JavelinArgs;
pub use repl::{Command, Repl};
