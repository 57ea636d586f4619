// src/exec/mod.rs

//! Build command construction and execution.
//!
//! - [`command`] builds the bounded `make [target]` command line.
//! - [`runner`] provides the `CommandRunner` trait and the `ShellRunner`
//!   used in production; tests substitute a recording runner.

pub mod command;
pub mod runner;

pub use command::{BuildCommand, BASE_COMMAND, DEFAULT_MAX_COMMAND_LEN, MAX_TARGET_LEN};
pub use runner::{CommandOutcome, CommandRunner, ShellRunner};
