// src/exec/runner.rs

//! Pluggable command runner.
//!
//! The event loop talks to a `CommandRunner` instead of spawning processes
//! itself, so tests can record invocations without running `make`.

use std::future::Future;
use std::pin::Pin;

use tokio::process::Command;
use tracing::{error, info};

use crate::exec::command::BuildCommand;

/// Outcome of one build command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Success,
    Failed(i32),
}

/// Trait abstracting how the build command is executed.
pub trait CommandRunner: Send {
    /// Run `command` to completion.
    fn run<'a>(
        &'a mut self,
        command: &'a BuildCommand,
    ) -> Pin<Box<dyn Future<Output = CommandOutcome> + Send + 'a>>;
}

/// Runs the command through the platform shell, inheriting stdio, the
/// environment and the working directory.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }

    fn shell_command(line: &str) -> Command {
        let mut c = Command::new("sh");
        c.arg("-c").arg(line);
        c
    }
}

impl CommandRunner for ShellRunner {
    fn run<'a>(
        &'a mut self,
        command: &'a BuildCommand,
    ) -> Pin<Box<dyn Future<Output = CommandOutcome> + Send + 'a>> {
        Box::pin(async move {
            info!(cmd = %command, "running build command");

            let mut cmd = Self::shell_command(command.as_str());
            cmd.kill_on_drop(true);

            let status = match cmd.status().await {
                Ok(status) => status,
                Err(err) => {
                    error!(cmd = %command, error = %err, "failed to spawn build command");
                    return CommandOutcome::Failed(-1);
                }
            };

            let code = status.code().unwrap_or(-1);
            info!(
                cmd = %command,
                exit_code = code,
                success = status.success(),
                "build command exited"
            );

            if status.success() {
                CommandOutcome::Success
            } else {
                CommandOutcome::Failed(code)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shell_command_reports_exit_status() {
        let status = ShellRunner::shell_command("exit 3").status().await.unwrap();
        assert_eq!(status.code(), Some(3));

        let status = ShellRunner::shell_command("true").status().await.unwrap();
        assert!(status.success());
    }
}
