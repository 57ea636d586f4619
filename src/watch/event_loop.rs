// src/watch/event_loop.rs

//! The read → decode → filter → build loop.
//!
//! The loop is strictly sequential: while the build command runs, nothing
//! is read, so changes made during a build are picked up by the next read.
//! Shutdown requests arrive over a channel and are honoured both while
//! waiting for events and while a build is running.

use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::errors::{CamusError, Result};
use crate::exec::{BuildCommand, CommandOutcome, CommandRunner};
use crate::types::CommandFailurePolicy;
use crate::watch::event_handler::qualifying_changes;
use crate::watch::filter::PathFilter;
use crate::watch::inotify::{EventSource, READ_BUFFER_LEN};
use crate::watch::walker::WatchTable;

/// Policies applied by the loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoopOptions {
    pub filter: PathFilter,
    pub on_failure: CommandFailurePolicy,
    /// Coalescing window. `None` runs one build per qualifying change.
    pub debounce: Option<Duration>,
}

/// Why the loop returned without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// A shutdown request was received.
    Shutdown,
    /// The event source reported end of stream.
    SourceClosed,
}

enum Settled {
    Quiet,
    SourceClosed,
    Shutdown,
}

/// Process-lifetime state: the event source (and with it every watch), the
/// watch table, the runner and the command to run.
pub struct EventLoop<S: EventSource, R: CommandRunner> {
    source: S,
    runner: R,
    command: BuildCommand,
    watches: WatchTable,
    options: LoopOptions,
    buffer: Vec<u8>,
}

impl<S: EventSource, R: CommandRunner> fmt::Debug for EventLoop<S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLoop")
            .field("command", &self.command)
            .field("watches", &self.watches.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<S: EventSource, R: CommandRunner> EventLoop<S, R> {
    pub fn new(
        source: S,
        runner: R,
        command: BuildCommand,
        watches: WatchTable,
        options: LoopOptions,
    ) -> Self {
        Self {
            source,
            runner,
            command,
            watches,
            options,
            buffer: vec![0; READ_BUFFER_LEN],
        }
    }

    /// Run until shutdown, end of stream, or a fatal error.
    pub async fn run(mut self, mut shutdown: mpsc::Receiver<()>) -> Result<LoopExit> {
        info!(
            cmd = %self.command,
            watches = self.watches.len(),
            "event loop started"
        );

        loop {
            let len = tokio::select! {
                Some(()) = shutdown.recv() => return Ok(LoopExit::Shutdown),
                res = self.source.read(&mut self.buffer) => res.map_err(CamusError::Read)?,
            };

            if len == 0 {
                info!("event source closed; stopping");
                return Ok(LoopExit::SourceClosed);
            }

            let triggers = qualifying_changes(&self.buffer[..len], &self.options.filter, &self.watches);
            if triggers.is_empty() {
                continue;
            }

            match self.options.debounce {
                None => {
                    for trigger in triggers {
                        info!(path = %trigger.path, kind = ?trigger.kind, "change detected");
                        if let Some(exit) = self.build(&mut shutdown).await? {
                            return Ok(exit);
                        }
                    }
                }
                Some(window) => {
                    for trigger in &triggers {
                        info!(path = %trigger.path, kind = ?trigger.kind, "change detected");
                    }
                    let settled = self.settle(window, &mut shutdown).await?;
                    if let Settled::Shutdown = settled {
                        return Ok(LoopExit::Shutdown);
                    }
                    if let Some(exit) = self.build(&mut shutdown).await? {
                        return Ok(exit);
                    }
                    if let Settled::SourceClosed = settled {
                        info!("event source closed; stopping");
                        return Ok(LoopExit::SourceClosed);
                    }
                }
            }
        }
    }

    /// Keep reading until `window` passes without a qualifying change.
    async fn settle(
        &mut self,
        window: Duration,
        shutdown: &mut mpsc::Receiver<()>,
    ) -> Result<Settled> {
        let mut deadline = Instant::now() + window;

        loop {
            let read = tokio::select! {
                Some(()) = shutdown.recv() => return Ok(Settled::Shutdown),
                res = tokio::time::timeout_at(deadline, self.source.read(&mut self.buffer)) => res,
            };

            let len = match read {
                Err(_elapsed) => return Ok(Settled::Quiet),
                Ok(res) => res.map_err(CamusError::Read)?,
            };
            if len == 0 {
                return Ok(Settled::SourceClosed);
            }

            let triggers = qualifying_changes(&self.buffer[..len], &self.options.filter, &self.watches);
            if !triggers.is_empty() {
                debug!(count = triggers.len(), "coalescing changes into pending build");
                deadline = Instant::now() + window;
            }
        }
    }

    /// Run the build command once and apply the failure policy.
    async fn build(&mut self, shutdown: &mut mpsc::Receiver<()>) -> Result<Option<LoopExit>> {
        let outcome = tokio::select! {
            Some(()) = shutdown.recv() => {
                warn!(cmd = %self.command, "shutdown requested while build was running");
                return Ok(Some(LoopExit::Shutdown));
            }
            outcome = self.runner.run(&self.command) => outcome,
        };

        match outcome {
            CommandOutcome::Success => {}
            CommandOutcome::Failed(code) => match self.options.on_failure {
                CommandFailurePolicy::Ignore => {
                    warn!(cmd = %self.command, exit_code = code, "build command failed");
                }
                CommandFailurePolicy::Fatal => {
                    error!(cmd = %self.command, exit_code = code, "build command failed");
                    return Err(CamusError::CommandFailed {
                        command: self.command.to_string(),
                        code,
                    });
                }
            },
        }

        Ok(None)
    }
}
