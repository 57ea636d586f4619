// src/lib.rs

#[cfg(not(target_os = "linux"))]
compile_error!("camus watches directories through inotify and only builds on Linux");

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;
pub mod watch;

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::Settings;
use crate::errors::{CamusError, Result};
use crate::exec::ShellRunner;
use crate::fs::RealFileSystem;
use crate::watch::{register_tree, EventLoop, InotifyChannel, LoopExit};

/// Process-lifetime context: the inotify channel with every registered
/// watch, plus the runner and the command it invokes.
///
/// Dropping it closes the channel, which releases all watches.
#[derive(Debug)]
pub struct Camus {
    event_loop: EventLoop<InotifyChannel, ShellRunner>,
}

impl Camus {
    /// Open the notification channel and register the watch tree.
    pub fn start(settings: &Settings) -> Result<Self> {
        let mut channel = InotifyChannel::open().map_err(CamusError::Init)?;
        let watches = register_tree(
            &RealFileSystem,
            &mut channel,
            &settings.root,
            settings.recursive,
        )?;
        info!(
            root = %settings.root.display(),
            directories = watches.len(),
            recursive = settings.recursive,
            "watch tree registered"
        );

        let event_loop = EventLoop::new(
            channel,
            ShellRunner::new(),
            settings.command.clone(),
            watches,
            settings.loop_options(),
        );
        Ok(Self { event_loop })
    }

    /// Run until Ctrl-C, end of stream, or a fatal error.
    pub async fn run(self, shutdown: mpsc::Receiver<()>) -> Result<LoopExit> {
        self.event_loop.run(shutdown).await
    }
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - Ctrl-C handling (installed first, so an interrupt during startup is a
///   clean shutdown)
/// - config loading and CLI overrides
/// - inotify setup and the startup walk
/// - the event loop
pub async fn run(args: CliArgs) -> Result<()> {
    let shutdown = listen_for_interrupt()?;

    match run_until_shutdown(args, shutdown).await? {
        LoopExit::Shutdown => println!("\nshutting down camus..."),
        LoopExit::SourceClosed => debug!("event source closed"),
    }

    Ok(())
}

/// Start up and run the event loop; a message on `shutdown` ends either.
///
/// Startup (config loading and the tree walk) runs on the blocking pool so
/// a shutdown request is honoured even while a filesystem call is stuck.
pub async fn run_until_shutdown(
    args: CliArgs,
    mut shutdown: mpsc::Receiver<()>,
) -> Result<LoopExit> {
    let startup = tokio::task::spawn_blocking(move || {
        let settings = Settings::resolve(&args)?;
        debug!(?settings, "effective settings");
        Camus::start(&settings)
    });

    let camus = tokio::select! {
        Some(()) = shutdown.recv() => {
            info!("shutdown requested during startup");
            return Ok(LoopExit::Shutdown);
        }
        joined = startup => joined.map_err(anyhow::Error::from)??,
    };

    camus.run(shutdown).await
}

/// SIGINT → shutdown request.
fn listen_for_interrupt() -> Result<mpsc::Receiver<()>> {
    // Registering here replaces the default disposition right away.
    let mut sigint = signal(SignalKind::interrupt())?;
    let (tx, rx) = mpsc::channel::<()>(1);
    tokio::spawn(async move {
        if sigint.recv().await.is_some() {
            let _ = tx.send(()).await;
        }
    });
    Ok(rx)
}
