// src/config/settings.rs

//! Effective settings: config file values with CLI overrides applied.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::CliArgs;
use crate::config::loader::load_raw_or_default;
use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;
use crate::exec::BuildCommand;
use crate::types::{CommandFailurePolicy, ExtensionPolicy};
use crate::watch::filter::PathFilter;
use crate::watch::LoopOptions;

/// Everything the watcher needs to start.
#[derive(Debug, Clone)]
pub struct Settings {
    pub root: PathBuf,
    pub recursive: bool,
    pub extension_policy: ExtensionPolicy,
    pub on_failure: CommandFailurePolicy,
    pub debounce: Option<Duration>,
    pub command: BuildCommand,
}

impl Settings {
    /// Load the config file (if any), apply CLI overrides, validate.
    pub fn resolve(args: &CliArgs) -> Result<Self> {
        let explicit = args.config.as_deref().map(Path::new);
        let mut raw = load_raw_or_default(explicit)?;
        apply_overrides(&mut raw, args);
        let cfg = ConfigFile::try_from(raw)?;
        Ok(Self::from(&cfg))
    }

    pub fn loop_options(&self) -> LoopOptions {
        LoopOptions {
            filter: PathFilter::new(self.extension_policy),
            on_failure: self.on_failure,
            debounce: self.debounce,
        }
    }
}

impl From<&ConfigFile> for Settings {
    fn from(cfg: &ConfigFile) -> Self {
        let watch = cfg.watch_section();
        let command = cfg.command_section();
        Self {
            root: watch.root.clone(),
            recursive: watch.recursive,
            extension_policy: watch.extension_policy,
            on_failure: command.on_failure,
            debounce: (watch.debounce_ms > 0).then(|| Duration::from_millis(watch.debounce_ms)),
            command: BuildCommand::new(command.target.as_deref(), command.max_len),
        }
    }
}

/// CLI flags win over the config file.
pub fn apply_overrides(raw: &mut RawConfigFile, args: &CliArgs) {
    if let Some(target) = &args.target {
        raw.command.target = Some(target.clone());
    }
    if let Some(root) = &args.root {
        raw.watch.root = root.clone();
    }
    if let Some(policy) = args.extension_policy {
        raw.watch.extension_policy = policy;
    }
    if let Some(policy) = args.on_failure {
        raw.command.on_failure = policy;
    }
    if args.no_recursive {
        raw.watch.recursive = false;
    }
    if let Some(ms) = args.debounce_ms {
        raw.watch.debounce_ms = ms;
    }
    if let Some(len) = args.max_command_len {
        raw.command.max_len = len;
    }
}
