// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::exec::DEFAULT_MAX_COMMAND_LEN;
use crate::types::{CommandFailurePolicy, ExtensionPolicy};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [watch]
/// root = "."
/// recursive = true
/// extension_policy = "ignore"
/// debounce_ms = 0
///
/// [command]
/// target = "all"
/// max_len = 70
/// on_failure = "ignore"
/// ```
///
/// All sections are optional and have defaults matching the behaviour
/// without a config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub command: CommandSection,
}

/// Validated configuration. Only constructed through
/// `ConfigFile::try_from(RawConfigFile)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    watch: WatchSection,
    command: CommandSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(watch: WatchSection, command: CommandSection) -> Self {
        Self { watch, command }
    }

    pub fn watch_section(&self) -> &WatchSection {
        &self.watch
    }

    pub fn command_section(&self) -> &CommandSection {
        &self.command
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    /// Directory to watch, relative to the working directory.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Watch every subdirectory (`true`) or only `root` (`false`).
    #[serde(default = "default_recursive")]
    pub recursive: bool,

    /// `"ignore"` (default) or `"allow"`.
    #[serde(default)]
    pub extension_policy: ExtensionPolicy,

    /// Coalescing window in milliseconds; `0` builds on every change.
    #[serde(default)]
    pub debounce_ms: u64,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_recursive() -> bool {
    true
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            root: default_root(),
            recursive: default_recursive(),
            extension_policy: ExtensionPolicy::default(),
            debounce_ms: 0,
        }
    }
}

/// `[command]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandSection {
    /// Default build target; `-t` overrides it.
    #[serde(default)]
    pub target: Option<String>,

    /// Bound on the full command line, in bytes.
    #[serde(default = "default_max_len")]
    pub max_len: usize,

    /// `"ignore"` (default) or `"fatal"`.
    #[serde(default)]
    pub on_failure: CommandFailurePolicy,
}

fn default_max_len() -> usize {
    DEFAULT_MAX_COMMAND_LEN
}

impl Default for CommandSection {
    fn default() -> Self {
        Self {
            target: None,
            max_len: default_max_len(),
            on_failure: CommandFailurePolicy::default(),
        }
    }
}
