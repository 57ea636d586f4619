#![allow(dead_code)]

use std::path::PathBuf;

use camus::config::{ConfigFile, RawConfigFile};
use camus::types::{CommandFailurePolicy, ExtensionPolicy};
use camus::watch::record::{mask, HEADER_LEN, RECORD_ALIGN};
use camus::watch::{WatchHandle, WatchTable};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.watch.root = root.into();
        self
    }

    pub fn recursive(mut self, val: bool) -> Self {
        self.config.watch.recursive = val;
        self
    }

    pub fn extension_policy(mut self, policy: ExtensionPolicy) -> Self {
        self.config.watch.extension_policy = policy;
        self
    }

    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.config.watch.debounce_ms = ms;
        self
    }

    pub fn target(mut self, target: &str) -> Self {
        self.config.command.target = Some(target.to_string());
        self
    }

    pub fn max_len(mut self, len: usize) -> Self {
        self.config.command.max_len = len;
        self
    }

    pub fn on_failure(mut self, policy: CommandFailurePolicy) -> Self {
        self.config.command.on_failure = policy;
        self
    }

    /// The raw config, for tests that exercise validation.
    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Packs synthetic inotify records into one buffer, laid out the way the
/// kernel returns them from `read(2)`.
#[derive(Debug, Default, Clone)]
pub struct RecordBuilder {
    buf: Vec<u8>,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record. `name` is NUL-terminated and padded to
    /// `RECORD_ALIGN`; an empty name produces a zero-length name field.
    pub fn record(mut self, wd: i32, mask: u32, name: &str) -> Self {
        let name_len = if name.is_empty() {
            0
        } else {
            (name.len() + 1).div_ceil(RECORD_ALIGN) * RECORD_ALIGN
        };

        self.buf.reserve(HEADER_LEN + name_len);
        self.buf.extend_from_slice(&wd.to_ne_bytes());
        self.buf.extend_from_slice(&mask.to_ne_bytes());
        self.buf.extend_from_slice(&0u32.to_ne_bytes());
        self.buf.extend_from_slice(&(name_len as u32).to_ne_bytes());
        self.buf.extend_from_slice(name.as_bytes());
        self.buf.resize(self.buf.len() + name_len - name.len(), 0);
        self
    }

    pub fn created(self, wd: i32, name: &str) -> Self {
        self.record(wd, mask::CREATE, name)
    }

    pub fn modified(self, wd: i32, name: &str) -> Self {
        self.record(wd, mask::MODIFY, name)
    }

    pub fn deleted(self, wd: i32, name: &str) -> Self {
        self.record(wd, mask::DELETE, name)
    }

    pub fn dir_created(self, wd: i32, name: &str) -> Self {
        self.record(wd, mask::CREATE | mask::ISDIR, name)
    }

    pub fn overflow(self) -> Self {
        self.record(-1, mask::Q_OVERFLOW, "")
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

/// Watch table with `.` registered under handle 1, followed by `dirs` under
/// handles 2, 3, ... in order.
pub fn watch_table(dirs: &[&str]) -> WatchTable {
    let mut table = WatchTable::new();
    table.insert(WatchHandle(1), ".".to_string());
    for (i, dir) in dirs.iter().enumerate() {
        table.insert(WatchHandle(i as i32 + 2), dir.to_string());
    }
    table
}
