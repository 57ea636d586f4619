// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Deciding which files and directories matter (`filter`).
//! - Talking to inotify (`inotify`) and decoding its records (`record`).
//! - Registering a watch on every relevant directory at startup (`walker`).
//! - Running the read → filter → build loop (`event_loop`).
//!
//! Directories created after startup are not watched.

pub mod event_handler;
pub mod event_loop;
pub mod filter;
pub mod inotify;
pub mod path_utils;
pub mod record;
pub mod walker;

pub use event_handler::{qualifying_changes, Trigger};
pub use event_loop::{EventLoop, LoopExit, LoopOptions};
pub use filter::{
    is_allowed_extension, is_ignored_directory, is_ignored_extension, PathFilter,
};
pub use inotify::{EventSource, InotifyChannel, WatchRegistrar};
pub use record::{decode_records, ChangeEvent, ChangeKind, WatchHandle};
pub use walker::{register_tree, WatchTable};
