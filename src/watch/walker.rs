// src/watch/walker.rs

//! One-time registration of directory watches at startup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::errors::{CamusError, Result};
use crate::fs::FileSystem;
use crate::watch::filter::is_ignored_directory;
use crate::watch::inotify::WatchRegistrar;
use crate::watch::path_utils::walk_path;
use crate::watch::record::WatchHandle;

/// Directories with an active watch, keyed by the kernel's handle.
#[derive(Debug, Clone, Default)]
pub struct WatchTable {
    dirs: HashMap<WatchHandle, String>,
    order: Vec<WatchHandle>,
}

impl WatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, handle: WatchHandle, walk_path: String) {
        // inotify hands back the existing descriptor for a directory that is
        // already watched (e.g. reached twice through a bind mount).
        if self.dirs.insert(handle, walk_path).is_none() {
            self.order.push(handle);
        }
    }

    /// Walk path (`.`, `./src`, ...) of the directory behind `handle`.
    pub fn path_of(&self, handle: WatchHandle) -> Option<&str> {
        self.dirs.get(&handle).map(String::as_str)
    }

    /// Walk paths in registration order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.order.iter().filter_map(|h| self.path_of(*h))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Register a watch on `root` and, when `recursive` is set, on every
/// directory beneath it.
///
/// The traversal is depth-first, visits entries in name order and never
/// follows symbolic links. A directory whose walk path is ignored is skipped
/// together with everything below it. A directory that cannot be watched is
/// reported and skipped, but its children are still visited.
pub fn register_tree(
    fs: &dyn FileSystem,
    registrar: &mut dyn WatchRegistrar,
    root: &Path,
    recursive: bool,
) -> Result<WatchTable> {
    if !fs.is_dir(root) {
        return Err(CamusError::Traversal {
            path: root.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    let mut table = WatchTable::new();

    if !recursive {
        register_one(registrar, root, ".", &mut table);
        return finish(root, table);
    }

    let mut stack: Vec<PathBuf> = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let key = walk_path(root, &dir);
        if is_ignored_directory(&key) {
            debug!(path = %key, "ignored directory; not descending");
            continue;
        }

        register_one(registrar, &dir, &key, &mut table);

        let mut children = match fs.read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if dir == root => {
                return Err(CamusError::Traversal {
                    path: root.to_path_buf(),
                    reason: format!("{err:#}"),
                });
            }
            Err(err) => {
                warn!(path = %key, error = ?err, "cannot list directory; skipping subtree");
                continue;
            }
        };

        children.retain(|p| fs.is_dir(p));
        children.sort();
        // Reverse so the first name in order is popped first.
        stack.extend(children.into_iter().rev());
    }

    finish(root, table)
}

fn register_one(registrar: &mut dyn WatchRegistrar, dir: &Path, key: &str, table: &mut WatchTable) {
    match registrar.add_watch(dir) {
        Ok(handle) => {
            info!(path = %key, "watching directory");
            table.insert(handle, key.to_string());
        }
        Err(err) => {
            warn!(path = %key, error = %err, "failed to add watch; skipping directory");
        }
    }
}

fn finish(root: &Path, table: WatchTable) -> Result<WatchTable> {
    if table.is_empty() {
        return Err(CamusError::Traversal {
            path: root.to_path_buf(),
            reason: "no directory could be watched".to_string(),
        });
    }
    Ok(table)
}
