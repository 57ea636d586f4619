// src/watch/event_handler.rs

//! Turning a raw read buffer into the list of changes that warrant a build.

use tracing::{debug, warn};

use crate::watch::filter::PathFilter;
use crate::watch::path_utils::join_walk_path;
use crate::watch::record::{decode_records, ChangeKind};
use crate::watch::walker::WatchTable;

/// A change that should trigger the build command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    /// Walk path of the changed file (e.g. `./src/main.c`), or the bare
    /// name if the watch is unknown.
    pub path: String,
    pub kind: ChangeKind,
}

/// Decode every record in `buf` and keep, in order, those that should
/// trigger a build.
///
/// A record is dropped when it carries no name, refers to a directory, has
/// an extension the filter rejects, or is not a create/modify/delete.
pub fn qualifying_changes(buf: &[u8], filter: &PathFilter, watches: &WatchTable) -> Vec<Trigger> {
    let mut triggers = Vec::new();

    for event in decode_records(buf) {
        if event.is_overflow() {
            warn!("inotify event queue overflowed; some changes were lost");
            continue;
        }
        if event.is_watch_removed() {
            debug!(
                path = watches.path_of(event.watch).unwrap_or("?"),
                "watch removed by the kernel"
            );
            continue;
        }
        if event.name.is_empty() {
            continue;
        }
        if event.is_dir() {
            debug!(name = %event.name, "skipping directory event");
            continue;
        }
        if !filter.is_eligible(&event.name) {
            debug!(name = %event.name, policy = ?filter.policy(), "skipping non-source file");
            continue;
        }
        let Some(kind) = event.kind() else {
            continue;
        };

        let path = match watches.path_of(event.watch) {
            Some(dir) => join_walk_path(dir, &event.name),
            None => event.name.clone().into_owned(),
        };
        triggers.push(Trigger { path, kind });
    }

    triggers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watch::record::{mask, HEADER_LEN};
    use crate::watch::WatchHandle;

    fn pack(records: &[(i32, u32, &str)]) -> Vec<u8> {
        let mut buf = Vec::new();
        for &(wd, m, name) in records {
            let len = if name.is_empty() { 0 } else { (name.len() + 1).div_ceil(4) * 4 };
            buf.extend_from_slice(&wd.to_ne_bytes());
            buf.extend_from_slice(&m.to_ne_bytes());
            buf.extend_from_slice(&0u32.to_ne_bytes());
            buf.extend_from_slice(&(len as u32).to_ne_bytes());
            let start = buf.len();
            buf.extend_from_slice(name.as_bytes());
            buf.resize(start + len, 0);
        }
        assert!(buf.len() >= HEADER_LEN * records.len());
        buf
    }

    #[test]
    fn unknown_watch_falls_back_to_bare_name() {
        let mut table = WatchTable::new();
        table.insert(WatchHandle(1), "./src".to_string());

        let buf = pack(&[(1, mask::MODIFY, "a.c"), (9, mask::DELETE, "b.h")]);
        let triggers = qualifying_changes(&buf, &PathFilter::default(), &table);

        assert_eq!(
            triggers,
            vec![
                Trigger { path: "./src/a.c".into(), kind: ChangeKind::Modified },
                Trigger { path: "b.h".into(), kind: ChangeKind::Deleted },
            ]
        );
    }

    #[test]
    fn removed_watches_and_unnamed_records_are_skipped() {
        let table = WatchTable::new();
        let buf = pack(&[(1, mask::IGNORED, ""), (1, mask::MODIFY, "")]);
        assert!(qualifying_changes(&buf, &PathFilter::default(), &table).is_empty());
    }
}
