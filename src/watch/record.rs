// src/watch/record.rs

//! Decoding of the packed event records returned by an inotify read.
//!
//! One read may return several records back-to-back. Each record is a
//! fixed 16-byte header followed by a NUL-padded name:
//!
//! ```text
//! | wd: i32 | mask: u32 | cookie: u32 | len: u32 | name: [u8; len] |
//! ```
//!
//! The next record starts right after the name, so the decoder keeps a
//! running offset instead of reading from the start of the buffer.

use std::borrow::Cow;

use tracing::warn;

/// Size of the fixed record header (`struct inotify_event` without name).
pub const HEADER_LEN: usize = 16;

/// Records start on this alignment.
pub const RECORD_ALIGN: usize = 4;

/// Event mask bits used by the watcher.
pub mod mask {
    pub const CREATE: u32 = libc::IN_CREATE;
    pub const MODIFY: u32 = libc::IN_MODIFY;
    pub const DELETE: u32 = libc::IN_DELETE;
    pub const ISDIR: u32 = libc::IN_ISDIR;
    pub const IGNORED: u32 = libc::IN_IGNORED;
    pub const Q_OVERFLOW: u32 = libc::IN_Q_OVERFLOW;
    pub const DONT_FOLLOW: u32 = libc::IN_DONT_FOLLOW;

    /// Mask requested for every directory watch.
    pub const WATCH: u32 = CREATE | DELETE | MODIFY | DONT_FOLLOW;
}

/// Watch descriptor issued by the kernel for one directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WatchHandle(pub i32);

/// Kind of change carried by a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Deleted,
}

impl ChangeKind {
    /// Creation wins over modification, modification over deletion.
    pub fn from_mask(mask: u32) -> Option<Self> {
        if mask & mask::CREATE != 0 {
            Some(ChangeKind::Created)
        } else if mask & mask::MODIFY != 0 {
            Some(ChangeKind::Modified)
        } else if mask & mask::DELETE != 0 {
            Some(ChangeKind::Deleted)
        } else {
            None
        }
    }
}

/// One decoded record, borrowing its name from the read buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent<'a> {
    pub watch: WatchHandle,
    pub mask: u32,
    /// Affected entry, relative to the watched directory. Empty for events
    /// on the watched directory itself.
    pub name: Cow<'a, str>,
}

impl ChangeEvent<'_> {
    pub fn kind(&self) -> Option<ChangeKind> {
        ChangeKind::from_mask(self.mask)
    }

    pub fn is_dir(&self) -> bool {
        self.mask & mask::ISDIR != 0
    }

    pub fn is_overflow(&self) -> bool {
        self.mask & mask::Q_OVERFLOW != 0
    }

    /// The kernel removed this watch (directory deleted or unmounted).
    pub fn is_watch_removed(&self) -> bool {
        self.mask & mask::IGNORED != 0
    }
}

/// Iterate over every record in `buf`.
pub fn decode_records(buf: &[u8]) -> Records<'_> {
    Records { buf, offset: 0 }
}

/// Iterator returned by [`decode_records`].
#[derive(Debug, Clone)]
pub struct Records<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> Iterator for Records<'a> {
    type Item = ChangeEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.buf[self.offset..];
        if rest.is_empty() {
            return None;
        }
        if rest.len() < HEADER_LEN {
            warn!(
                offset = self.offset,
                remaining = rest.len(),
                "truncated event header; dropping rest of buffer"
            );
            self.offset = self.buf.len();
            return None;
        }

        let wd = i32::from_ne_bytes(word(rest, 0));
        let mask = u32::from_ne_bytes(word(rest, 4));
        let name_len = u32::from_ne_bytes(word(rest, 12)) as usize;

        let Some(name_bytes) = rest.get(HEADER_LEN..HEADER_LEN + name_len) else {
            warn!(
                offset = self.offset,
                name_len,
                remaining = rest.len(),
                "truncated event name; dropping rest of buffer"
            );
            self.offset = self.buf.len();
            return None;
        };

        let end = name_bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(name_bytes.len());
        let name = String::from_utf8_lossy(&name_bytes[..end]);

        let record_len = HEADER_LEN + align_up(name_len, RECORD_ALIGN);
        self.offset = (self.offset + record_len).min(self.buf.len());

        Some(ChangeEvent {
            watch: WatchHandle(wd),
            mask,
            name,
        })
    }
}

fn word(bytes: &[u8], at: usize) -> [u8; 4] {
    [bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]
}

pub(crate) fn align_up(len: usize, align: usize) -> usize {
    len.div_ceil(align) * align
}
