// src/watch/inotify.rs

//! Thin wrapper around the Linux inotify API.
//!
//! The descriptor is opened non-blocking and registered with the Tokio
//! reactor, so a pending read can be abandoned (e.g. on Ctrl-C) without
//! leaving the process stuck in a syscall. Closing the descriptor releases
//! every watch registered on it.

use std::ffi::CString;
use std::future::Future;
use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::pin::Pin;

use tokio::io::unix::AsyncFd;
use tokio::io::Interest;

use crate::watch::record::{mask, WatchHandle, HEADER_LEN};

/// Buffer size for one read: room for 1024 records with short names.
pub const READ_BUFFER_LEN: usize = 1024 * (HEADER_LEN + 16);

/// Anything the tree walker can register directory watches with.
pub trait WatchRegistrar {
    fn add_watch(&mut self, dir: &Path) -> io::Result<WatchHandle>;
}

/// Source of raw event buffers for the event loop.
///
/// A read that returns `Ok(0)` means the source is exhausted; the real
/// inotify channel never does that.
pub trait EventSource: Send {
    fn read<'a>(
        &'a mut self,
        buf: &'a mut [u8],
    ) -> Pin<Box<dyn Future<Output = io::Result<usize>> + Send + 'a>>;
}

/// An open inotify instance.
#[derive(Debug)]
pub struct InotifyChannel {
    fd: AsyncFd<OwnedFd>,
}

impl InotifyChannel {
    /// Open a new notification channel.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn open() -> io::Result<Self> {
        let raw = unsafe { libc::inotify_init1(libc::IN_NONBLOCK | libc::IN_CLOEXEC) };
        if raw < 0 {
            return Err(io::Error::last_os_error());
        }
        // SAFETY: `raw` is a freshly created descriptor that nothing else owns.
        let owned = unsafe { OwnedFd::from_raw_fd(raw) };
        // SAFETY: the `OwnedFd` moves into the `AsyncFd` and stays open,
        // referring to the same inotify instance, until it is dropped.
        let fd = unsafe { AsyncFd::register_with_interest(owned, Interest::READABLE)? };
        Ok(Self { fd })
    }

    /// Watch `dir` for entries being created, deleted or modified.
    pub fn watch_dir(&self, dir: &Path) -> io::Result<WatchHandle> {
        let c_path = CString::new(dir.as_os_str().as_bytes())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let wd = unsafe {
            libc::inotify_add_watch(self.fd.as_raw_fd(), c_path.as_ptr(), mask::WATCH)
        };
        if wd < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(WatchHandle(wd))
    }

    /// Wait until records are available and copy them into `buf`.
    pub async fn read_events(&self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let mut guard = self.fd.readable().await?;
            match guard.try_io(|inner| {
                let res = unsafe {
                    libc::read(
                        inner.as_raw_fd(),
                        buf.as_mut_ptr() as *mut libc::c_void,
                        buf.len(),
                    )
                };
                if res < 0 {
                    Err(io::Error::last_os_error())
                } else {
                    Ok(res as usize)
                }
            }) {
                Ok(Ok(len)) => return Ok(len),
                Ok(Err(e)) if e.kind() == io::ErrorKind::Interrupted => continue,
                Ok(Err(e)) => return Err(e),
                // Spurious readiness: `try_io` already cleared it.
                Err(_would_block) => continue,
            }
        }
    }
}

impl WatchRegistrar for InotifyChannel {
    fn add_watch(&mut self, dir: &Path) -> io::Result<WatchHandle> {
        self.watch_dir(dir)
    }
}

impl EventSource for InotifyChannel {
    fn read<'a>(
        &'a mut self,
        buf: &'a mut [u8],
    ) -> Pin<Box<dyn Future<Output = io::Result<usize>> + Send + 'a>> {
        Box::pin(self.read_events(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn watching_a_missing_directory_fails() {
        let channel = InotifyChannel::open().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(channel.watch_dir(&missing).is_err());
        assert!(channel.watch_dir(dir.path()).is_ok());
    }

    #[tokio::test]
    async fn reads_records_for_created_files() {
        let mut channel = InotifyChannel::open().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let wd = channel.watch_dir(dir.path()).unwrap();

        std::fs::File::create(dir.path().join("one.c")).unwrap();

        let mut buf = vec![0u8; READ_BUFFER_LEN];
        let n = tokio::time::timeout(std::time::Duration::from_secs(5), channel.read(&mut buf))
            .await
            .unwrap()
            .unwrap();
        let events: Vec<_> = crate::watch::record::decode_records(&buf[..n]).collect();
        assert!(events.iter().any(|e| e.watch == wd && e.name == "one.c"));
    }
}
