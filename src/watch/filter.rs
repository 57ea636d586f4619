// src/watch/filter.rs

//! Pure predicates deciding which changed files and which directories matter.
//!
//! The sets below are fixed at compile time. Extension matching is
//! case-sensitive and looks only at the text after the last `.`; directory
//! matching is an exact comparison against the walk path (`./bin`, not
//! `bin` or `./bin/`).

use crate::types::ExtensionPolicy;

/// Extensions of files that never trigger a build under the ignore-list
/// policy.
pub const IGNORED_FILE_EXTS: &[&str] = &[
    "git",
    "md",
    "json", "yml", "yaml",
    "txt", "doc", "docx",
    "xls", "xlsx",
    "ppt", "pptx",
];

/// Walk paths of directories that are neither watched nor descended into.
pub const IGNORED_DIRS: &[&str] = &["./.git", "./.github", "./bin"];

/// Extensions that trigger a build under the allow-list policy.
pub const ALLOWED_FILE_EXTS: &[&str] = &["c", "h"];

/// Return the extension of `name`: the text after its last `.`.
///
/// Names without a `.` and dotfiles such as `.gitignore` (whose only `.` is
/// the first character) have no extension.
pub fn extension_of(name: &str) -> Option<&str> {
    match name.rfind('.') {
        None | Some(0) => None,
        Some(dot) => Some(&name[dot + 1..]),
    }
}

/// True if `name` carries one of [`IGNORED_FILE_EXTS`].
pub fn is_ignored_extension(name: &str) -> bool {
    extension_of(name).is_some_and(|ext| IGNORED_FILE_EXTS.contains(&ext))
}

/// True only if `name` carries one of [`ALLOWED_FILE_EXTS`].
pub fn is_allowed_extension(name: &str) -> bool {
    extension_of(name).is_some_and(|ext| ALLOWED_FILE_EXTS.contains(&ext))
}

/// Exact match against [`IGNORED_DIRS`]. Descendants are not matched; the
/// walker excludes them by never descending into an ignored directory.
pub fn is_ignored_directory(path: &str) -> bool {
    IGNORED_DIRS.contains(&path)
}

/// Extension filter with the policy selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PathFilter {
    policy: ExtensionPolicy,
}

impl PathFilter {
    pub fn new(policy: ExtensionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ExtensionPolicy {
        self.policy
    }

    /// Whether a change to the file `name` should trigger a build.
    pub fn is_eligible(&self, name: &str) -> bool {
        match self.policy {
            ExtensionPolicy::Ignore => !is_ignored_extension(name),
            ExtensionPolicy::Allow => is_allowed_extension(name),
        }
    }
}
