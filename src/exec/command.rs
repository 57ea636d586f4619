// src/exec/command.rs

use std::fmt;

use tracing::warn;

/// Base build command; the target, if any, is appended after a space.
pub const BASE_COMMAND: &str = "make";

/// Default bound on the length of the full command line, in bytes.
pub const DEFAULT_MAX_COMMAND_LEN: usize = 70;

/// Longest build target accepted before truncation, in bytes.
pub const MAX_TARGET_LEN: usize = 64;

/// The shell command run on every qualifying change: `make [target]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommand {
    line: String,
    target: Option<String>,
}

impl BuildCommand {
    /// Build the command line for `target`, bounded to `max_len` bytes.
    ///
    /// An empty target is treated as no target. Truncation never splits a
    /// UTF-8 character.
    pub fn new(target: Option<&str>, max_len: usize) -> Self {
        let target = target
            .filter(|t| !t.is_empty())
            .map(|t| {
                if t.len() > MAX_TARGET_LEN {
                    warn!(max = MAX_TARGET_LEN, "build target too long; truncating");
                }
                truncate_on_char_boundary(t, MAX_TARGET_LEN).to_string()
            });

        let mut line = String::from(BASE_COMMAND);
        if let Some(t) = &target {
            line.push(' ');
            line.push_str(t);
        }
        if line.len() > max_len {
            warn!(max_len, "build command too long; truncating");
            let cut = truncate_on_char_boundary(&line, max_len).len();
            line.truncate(cut);
        }

        Self { line, target }
    }

    pub fn as_str(&self) -> &str {
        &self.line
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }
}

impl Default for BuildCommand {
    fn default() -> Self {
        Self::new(None, DEFAULT_MAX_COMMAND_LEN)
    }
}

impl fmt::Display for BuildCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

fn truncate_on_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
