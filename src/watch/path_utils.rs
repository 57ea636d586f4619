// src/watch/path_utils.rs

//! Utility functions for path handling in the watcher.

use std::path::Path;

/// Walk path of `dir` relative to `root`: `.` for the root itself,
/// `./a/b` for anything beneath it, always with forward slashes.
///
/// This is the spelling the ignored-directory list is written in. Paths
/// outside `root` are returned unchanged.
pub fn walk_path(root: &Path, dir: &Path) -> String {
    let rel = match dir.strip_prefix(root) {
        Ok(rel) => rel,
        Err(_) => return dir.to_string_lossy().replace('\\', "/"),
    };
    if rel.as_os_str().is_empty() {
        return ".".to_string();
    }
    let s = rel.to_string_lossy().replace('\\', "/");
    format!("./{s}")
}

/// Walk path of the entry `name` inside the directory with walk path `dir`.
pub fn join_walk_path(dir: &str, name: &str) -> String {
    if name.is_empty() {
        dir.to_string()
    } else {
        format!("{}/{}", dir.trim_end_matches('/'), name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn walk_paths_carry_a_leading_dot() {
        let root = Path::new(".");
        assert_eq!(walk_path(root, Path::new(".")), ".");
        assert_eq!(walk_path(root, Path::new("./bin")), "./bin");
        assert_eq!(walk_path(root, &PathBuf::from(".").join("src").join("x")), "./src/x");
    }

    #[test]
    fn absolute_roots_are_relativized() {
        let root = Path::new("/tmp/project");
        assert_eq!(walk_path(root, Path::new("/tmp/project")), ".");
        assert_eq!(walk_path(root, Path::new("/tmp/project/.git")), "./.git");
        assert_eq!(walk_path(root, Path::new("/elsewhere")), "/elsewhere");
    }

    #[test]
    fn join_handles_root_and_empty_names() {
        assert_eq!(join_walk_path(".", "main.c"), "./main.c");
        assert_eq!(join_walk_path("./src", "util.c"), "./src/util.c");
        assert_eq!(join_walk_path("./src", ""), "./src");
    }
}
