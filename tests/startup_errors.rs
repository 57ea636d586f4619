// tests/startup_errors.rs

mod common;

use std::fs;
use std::io::Write;
use std::path::Path;

use camus::config::{load_and_validate, Settings};
use camus::errors::CamusError;
use camus::fs::mock::MockFileSystem;
use camus::fs::RealFileSystem;
use camus::watch::{register_tree, InotifyChannel};
use camus::Camus;
use camus_test_utils::builders::ConfigFileBuilder;
use common::init_tracing;
use tempfile::NamedTempFile;

#[test]
fn unknown_config_key_is_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[watch]
root = "."
follow_symlinks = true
"#
    )
    .unwrap();

    match load_and_validate(file.path()) {
        Err(CamusError::TomlError(e)) => assert!(e.to_string().contains("follow_symlinks")),
        other => panic!("Expected TomlError, got: {other:?}"),
    }
}

#[test]
fn invalid_policy_value_is_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[command]
on_failure = "retry"
"#
    )
    .unwrap();

    assert!(matches!(
        load_and_validate(file.path()),
        Err(CamusError::TomlError(_))
    ));
}

#[test]
fn short_max_len_is_a_config_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[command]
max_len = 3
"#
    )
    .unwrap();

    match load_and_validate(file.path()) {
        Err(CamusError::ConfigError(msg)) => assert!(msg.contains("max_len")),
        other => panic!("Expected ConfigError, got: {other:?}"),
    }
}

#[test]
fn missing_explicit_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("Camus.toml");
    let args = camus::cli::parse_from(["camus", "--config", missing.to_str().unwrap()]).unwrap();

    let err = Settings::resolve(&args).unwrap_err();
    assert!(matches!(err, CamusError::IoError(_)), "got {err:?}");
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn full_config_file_round_trips_into_settings() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[watch]
root = "project"
recursive = false
extension_policy = "allow"
debounce_ms = 250

[command]
target = "all"
max_len = 8
on_failure = "fatal"
"#
    )
    .unwrap();

    let cfg = load_and_validate(file.path()).unwrap();
    let settings = Settings::from(&cfg);

    assert_eq!(settings.root, Path::new("project"));
    assert!(!settings.recursive);
    assert_eq!(settings.debounce, Some(std::time::Duration::from_millis(250)));
    assert_eq!(settings.command.as_str(), "make all");
    assert_eq!(settings.loop_options().filter.policy(), camus::types::ExtensionPolicy::Allow);

    let builder_cfg = ConfigFileBuilder::new()
        .root("project")
        .recursive(false)
        .extension_policy(camus::types::ExtensionPolicy::Allow)
        .debounce_ms(250)
        .target("all")
        .max_len(8)
        .on_failure(camus::types::CommandFailurePolicy::Fatal)
        .build();
    assert_eq!(Settings::from(&builder_cfg).command, settings.command);
}

#[tokio::test]
async fn missing_root_fails_to_start() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let cfg = ConfigFileBuilder::new()
        .root(dir.path().join("does-not-exist"))
        .build();

    match Camus::start(&Settings::from(&cfg)) {
        Err(CamusError::Traversal { path, .. }) => assert!(path.ends_with("does-not-exist")),
        other => panic!("Expected Traversal error, got: {other:?}"),
    }
}

#[tokio::test]
async fn real_tree_skips_ignored_and_symlinked_directories() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join(".git/objects")).unwrap();
    fs::create_dir_all(root.join("bin/sub")).unwrap();
    fs::create_dir_all(root.join("src/nested")).unwrap();
    std::os::unix::fs::symlink(root.join("src"), root.join("alias")).unwrap();

    let mut channel = InotifyChannel::open().unwrap();
    let table = register_tree(&RealFileSystem, &mut channel, root, true).unwrap();

    assert_eq!(
        table.paths().collect::<Vec<_>>(),
        vec![".", "./src", "./src/nested"]
    );
}

#[test]
fn non_recursive_walk_watches_only_the_root() {
    let fs = MockFileSystem::new();
    fs.add_dir("./src/nested");

    let mut registrar = RecordingRegistrar::default();
    let table = register_tree(&fs, &mut registrar, Path::new("."), false).unwrap();

    assert_eq!(table.paths().collect::<Vec<_>>(), vec!["."]);
    assert_eq!(registrar.calls, 1);
}

#[derive(Default)]
struct RecordingRegistrar {
    calls: i32,
}

impl camus::watch::WatchRegistrar for RecordingRegistrar {
    fn add_watch(&mut self, _dir: &Path) -> std::io::Result<camus::watch::WatchHandle> {
        self.calls += 1;
        Ok(camus::watch::WatchHandle(self.calls))
    }
}
