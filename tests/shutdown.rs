// tests/shutdown.rs

mod common;

use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::time::Duration;

use camus::cli::parse_from;
use camus::run_until_shutdown;
use camus::watch::LoopExit;
use common::{init_tracing, with_timeout};
use tokio::sync::mpsc;

#[tokio::test]
async fn shutdown_while_startup_is_blocked() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let fifo = dir.path().join("Camus.toml");
    let c_path = CString::new(fifo.as_os_str().as_bytes()).unwrap();
    assert_eq!(unsafe { libc::mkfifo(c_path.as_ptr(), 0o600) }, 0);

    // Reading the config blocks until a writer opens the FIFO.
    let args = parse_from([
        "camus",
        "--config",
        fifo.to_str().unwrap(),
        "--root",
        dir.path().to_str().unwrap(),
    ])
    .unwrap();

    let (tx, rx) = mpsc::channel(1);
    let handle = tokio::spawn(run_until_shutdown(args, rx));

    tokio::time::sleep(Duration::from_millis(100)).await;
    tx.send(()).await.unwrap();

    let exit = with_timeout(handle).await.unwrap().unwrap();
    assert_eq!(exit, LoopExit::Shutdown);

    // Let the abandoned startup finish so the runtime can shut down.
    std::fs::write(&fifo, "").unwrap();
}

#[tokio::test]
async fn shutdown_while_watching() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("src")).unwrap();
    let config = dir.path().join("watch.toml");
    std::fs::write(&config, "[watch]\nrecursive = true\n").unwrap();

    let args = parse_from([
        "camus",
        "--config",
        config.to_str().unwrap(),
        "--root",
        dir.path().to_str().unwrap(),
    ])
    .unwrap();

    let (tx, rx) = mpsc::channel(1);
    let handle = tokio::spawn(run_until_shutdown(args, rx));

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!handle.is_finished());
    tx.send(()).await.unwrap();

    let exit = with_timeout(handle).await.unwrap().unwrap();
    assert_eq!(exit, LoopExit::Shutdown);
}

#[tokio::test]
async fn startup_errors_still_surface() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let args = parse_from([
        "camus",
        "--config",
        dir.path().join("absent.toml").to_str().unwrap(),
    ])
    .unwrap();

    let (_tx, rx) = mpsc::channel(1);
    let result = with_timeout(run_until_shutdown(args, rx)).await;

    assert!(matches!(result, Err(camus::errors::CamusError::IoError(_))), "got {result:?}");
}
