#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

pub use camus_test_utils::{init_tracing, with_timeout};

/// Poll `executed` until it holds at least `n` entries.
pub async fn wait_for_builds(executed: &Arc<Mutex<Vec<String>>>, n: usize) {
    with_timeout(async {
        while executed.lock().unwrap().len() < n {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
}
