use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use camus::exec::{BuildCommand, CommandOutcome, CommandRunner};

/// A fake runner that:
/// - records every command line it was asked to run
/// - replies with scripted outcomes, then `Success`
/// - optionally takes a while, to exercise shutdown during a build.
#[derive(Clone, Default)]
pub struct RecordingRunner {
    executed: Arc<Mutex<Vec<String>>>,
    outcomes: Arc<Mutex<VecDeque<CommandOutcome>>>,
    delay: Option<Duration>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome for the next unanswered run.
    pub fn with_outcome(self, outcome: CommandOutcome) -> Self {
        self.outcomes.lock().unwrap().push_back(outcome);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Shared handle to the recorded command lines.
    pub fn executed(&self) -> Arc<Mutex<Vec<String>>> {
        self.executed.clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run<'a>(
        &'a mut self,
        command: &'a BuildCommand,
    ) -> Pin<Box<dyn Future<Output = CommandOutcome> + Send + 'a>> {
        Box::pin(async move {
            self.executed.lock().unwrap().push(command.as_str().to_string());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(CommandOutcome::Success)
        })
    }
}
