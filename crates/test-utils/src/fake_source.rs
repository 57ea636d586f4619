use std::collections::VecDeque;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::time::Duration;

use camus::watch::EventSource;

enum Step {
    Data(Vec<u8>),
    Fail(io::ErrorKind),
    Pause(Duration),
}

/// A scripted event source:
/// - hands out queued buffers one read at a time
/// - can inject read errors and pauses between reads
/// - once drained, either reports end of stream (`Ok(0)`) or blocks forever
///   when built with [`FakeEventSource::never_closing`].
pub struct FakeEventSource {
    steps: VecDeque<Step>,
    close_when_drained: bool,
}

impl FakeEventSource {
    pub fn new() -> Self {
        Self {
            steps: VecDeque::new(),
            close_when_drained: true,
        }
    }

    /// Pend forever after the scripted reads instead of closing.
    pub fn never_closing() -> Self {
        Self {
            steps: VecDeque::new(),
            close_when_drained: false,
        }
    }

    pub fn push(mut self, buf: Vec<u8>) -> Self {
        self.steps.push_back(Step::Data(buf));
        self
    }

    pub fn fail(mut self, kind: io::ErrorKind) -> Self {
        self.steps.push_back(Step::Fail(kind));
        self
    }

    /// Sleep before the next scripted step.
    pub fn pause(mut self, d: Duration) -> Self {
        self.steps.push_back(Step::Pause(d));
        self
    }
}

impl Default for FakeEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for FakeEventSource {
    fn read<'a>(
        &'a mut self,
        buf: &'a mut [u8],
    ) -> Pin<Box<dyn Future<Output = io::Result<usize>> + Send + 'a>> {
        Box::pin(async move {
            loop {
                match self.steps.pop_front() {
                    Some(Step::Pause(d)) => tokio::time::sleep(d).await,
                    Some(Step::Data(data)) => {
                        let n = data.len().min(buf.len());
                        buf[..n].copy_from_slice(&data[..n]);
                        return Ok(n);
                    }
                    Some(Step::Fail(kind)) => return Err(io::Error::from(kind)),
                    None if self.close_when_drained => return Ok(0),
                    None => std::future::pending::<()>().await,
                }
            }
        })
    }
}
