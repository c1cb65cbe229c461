//! The polling primitive behind every page-object wait.
use fantoccini::error::CmdError;
use std::future::Future;
use std::time::{Duration, Instant};

const DEFAULT_POLLING_INTERVAL: Duration = Duration::from_millis(500);

/// Re-checks a condition until it holds or a timeout elapses.
#[derive(Clone, Copy, Debug)]
pub struct Poll {
    timeout: Duration,
    polling_interval: Duration,
}

impl Poll {
    /// Wait for at most `timeout`, checking every 500ms.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            polling_interval: DEFAULT_POLLING_INTERVAL,
        }
    }

    /// Check every `interval` instead.
    pub fn every(mut self, interval: Duration) -> Self {
        self.polling_interval = interval;
        self
    }

    /// The configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The configured polling interval.
    pub fn interval(&self) -> Duration {
        self.polling_interval
    }

    /// Run `condition` until it yields `Some`.
    ///
    /// An `Err` from the condition aborts the wait immediately. If the timeout elapses first,
    /// [`CmdError::WaitTimeout`] is returned. The condition is always checked at least once.
    pub async fn until<F, FF, R>(&self, mut condition: F) -> Result<R, CmdError>
    where
        F: FnMut() -> FF,
        FF: Future<Output = Result<Option<R>, CmdError>>,
    {
        let start = Instant::now();

        loop {
            if let Some(result) = condition().await? {
                return Ok(result);
            }

            if start.elapsed() >= self.timeout {
                tracing::debug!(timeout = ?self.timeout, "wait timed out");
                return Err(CmdError::WaitTimeout);
            }

            tokio::time::sleep(self.polling_interval).await;
        }
    }
}
