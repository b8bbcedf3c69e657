use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::clock::ClockExt;
use crate::error::Error;

use crate::consts::{
    DEFAULT_REQUEST_QUOTA,
    DEFAULT_WINDOW,
    DEFAULT_THROTTLE_STEP
};

/// Sliding window of request timestamps
///
/// Keeps the UNIX timestamps of every request issued during the trailing
/// window (oldest first) and blocks new requests once the quota is reached,
/// until the oldest timestamp ages out. Owned by a single client instance;
/// the optional on-disk snapshot carries the window across restarts but
/// offers no locking, so cross-process sharing is not supported
pub struct RequestWindow {
    times: VecDeque<f64>,
    quota: usize,
    window: Duration,
    throttle_step: Duration,
    wait_timeout: Option<Duration>,
    snapshot: Option<PathBuf>,
    clock: Arc<dyn ClockExt>
}

impl RequestWindow {
    pub fn new(clock: Arc<dyn ClockExt>) -> Self {
        Self {
            times: VecDeque::new(),
            quota: DEFAULT_REQUEST_QUOTA,
            window: DEFAULT_WINDOW,
            throttle_step: DEFAULT_THROTTLE_STEP,
            wait_timeout: None,
            snapshot: None,
            clock
        }
    }

    pub fn with_quota(mut self, quota: usize, window: Duration) -> Self {
        self.quota = quota;
        self.window = window;

        self
    }

    pub fn with_throttle_step(mut self, step: Duration) -> Self {
        self.throttle_step = step;

        self
    }

    /// Bound the throttled wait
    ///
    /// By default a request on a full window blocks until capacity frees
    /// up. With a bound set, [`RequestWindow::admit`] instead fails with
    /// [`Error::ThrottleTimeout`] once the bound elapses
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = Some(timeout);

        self
    }

    /// Mirror the window to a file, restoring it first
    ///
    /// The snapshot is a JSON array of UNIX timestamps, rewritten in full
    /// after every recorded request. A missing or corrupt file restores
    /// an empty window and is never fatal
    pub fn with_snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        self.times = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<Vec<f64>>(&bytes) {
                Ok(times) => VecDeque::from(times),

                Err(err) => {
                    tracing::warn!(?path, "Corrupt request window snapshot, starting empty: {err}");

                    VecDeque::new()
                }
            },

            Err(err) => {
                tracing::debug!(?path, "No request window snapshot: {err}");

                VecDeque::new()
            }
        };

        self.snapshot = Some(path);

        self.purge();

        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    #[inline]
    pub fn oldest(&self) -> Option<f64> {
        self.times.front().copied()
    }

    /// Drop timestamps that fell out of the trailing window
    fn purge(&mut self) {
        let cutoff = self.clock.now() - self.window.as_secs_f64();

        while matches!(self.times.front(), Some(time) if *time < cutoff) {
            self.times.pop_front();
        }
    }

    /// Wait until the window has capacity for one more request
    ///
    /// Purges aged-out timestamps, admits immediately while under quota,
    /// otherwise sleeps in throttle steps and re-checks until the oldest
    /// timestamp expires (or the optional wait bound does)
    pub fn admit(&mut self) -> Result<(), Error> {
        self.purge();

        if self.times.len() < self.quota {
            tracing::debug!(
                requests = self.times.len(),
                quota = self.quota,
                "Request window check passed"
            );

            return Ok(());
        }

        tracing::warn!(
            quota = self.quota,
            window = ?self.window,
            "Request quota exceeded, delaying requests"
        );

        let deadline = self.wait_timeout
            .map(|timeout| self.clock.now() + timeout.as_secs_f64());

        while self.times.len() >= self.quota {
            if let (Some(deadline), Some(timeout)) = (deadline, self.wait_timeout) {
                if self.clock.now() >= deadline {
                    return Err(Error::ThrottleTimeout(timeout));
                }
            }

            self.clock.sleep(self.throttle_step);

            self.purge();
        }

        Ok(())
    }

    /// Record that a request was just issued
    ///
    /// Called right after the HTTP call is made, whether or not it
    /// ultimately succeeds. Rewrites the snapshot when one is configured;
    /// a failed write is logged and never aborts the request
    pub fn record(&mut self) {
        self.times.push_back(self.clock.now());

        if let Some(path) = &self.snapshot {
            let times = self.times.iter().copied().collect::<Vec<f64>>();

            let result = serde_json::to_vec(&times)
                .map_err(std::io::Error::other)
                .and_then(|bytes| std::fs::write(path, bytes));

            if let Err(err) = result {
                tracing::warn!(?path, "Failed to write request window snapshot: {err}");
            }
        }
    }
}
