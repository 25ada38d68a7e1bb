//! Waiting for the scanner to finish writing a file.
//!
//! Creation events arrive before the device has flushed the scan. A file is
//! considered settled once two consecutive polls see the same length and
//! modification time, or once the policy's timeout runs out.

use std::fs;
use std::io;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use tracing::debug;

/// Timing of the settle wait and of re-reads for incomplete scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlePolicy {
    /// Fixed wait before the first observation
    pub initial_delay: Duration,
    /// Time between observations and between re-reads
    pub poll_interval: Duration,
    /// Upper bound on the total wait, measured from the creation event
    pub timeout: Duration,
}

impl Default for SettlePolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::ZERO,
            poll_interval: Duration::from_millis(250),
            timeout: Duration::from_secs(5),
        }
    }
}

impl SettlePolicy {
    pub fn builder() -> SettlePolicyBuilder {
        SettlePolicyBuilder::default()
    }

    /// Policy that reads immediately and never retries.
    pub fn immediate() -> Self {
        Self {
            initial_delay: Duration::ZERO,
            poll_interval: Duration::ZERO,
            timeout: Duration::ZERO,
        }
    }
}

/// Builder for SettlePolicy
#[derive(Default)]
pub struct SettlePolicyBuilder {
    initial_delay: Option<Duration>,
    poll_interval: Option<Duration>,
    timeout: Option<Duration>,
}

impl SettlePolicyBuilder {
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = Some(delay);
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> SettlePolicy {
        let default = SettlePolicy::default();
        SettlePolicy {
            initial_delay: self.initial_delay.unwrap_or(default.initial_delay),
            poll_interval: self.poll_interval.unwrap_or(default.poll_interval),
            timeout: self.timeout.unwrap_or(default.timeout),
        }
    }
}

/// Outcome of [`wait_until_stable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// Two consecutive observations matched; carries the file length.
    Stable(u64),
    /// The deadline passed while the file was still changing.
    TimedOut(u64),
    /// The policy has no timeout, so the file was not watched at all.
    Unchecked(u64),
}

#[derive(Debug, PartialEq, Eq)]
struct Observation {
    len: u64,
    modified: Option<SystemTime>,
}

fn observe(path: &Path) -> io::Result<Observation> {
    let metadata = fs::metadata(path)?;
    Ok(Observation {
        len: metadata.len(),
        modified: metadata.modified().ok(),
    })
}

/// Polls `path` until it stops changing or `deadline` passes.
pub fn wait_until_stable(path: &Path, policy: &SettlePolicy, deadline: Instant) -> io::Result<Settled> {
    if !policy.initial_delay.is_zero() {
        thread::sleep(policy.initial_delay);
    }

    let mut last = observe(path)?;
    if policy.timeout.is_zero() {
        return Ok(Settled::Unchecked(last.len));
    }
    loop {
        if Instant::now() >= deadline {
            debug!(path = %path.display(), len = last.len, "Settle wait timed out");
            return Ok(Settled::TimedOut(last.len));
        }

        thread::sleep(policy.poll_interval);
        let current = observe(path)?;
        if current == last {
            debug!(path = %path.display(), len = current.len, "File settled");
            return Ok(Settled::Stable(current.len));
        }
        last = current;
    }
}
