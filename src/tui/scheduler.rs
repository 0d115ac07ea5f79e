//! Poll interval and the ticker thread that follows it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, bounded};
use tracing::debug;

/// Shortest allowed poll interval, in seconds.
pub const MIN_INTERVAL: u64 = 1;

/// Owns the poll interval. Only the control loop changes it; the ticker
/// reads it before every sleep, so a change applies from the next tick.
#[derive(Debug, Clone)]
pub struct PollScheduler {
    interval: Arc<AtomicU64>,
}

impl PollScheduler {
    pub fn new(interval_secs: u64) -> Self {
        Self {
            interval: Arc::new(AtomicU64::new(interval_secs.max(MIN_INTERVAL))),
        }
    }

    pub fn interval(&self) -> u64 {
        self.interval.load(Ordering::Relaxed)
    }

    pub fn increase(&self) {
        let next = self.interval().saturating_add(1);
        self.interval.store(next, Ordering::Relaxed);
        debug!("poll interval now {}s", next);
    }

    /// Lowers the interval by one second, never below [`MIN_INTERVAL`].
    pub fn decrease(&self) {
        let next = self.interval().saturating_sub(1).max(MIN_INTERVAL);
        self.interval.store(next, Ordering::Relaxed);
        debug!("poll interval now {}s", next);
    }

    /// Starts the ticker thread. It stops once the receiver is dropped.
    ///
    /// The channel holds one tick and the send blocks, so a slow control loop
    /// sees at most one pending tick rather than a backlog.
    pub fn spawn_ticker(&self) -> Receiver<()> {
        let (tx, rx) = bounded(1);
        let interval = Arc::clone(&self.interval);
        thread::spawn(move || {
            loop {
                let secs = interval.load(Ordering::Relaxed).max(MIN_INTERVAL);
                thread::sleep(Duration::from_secs(secs));
                if tx.send(()).is_err() {
                    break;
                }
            }
        });
        rx
    }
}
