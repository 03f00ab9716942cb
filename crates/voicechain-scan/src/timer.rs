//! Timer - scoped one-shot and repeating timers on the tokio runtime.
//!
//! Every timer belongs to a [`TimerGroup`]. Cancelling or dropping the group
//! stops all of its timers; a cancelled timer never fires again.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// What a repeating timer does after firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerControl {
    Continue,
    Stop,
}

/// Handle to a spawned timer.
pub struct Timer {
    /// Timer ID.
    id: String,

    /// Delay (one-shot) or period (repeating).
    interval: Duration,

    /// Whether the timer repeats.
    repeating: bool,

    /// Cancels this timer only.
    token: CancellationToken,

    /// Fire count.
    fire_count: Arc<AtomicU64>,
}

impl Timer {
    /// Spawn a timer that runs `callback` once after `delay`.
    pub fn once<F>(
        id: impl Into<String>,
        delay: Duration,
        parent: &CancellationToken,
        callback: F,
    ) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let timer = Self::new(id.into(), delay, false, parent);
        let token = timer.token.clone();
        let fire_count = timer.fire_count.clone();
        let id = timer.id.clone();

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!("Timer {} cancelled before firing", id);
                }
                _ = time::sleep(delay) => {
                    if !token.is_cancelled() {
                        fire_count.fetch_add(1, Ordering::Relaxed);
                        callback();
                    }
                }
            }
        });

        timer
    }

    /// Spawn a timer that runs `callback` every `interval` until it returns
    /// [`TimerControl::Stop`] or the timer is cancelled. The first fire
    /// happens one interval after start.
    pub fn repeating<F>(
        id: impl Into<String>,
        interval: Duration,
        parent: &CancellationToken,
        mut callback: F,
    ) -> Self
    where
        F: FnMut() -> TimerControl + Send + 'static,
    {
        let timer = Self::new(id.into(), interval, true, parent);
        let token = timer.token.clone();
        let fire_count = timer.fire_count.clone();
        let id = timer.id.clone();

        tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + interval, interval);
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        debug!("Timer {} cancelled", id);
                        break;
                    }
                    _ = ticker.tick() => {
                        if token.is_cancelled() {
                            break;
                        }
                        fire_count.fetch_add(1, Ordering::Relaxed);
                        if callback() == TimerControl::Stop {
                            debug!("Timer {} finished", id);
                            break;
                        }
                    }
                }
            }
        });

        timer
    }

    fn new(id: String, interval: Duration, repeating: bool, parent: &CancellationToken) -> Self {
        Self {
            id,
            interval,
            repeating,
            token: parent.child_token(),
            fire_count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Get the timer ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_repeating(&self) -> bool {
        self.repeating
    }

    /// Check if the timer is valid (not cancelled).
    pub fn is_valid(&self) -> bool {
        !self.token.is_cancelled()
    }

    pub fn fire_count(&self) -> u64 {
        self.fire_count.load(Ordering::Relaxed)
    }

    /// Cancel the timer. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

/// Owner of a set of timers sharing one cancellation scope.
pub struct TimerGroup {
    token: CancellationToken,
    timers: Vec<Timer>,
}

impl TimerGroup {
    pub fn new() -> Self {
        Self::with_token(CancellationToken::new())
    }

    /// Group whose scope is cancelled together with `token`.
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            timers: Vec::new(),
        }
    }

    /// Token cancelling the whole group.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn once<F>(&mut self, id: impl Into<String>, delay: Duration, callback: F) -> &Timer
    where
        F: FnOnce() + Send + 'static,
    {
        let timer = Timer::once(id, delay, &self.token, callback);
        self.push(timer)
    }

    pub fn repeating<F>(&mut self, id: impl Into<String>, interval: Duration, callback: F) -> &Timer
    where
        F: FnMut() -> TimerControl + Send + 'static,
    {
        let timer = Timer::repeating(id, interval, &self.token, callback);
        self.push(timer)
    }

    fn push(&mut self, timer: Timer) -> &Timer {
        self.timers.push(timer);
        &self.timers[self.timers.len() - 1]
    }

    pub fn timers(&self) -> &[Timer] {
        &self.timers
    }

    pub fn get(&self, id: &str) -> Option<&Timer> {
        self.timers.iter().find(|t| t.id == id)
    }

    /// Cancel every timer of the group. Idempotent.
    pub fn cancel(&self) {
        if !self.token.is_cancelled() {
            debug!("Cancelling {} timers", self.timers.len());
        }
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Default for TimerGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TimerGroup {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;
