//! Round clock and display timer for Imposter.
//!
//! The elapsed time shown during a round is purely cosmetic: each client
//! computes `now - startTime` on its own and refreshes it once a second.
//! Clients are allowed to drift apart slightly.
//!
//! # Pieces
//!
//! - [`Clock`]: wall-clock source in epoch milliseconds, swappable for
//!   tests ([`SystemClock`], [`ManualClock`])
//! - [`RoundTimer`]: fires once per interval while a round is running
//!   and pends forever otherwise
//! - [`format_elapsed`]: `M:SS` rendering
//!
//! # Integration
//!
//! The timer is meant to sit in a client's `tokio::select!` loop next to
//! the lobby change feed:
//!
//! ```ignore
//! tokio::select! {
//!     Some(delivery) = feed.next() => { /* apply snapshot */ }
//!     elapsed = timer.wait_for_tick(&clock) => { /* redraw timer */ }
//! }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tokio::time::{self, Instant as TokioInstant};
use tracing::{debug, trace};

// ---------------------------------------------------------------------------
// Clocks
// ---------------------------------------------------------------------------

/// Wall-clock time in milliseconds since the Unix epoch.
///
/// Start times are written into the shared document, so every client
/// must agree on the epoch; monotonic instants won't do.
pub trait Clock: Send + Sync + 'static {
    fn now_millis(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock reading `start_millis`.
    pub fn at(start_millis: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_millis)),
        }
    }

    /// Sets the current time.
    pub fn set(&self, millis: u64) {
        self.now.store(millis, Ordering::Relaxed);
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as u64, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Elapsed time
// ---------------------------------------------------------------------------

/// Whole seconds from `start_millis` to `now_millis`.
///
/// A start time in the future (clock skew between clients) reads as 0.
pub fn elapsed_secs(start_millis: u64, now_millis: u64) -> u64 {
    now_millis.saturating_sub(start_millis) / 1000
}

/// Renders seconds as `M:SS` (minutes are not capped).
pub fn format_elapsed(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the display timer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    /// How often the elapsed time is recomputed.
    pub interval: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
        }
    }
}

// ---------------------------------------------------------------------------
// RoundTimer
// ---------------------------------------------------------------------------

/// Local timer that ticks while a round is running.
///
/// Stopped by default. While stopped, [`wait_for_tick`](Self::wait_for_tick)
/// never resolves, which lets it sit in a `select!` unconditionally.
#[derive(Debug)]
pub struct RoundTimer {
    config: TimerConfig,
    /// Start time of the round being timed, epoch millis.
    start_time: Option<u64>,
    next_tick: Option<TokioInstant>,
    ticks: u64,
}

impl RoundTimer {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            start_time: None,
            next_tick: None,
            ticks: 0,
        }
    }

    /// Starts timing the round that began at `start_millis`.
    ///
    /// Re-starting with the same start time keeps the current cadence;
    /// a different start time (a new round) restarts it.
    pub fn start(&mut self, start_millis: u64) {
        if self.start_time == Some(start_millis) {
            return;
        }
        self.start_time = Some(start_millis);
        self.next_tick = Some(TokioInstant::now() + self.config.interval);
        self.ticks = 0;
        debug!(start_millis, interval_ms = self.config.interval.as_millis() as u64, "round timer started");
    }

    /// Stops ticking. Idempotent.
    pub fn stop(&mut self) {
        if self.start_time.take().is_some() {
            self.next_tick = None;
            debug!(ticks = self.ticks, "round timer stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.start_time.is_some()
    }

    /// Start time of the round being timed.
    pub fn start_time(&self) -> Option<u64> {
        self.start_time
    }

    /// Ticks fired since the last start.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Seconds elapsed in the current round by `clock`, or 0 when stopped.
    pub fn elapsed(&self, clock: &(impl Clock + ?Sized)) -> u64 {
        self.start_time
            .map_or(0, |start| elapsed_secs(start, clock.now_millis()))
    }

    /// Waits for the next tick and returns the recomputed elapsed seconds.
    ///
    /// Pends forever while stopped.
    pub async fn wait_for_tick(&mut self, clock: &(impl Clock + ?Sized)) -> u64 {
        let (Some(next), Some(start)) = (self.next_tick, self.start_time) else {
            return std::future::pending().await;
        };

        time::sleep_until(next).await;

        // Schedule from now so a late wake-up doesn't cause a burst.
        self.next_tick = Some(TokioInstant::now() + self.config.interval);
        self.ticks += 1;

        let elapsed = elapsed_secs(start, clock.now_millis());
        trace!(tick = self.ticks, elapsed, "round timer tick");
        elapsed
    }
}

impl Default for RoundTimer {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed_pads_seconds() {
        assert_eq!(format_elapsed(0), "0:00");
        assert_eq!(format_elapsed(9), "0:09");
        assert_eq!(format_elapsed(65), "1:05");
        assert_eq!(format_elapsed(600), "10:00");
    }

    #[test]
    fn test_elapsed_secs_truncates_and_saturates() {
        assert_eq!(elapsed_secs(1_000, 3_999), 2);
        assert_eq!(elapsed_secs(5_000, 1_000), 0);
    }

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::at(100);
        let other = clock.clone();
        clock.advance(Duration::from_secs(2));
        assert_eq!(other.now_millis(), 2_100);
        other.set(7);
        assert_eq!(clock.now_millis(), 7);
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }

    #[test]
    fn test_default_timer_config_is_one_second() {
        assert_eq!(TimerConfig::default().interval, Duration::from_secs(1));
    }
}
