//! The timer facility. Every suspension in a simulation (ticks,
//! compaction delays, coalescing delays) is a call to [`Clock::wait`].
//! Waits always run to completion; nothing here can be cancelled.

use crate::helpe::*;

pub trait Clock {
    /// Suspends the simulation for `d`.
    fn wait(&mut self, d: Duration);
    /// Total time spent since the clock was created.
    fn elapsed(&self) -> Duration;
}

/// A clock that never sleeps. Time jumps forward by exactly
/// the requested amount, which makes runs instant and
/// perfectly reproducible.
#[derive(Debug, Default, Clone)]
pub struct VirtualClock {
    now:    Duration,
    waits:  usize,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times somebody waited on this clock.
    pub fn waits(&self) -> usize {
        self.waits
    }
}

impl Clock for VirtualClock {
    fn wait(&mut self, d: Duration) {
        self.now = self.now.saturating_add(d);
        self.waits += 1;
    }

    fn elapsed(&self) -> Duration {
        self.now
    }
}

/// Wraps [Instant] and really puts the thread to sleep.
///
/// Each wait blocks the calling thread until it is over. A run is
/// single-threaded, so nothing else can be waiting on that thread.
pub struct WallClock {
    heart:  Instant,
}

impl WallClock {
    pub fn new() -> Self {
        WallClock {
            heart: Instant::now()
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    fn wait(&mut self, d: Duration) {
        if !d.is_zero() {
            std::thread::sleep(d);
        }
    }

    fn elapsed(&self) -> Duration {
        self.heart
            .elapsed()
    }
}
