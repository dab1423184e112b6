use crate::helpe::*;

/// The knobs of one simulation run.
///
/// `compaction_time` and `coalescing_hole_time` are milliseconds.
/// The former is a real delay (waited once after every release,
/// and once more before a compaction actually moves cells); the
/// latter is bookkeeping only and shows up in reported totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub memory_size:            Steps,
    pub compaction_time:        u64,
    pub coalescing_hole_time:   u64,
    /// Wall time of a single tick.
    pub tick:                   Duration,
}

/// One time unit, one second.
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

impl SimConfig {
    /// A configuration with no delays besides the default tick.
    pub fn new(memory_size: Steps) -> Self {
        Self {
            memory_size,
            compaction_time:        0,
            coalescing_hole_time:   0,
            tick:                   DEFAULT_TICK,
        }
    }

    pub fn with_compaction_time(mut self, ms: u64) -> Self {
        self.compaction_time = ms;
        self
    }

    pub fn with_coalescing_hole_time(mut self, ms: u64) -> Self {
        self.coalescing_hole_time = ms;
        self
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    #[inline(always)]
    pub fn compaction_delay(&self) -> Duration {
        Duration::from_millis(self.compaction_time)
    }

    /// What gets displayed as "compaction and coalescing" time.
    /// Saturates instead of wrapping.
    #[inline(always)]
    pub fn coalescing_total_ms(&self) -> u64 {
        self.compaction_time.saturating_add(self.coalescing_hole_time)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.memory_size == 0 {
            return Err(SimError::ZeroMemory);
        }

        Ok(())
    }
}
