use crate::{
    algo::coalesce::coalesce,
    helpe::*,
};

/// Where a [Lifecycle] currently is.
///
/// ```text
///  Countdown(t) -> Countdown(t-1) -> ... -> Countdown(0) -> Settling -> Coalescing -> Done
/// ```
///
/// The process's cells are released on the way out of `Countdown(0)`,
/// so by the time we're `Settling` they're already free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Countdown {
        remaining:  Steps,
    },
    /// Waiting out the compaction delay.
    Settling,
    Coalescing,
    Done(Coalesced),
}

/// One process's trip from countdown to coalescing, as an explicit
/// state machine. Each call to [`Lifecycle::advance`] performs at
/// most one suspension (one wait on the [Clock]).
#[derive(Debug, Clone)]
pub struct Lifecycle {
    process:    Process,
    stage:      Stage,
}

impl Lifecycle {
    pub fn new(process: Process) -> Self {
        Self {
            process,
            stage:  Stage::Countdown { remaining: process.time },
        }
    }

    pub fn process(&self) -> &Process {
        &self.process
    }

    #[inline(always)]
    pub fn is_done(&self) -> bool {
        matches!(self.stage, Stage::Done(_))
    }

    /// Moves one step forward and returns the stage we land on.
    /// Calling this on a finished lifecycle does nothing.
    pub fn advance<C, R>(
        &mut self,
        sim:        &mut Simulation,
        clock:      &mut C,
        reporter:   &mut R,
    ) -> Stage
    where C: Clock + ?Sized, R: Reporter + ?Sized {
        let id = self.process.id;
        self.stage = match self.stage {
            Stage::Countdown { remaining }  => {
                clock.wait(sim.config.tick);
                if remaining == 0 {
                    sim.complete(id);
                    reporter.remaining_time(id, TimeCell::Completed);
                    // Free up memory right after completion.
                    let freed = sim.memory.release(id);
                    debug_assert!(freed == self.process.size, "Process {id} owned {freed} cells, not {}", self.process.size);
                    info!("Process {id} completed, released {freed} cells");
                    reporter.process_released(id, freed);
                    Stage::Settling
                } else {
                    reporter.remaining_time(id, TimeCell::Units(remaining - 1));
                    Stage::Countdown { remaining: remaining - 1 }
                }
            },
            Stage::Settling                 => {
                clock.wait(sim.config.compaction_delay());
                Stage::Coalescing
            },
            Stage::Coalescing               => {
                Stage::Done(coalesce(&mut sim.memory, &sim.config, clock, reporter))
            },
            Stage::Done(c)                  => Stage::Done(c),
        };

        self.stage
    }
}

/// Runs lifecycles strictly one after the other.
///
/// "Concurrent" residency is an illusion: processes sit in memory
/// together, but only the head of the queue ever ticks, and the
/// next one doesn't start until the head's coalescing has been
/// reported.
pub struct Scheduler {
    queue:  VecDeque<Lifecycle>,
}

impl Scheduler {
    /// Queues every allocated process of `sim`, in placement order
    /// (i.e. ascending size). Failed ones never get here.
    pub fn new(sim: &Simulation) -> Self {
        Self {
            queue: sim.allocated()
                .into_iter()
                .map(Lifecycle::new)
                .collect(),
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Drives every queued lifecycle to completion. Returns each
    /// process's coalescing outcome, in the order they ran.
    pub fn run<C, R>(
        &mut self,
        sim:        &mut Simulation,
        clock:      &mut C,
        reporter:   &mut R,
    ) -> Vec<(ProcId, Coalesced)>
    where C: Clock + ?Sized, R: Reporter + ?Sized {
        let mut res = Vec::with_capacity(self.queue.len());
        while let Some(mut lc) = self.queue.pop_front() {
            let Process { id, time, .. } = *lc.process();
            debug!("Starting lifecycle of process {id} ({time} units)");
            reporter.remaining_time(id, TimeCell::Units(time));
            loop {
                if let Stage::Done(c) = lc.advance(sim, clock, reporter) {
                    res.push((id, c));
                    break;
                }
            }
            debug_assert!(crate::analyze::placement_is_valid(sim), "Invariants broken after process {id}");
        }

        res
    }
}
