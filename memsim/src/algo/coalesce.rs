use crate::helpe::*;

/// What a coalescing attempt found and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coalesced {
    pub compacted:      bool,
    /// The hole that decided the matter. See [measure_hole].
    pub hole_size:      Steps,
    /// Occupied cells that ended up at a different index.
    pub cells_moved:    Steps,
}

/// Measures "the" hole of `memory`, the way it has always been
/// measured: a single running value, overwritten every time a run
/// of free cells closes, and once more if a run is still open at
/// the end.
///
/// The result is therefore the *last* interior hole, or the
/// trailing hole if there is one. Earlier holes don't count. Zero
/// means not a single cell is free; fully free memory measures as
/// its own length.
pub fn measure_hole(memory: &Memory) -> Steps {
    let mut start: Option<Steps> = None;
    let mut hole_size = 0;
    for (i, s) in memory.cells().iter().enumerate() {
        match (s.is_free(), start) {
            (true, None)        => { start = Some(i); },
            (false, Some(st))   => {
                hole_size = i - st;
                start = None;
            },
            _                   => {},
        }
    }
    if let Some(st) = start {
        hole_size = memory.len() - st;
    }

    hole_size
}

/// Slides every occupied cell to the front, keeping their relative
/// order, and frees the rest. Returns how many cells moved.
pub fn compact(memory: &mut Memory) -> Steps {
    let mut packed = Vec::with_capacity(memory.len());
    let mut cells_moved = 0;
    for (i, s) in memory.cells().iter().enumerate() {
        if !s.is_free() {
            if packed.len() != i { cells_moved += 1; }
            packed.push(*s);
        }
    }
    packed.resize(memory.len(), Slot::Free);
    memory.overwrite(packed);

    cells_moved
}

/// One coalescing attempt.
///
/// If [measure_hole] finds anything, wait the coalescing delay and
/// [compact]. Either way, tell `reporter` how it went and show it
/// the (possibly unchanged) memory.
pub fn coalesce<C, R>(
    memory:     &mut Memory,
    config:     &SimConfig,
    clock:      &mut C,
    reporter:   &mut R,
) -> Coalesced
where C: Clock + ?Sized, R: Reporter + ?Sized {
    let hole_size = measure_hole(memory);
    debug!("Coalescer measured a hole of {hole_size} cells in [{memory}]");

    let (outcome, message, phase) = if hole_size > 0 {
        // Simulate time taken for coalescing.
        clock.wait(config.compaction_delay());
        let cells_moved = compact(memory);
        info!("Compacted memory: {cells_moved} cells moved, now [{memory}]");
        // An already compact layout (fully free memory, say) went
        // through the pass without any work being done.
        let (message, phase) = if cells_moved > 0 {
            (
                format!("Compaction and coalescing completed in {} ms", config.coalescing_total_ms()),
                Phase::AfterCompaction,
            )
        } else {
            (
                format!("Memory already compact, no coalescing work done ({} ms of compaction and coalescing time)", config.coalescing_total_ms()),
                Phase::NoCoalescingNeeded,
            )
        };
        (
            Coalesced {
                compacted: true,
                hole_size,
                cells_moved,
            },
            message,
            phase,
        )
    } else {
        info!("No free cells, nothing to coalesce");
        (
            Coalesced {
                compacted:      false,
                hole_size,
                cells_moved:    0,
            },
            format!("No coalescing needed ({} ms of compaction and coalescing time)", config.coalescing_total_ms()),
            Phase::NoCoalescingNeeded,
        )
    };

    reporter.coalescing_done(&outcome, &message);
    reporter.memory_snapshot(&Snapshot::of(memory, phase));

    outcome
}
