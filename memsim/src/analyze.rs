//! Invariant checks. The engine runs them under `debug_assert!`;
//! tests run them after every step they care about.

use crate::helpe::*;

/// Returns `true` if the cells owned by `id` form one contiguous
/// run of exactly `size` cells (or no cells at all, when `size` is 0).
pub fn is_contiguous(memory: &Memory, id: ProcId, size: Steps) -> bool {
    let owned = memory.owned_by(id);
    owned.len() == size && owned
        .iter()
        .tuple_windows()
        .all(|(a, b)| *b == *a + 1)
}

/// Checks the whole state of a [Simulation]:
///
/// - every `Allocated` process owns a contiguous run of exactly its size
/// - every owned cell belongs to an `Allocated` process
/// - occupied cells equal the sum of `Allocated` sizes, and fit in memory
pub fn placement_is_valid(sim: &Simulation) -> bool {
    let memory = sim.memory();
    let mut live_total = 0;
    for r in sim.records() {
        match r.status {
            Status::Allocated   => {
                if !is_contiguous(memory, r.process_id, r.size) { return false; }
                live_total += r.size;
            },
            _                   => {
                if !memory.owned_by(r.process_id).is_empty() { return false; }
            }
        }
    }
    let orphans = memory.cells()
        .iter()
        .filter_map(Slot::owner)
        .unique()
        .any(|owner| sim.record(owner).map(|r| r.status) != Some(Status::Allocated));

    !orphans && live_total == memory.occupied() && live_total <= memory.len()
}

/// Sum of every hole, as opposed to the single hole the coalescer
/// bases its decision on. Diagnostics only.
pub fn total_hole_size(memory: &Memory) -> Steps {
    memory.holes()
        .iter()
        .map(|(_, len)| len)
        .sum()
}

/// Fraction of free space that sits outside the biggest hole.
/// Zero for compact (or full) memory.
pub fn external_fragmentation(memory: &Memory) -> f64 {
    let total = total_hole_size(memory);
    if total == 0 {
        return 0.0;
    }
    let biggest = memory.holes()
        .iter()
        .map(|(_, len)| *len)
        .max()
        .unwrap_or(0);

    (total - biggest) as f64 / total as f64
}
