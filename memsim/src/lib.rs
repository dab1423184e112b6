//! Welcome to `memsim`!
//!
//! A small engine that simulates fixed-size linear memory under
//! variable-size process allocation. Processes are placed into
//! contiguous blocks, count down their simulated duration one at a
//! time, release their cells, and after every release a compaction
//! pass may slide the survivors to the front.
//!
//! Everything that draws or collects lives behind [`Reporter`] and
//! [`ProcGen`]. The core never holds on to a renderer.

mod process;
mod memory;
mod simulation;

pub mod algo;
pub mod analyze;
pub mod clock;
pub mod config;
pub mod procset;
pub mod report;
pub mod helpe;

pub use crate::helpe::*;

/// Our fundamental unit of interest. A [`Process`] asks for
/// [`size`](Process::size) contiguous cells and keeps them for
/// [`time`](Process::time) ticks.
///
/// > ***ATTENTION:*** a process of size 0 is legal. It always "fits"
/// > at offset 0 and owns no cells. Likewise a process of time 0
/// > still waits one tick before it is considered done.
#[derive(Debug, Clone, Copy)]
pub struct Process {
    /// Stable identity, 1-based, in submission order.
    pub id:     ProcId,
    pub size:   Steps,
    pub time:   Steps,
}

/// The simulated address space: a flat run of cells, each either
/// free or owned by exactly one process.
///
/// Simulated memories are small, so a plain vector is all we need.
/// No free lists, no interval trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    cells:  Vec<Slot>,
}

/// The state of one simulation run. Created once, mutated in place
/// through allocation, timed release and coalescing, then dropped.
///
/// Memory is the only shared mutable thing in here. Lifecycles are
/// serialized, so at any instant exactly one of them (or the initial
/// placement) holds the `&mut`.
pub struct Simulation {
    memory:     Memory,
    // Keyed by process id, iterated in allocation (ascending size) order.
    records:    IndexMap<ProcId, AllocationRecord>,
    // As submitted. Needed for "smallest process" reporting, which
    // looks at everybody, not just the lucky ones.
    submitted:  Vec<Process>,
    config:     SimConfig,
}
