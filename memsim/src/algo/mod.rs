pub mod placement;
pub mod lifecycle;
pub mod coalesce;

use crate::helpe::*;

/// What's left once a run is over.
#[derive(Debug)]
pub struct Outcome {
    /// Final state of every record, in placement order.
    pub records:        Vec<AllocationRecord>,
    /// One coalescing result per completed process, in the
    /// order the lifecycles ran.
    pub coalescings:    Vec<(ProcId, Coalesced)>,
    pub memory:         Memory,
    pub summary:        Summary,
    /// Time spent according to the clock that drove the run.
    pub elapsed:        Duration,
}

/// Runs one full simulation:
///
/// 1. place every process, smallest first, into `config.memory_size`
///    cells; failures are recorded, not raised
/// 2. for each placed process in that same order: count down, release,
///    wait the compaction delay, coalesce
///
/// Lifecycles never overlap. All waiting goes through `clock` and
/// everything worth showing goes to `reporter`.
pub fn simulate<C, R>(
    config:     SimConfig,
    processes:  Vec<Process>,
    clock:      &mut C,
    reporter:   &mut R,
) -> Result<Outcome, SimError>
where C: Clock + ?Sized, R: Reporter + ?Sized {
    let start = clock.elapsed();
    let mut sim = Simulation::new(config, processes)?;
    sim.allocate_all(reporter);

    let mut scheduler = Scheduler::new(&sim);
    info!("Scheduling {} lifecycles", scheduler.pending());
    let coalescings = scheduler.run(&mut sim, clock, reporter);

    let elapsed = clock.elapsed().saturating_sub(start);
    info!(
        "Simulation finished in {} ms ({} of {} cells still occupied)",
        elapsed.as_millis(),
        sim.memory.occupied(),
        sim.memory.len()
    );

    Ok(Outcome {
        summary:    sim.summary(),
        records:    sim.records.into_values().collect(),
        memory:     sim.memory,
        coalescings,
        elapsed,
    })
}
