use crate::{
    algo::placement::allocate,
    helpe::*,
};

impl Simulation {
    /// Creates a new [Simulation] with empty memory. Nothing is
    /// placed yet; see [`Simulation::allocate_all`].
    ///
    /// This is the gatekeeper for hand-built inputs: memory must be
    /// non-empty and ids must be unique and non-zero.
    pub fn new(config: SimConfig, processes: Vec<Process>) -> Result<Self, SimError> {
        config.validate()?;
        let mut seen: HashSet<ProcId> = HashSet::with_capacity(processes.len());
        for p in &processes {
            if p.id == 0 {
                return Err(SimError::ReservedId);
            }
            if !seen.insert(p.id) {
                return Err(SimError::DuplicateId(p.id));
            }
        }

        Ok(Self {
            memory:     Memory::new(config.memory_size),
            // Placement order is fixed up front, so records
            // never need reshuffling.
            records:    by_ascending_size(&processes)
                .iter()
                .map(|p| (p.id, AllocationRecord::pending(p)))
                .collect(),
            submitted:  processes,
            config,
        })
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// All records, in placement order (ascending size).
    pub fn records(&self) -> impl Iterator<Item = &AllocationRecord> {
        self.records.values()
    }

    pub fn record(&self, id: ProcId) -> Option<&AllocationRecord> {
        self.records.get(&id)
    }

    /// Places every submitted process, smallest first, and reports the
    /// result: the initial memory snapshot, the allocation table and
    /// the summary metrics.
    pub fn allocate_all<R>(&mut self, reporter: &mut R)
    where R: Reporter + ?Sized {
        let ordered = by_ascending_size(&self.submitted);
        for p in &ordered {
            let start = allocate(&mut self.memory, p);
            let Some(rec) = self.records.get_mut(&p.id) else { continue; };
            debug_assert!(rec.status == Status::Pending, "Process {} placed twice", p.id);
            match start {
                Some(s) => {
                    rec.block_start = Some(s);
                    rec.status = Status::Allocated;
                },
                None    => {
                    warn!(
                        "Process {} needs {} contiguous cells, none available ({} of {} free)",
                        p.id, p.size, self.memory.len() - self.memory.occupied(), self.memory.len()
                    );
                    rec.status = Status::NotAllocated;
                }
            }
        }
        debug_assert!(crate::analyze::placement_is_valid(self), "Bad initial placement");
        info!(
            "Placed {} of {} processes, {} of {} cells occupied",
            self.allocated().len(), self.submitted.len(), self.memory.occupied(), self.memory.len()
        );

        reporter.memory_snapshot(&Snapshot::of(&self.memory, Phase::InitialAllocation));
        reporter.allocation_rows(&self.rows());
        reporter.summary(&self.summary());
    }

    /// Allocated processes that haven't completed yet, in placement order.
    pub fn allocated(&self) -> Vec<Process> {
        self.records
            .values()
            .filter(|r| r.status == Status::Allocated)
            .map(|r| Process::new(r.process_id, r.size, r.time))
            .collect()
    }

    /// Marks process `id` as done. Its cells are the caller's problem.
    pub(crate) fn complete(&mut self, id: ProcId) {
        if let Some(rec) = self.records.get_mut(&id) {
            debug_assert!(rec.status == Status::Allocated, "Completing a process that never ran");
            rec.status = Status::Completed;
        }
    }

    pub fn rows(&self) -> Vec<AllocationRow> {
        self.records
            .values()
            .map(AllocationRow::from)
            .collect()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            final_time: final_time(self.records.values(), &self.config),
            smallest:   smallest(&self.submitted),
        }
    }
}
