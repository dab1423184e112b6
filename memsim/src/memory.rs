use crate::helpe::*;

impl Memory {
    /// Creates a memory of `size` cells, all free.
    pub fn new(size: Steps) -> Self {
        Self {
            cells: vec![Slot::Free; size],
        }
    }

    /// Builds a memory from an explicit layout, in snapshot notation:
    /// `0` is free, anything else is an owner id. Mostly useful for
    /// setting up tricky states by hand.
    pub fn from_owners(owners: &[ProcId]) -> Self {
        Self {
            cells: owners.iter()
                .map(|&o| if o == 0 { Slot::Free } else { Slot::OwnedBy(o) })
                .collect()
        }
    }

    #[inline(always)]
    pub fn len(&self) -> Steps {
        self.cells.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline(always)]
    pub fn cells(&self) -> &[Slot] {
        &self.cells
    }

    /// Returns `true` if all `len` cells starting at `start` are free.
    /// A run that would spill past the end is never free.
    #[inline(always)]
    pub fn is_free_run(&self, start: Steps, len: Steps) -> bool {
        match self.cells.get(start..start + len) {
            Some(run)   => run.iter().all(Slot::is_free),
            None        => false,
        }
    }

    /// Hands `len` cells starting at `start` over to `owner`.
    pub(crate) fn fill(&mut self, start: Steps, len: Steps, owner: ProcId) {
        debug_assert!(self.is_free_run(start, len) || len == 0, "Filling occupied cells!");
        for c in &mut self.cells[start..start + len] {
            *c = Slot::OwnedBy(owner);
        }
    }

    /// Frees every cell owned by `owner`. Returns how many
    /// cells were freed.
    pub fn release(&mut self, owner: ProcId) -> Steps {
        let mut freed = 0;
        for c in self.cells.iter_mut() {
            if *c == Slot::OwnedBy(owner) {
                *c = Slot::Free;
                freed += 1;
            }
        }

        freed
    }

    /// Swaps in a whole new layout of the same length.
    pub(crate) fn overwrite(&mut self, cells: Vec<Slot>) {
        debug_assert!(cells.len() == self.cells.len(), "Memory changed size!");
        self.cells = cells;
    }

    /// Number of non-free cells.
    pub fn occupied(&self) -> Steps {
        self.cells
            .iter()
            .filter(|s| !s.is_free())
            .count()
    }

    /// Indices of the cells owned by `owner`, ascending.
    pub fn owned_by(&self, owner: ProcId) -> Vec<Steps> {
        self.cells
            .iter()
            .positions(|s| *s == Slot::OwnedBy(owner))
            .collect()
    }

    /// Every maximal run of free cells, as `(start, len)`,
    /// left to right.
    pub fn holes(&self) -> Vec<(Steps, Steps)> {
        self.cells
            .iter()
            .enumerate()
            .chunk_by(|(_, s)| s.is_free())
            .into_iter()
            .filter(|(free, _)| *free)
            .map(|(_, mut run)| {
                // Chunks are never empty.
                let (start, _) = run.next().unwrap_or((0, &Slot::Free));
                (start, run.count() + 1)
            })
            .collect()
    }

    /// The renderer-facing view: `0` for free, owner id otherwise.
    pub fn owners(&self) -> Vec<ProcId> {
        self.cells
            .iter()
            .map(|s| s.owner().unwrap_or(0))
            .collect()
    }
}

impl fmt::Display for Memory {
    /// One character per cell: `.` for free, the owner id in base 36
    /// otherwise (ids wrap around past `z`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in &self.cells {
            let c = match s {
                Slot::Free          => '.',
                Slot::OwnedBy(id)   => char::from_digit(id % 36, 36).unwrap_or('?'),
            };
            write!(f, "{c}")?;
        }

        Ok(())
    }
}
