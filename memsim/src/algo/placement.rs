use crate::helpe::*;

/// Places `process` into `memory` and returns its start offset,
/// or `None` if no contiguous run of free cells is long enough.
///
/// On success the cells are marked as owned by the process. On
/// failure memory is left untouched.
pub fn allocate(memory: &mut Memory, process: &Process) -> Option<Steps> {
    let start = find_fit(memory, process.size)?;
    memory.fill(start, process.size, process.id);
    debug!("Process {} ({} cells) placed at offset {start}", process.id, process.size);

    Some(start)
}

/// Performs "best-fit" search over every candidate start offset, in
/// ascending order. Does not touch memory.
///
/// A candidate is feasible iff the `size` cells from it are all free.
/// Feasible candidates are measured and the smallest measure wins.
/// But what gets measured is the candidate run itself, which is
/// `size` cells long by construction. No candidate ever beats the
/// first one, so in practice this is first-fit.
///
/// > ***ATTENTION:*** do not "fix" this into a real best-fit by
/// > measuring the enclosing hole. Layouts, block numbers and every
/// > downstream report depend on the current behavior.
pub fn find_fit(memory: &Memory, size: Steps) -> Option<Steps> {
    // Nothing to own, nothing to search for.
    if size == 0 {
        return Some(0);
    }
    if size > memory.len() {
        return None;
    }

    let mut smallest_run = Steps::MAX;
    let mut best_offset: Option<Steps> = None;
    for start in 0..=memory.len() - size {
        if !memory.is_free_run(start, size) { continue; }
        let run = size;
        if run < smallest_run {
            smallest_run = run;
            best_offset = Some(start);
        }
    }

    best_offset
}
