use crate::helpe::*;

/// Turns raw `(size, time)` requests into processes, handing out
/// ids 1, 2, 3... in submission order.
///
/// This is the gatekeeper for collected input. Sizes and times are
/// unsigned by construction, so the only thing that can go wrong
/// is running out of ids.
pub fn init<I>(requests: I) -> Result<Vec<Process>, SimError>
where I: IntoIterator<Item = (Steps, Steps)> {
    requests.into_iter()
        .enumerate()
        .map(|(idx, (size, time))| {
            let id = ProcId::try_from(idx + 1)
                .map_err(|_| SimError::TooManyProcesses)?;
            Ok(Process::new(id, size, time))
        })
        .collect()
}

/// The scheduling policy: smallest first, ties in submission order.
///
/// Sorting is stable, so the relative order of equal-sized
/// processes is whatever order they arrived in.
#[inline(always)]
pub fn by_ascending_size(procs: &[Process]) -> Vec<Process> {
    procs.iter()
        .copied()
        .sorted_by_key(|p| p.size)
        .collect()
}

/// The first strictly-smallest process in submission order.
#[inline(always)]
pub fn smallest(procs: &[Process]) -> Option<Process> {
    procs.iter()
        .copied()
        .min_by_key(|p| p.size)
}

/// `max(time of allocated processes) + compaction + coalescing`.
///
/// Processes that didn't fit contribute nothing. With nothing
/// allocated, only the two delays remain.
pub fn final_time<'a, I>(records: I, config: &SimConfig) -> u64
where I: IntoIterator<Item = &'a AllocationRecord> {
    let longest = records.into_iter()
        .filter(|r| r.block_start.is_some())
        .map(|r| r.time as u64)
        .max()
        .unwrap_or(0);

    longest.saturating_add(config.coalescing_total_ms())
}

/// Makes up a workload of `n` processes with sizes in
/// `1..=max_size` and times in `0..=max_time`.
///
/// Same seed, same workload.
pub fn random_workload(
    n:          usize,
    max_size:   Steps,
    max_time:   Steps,
    seed:       u64,
) -> Result<Vec<Process>, SimError> {
    use rand::{Rng, SeedableRng, rngs::StdRng};

    let mut rng = StdRng::seed_from_u64(seed);
    let max_size = max_size.max(1);
    let requests: Vec<(Steps, Steps)> = (0..n)
        .map(|_| (rng.gen_range(1..=max_size), rng.gen_range(0..=max_time)))
        .collect();

    init(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ids_follow_submission() {
        let ps = init(vec![(5, 1), (2, 2), (7, 0)]).unwrap();
        assert_eq!(ps.iter().map(|p| (p.id, p.size, p.time)).collect::<Vec<_>>(),
            vec![(1, 5, 1), (2, 2, 2), (3, 7, 0)]);
    }

    #[test]
    fn ascending_size_is_stable() {
        let ps = init(vec![(3, 0), (1, 0), (3, 0), (1, 0), (2, 0)]).unwrap();
        let ids: Vec<ProcId> = by_ascending_size(&ps).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 4, 5, 1, 3]);
    }

    #[test]
    fn smallest_is_first_of_its_size() {
        let ps = init(vec![(4, 9), (2, 5), (2, 1)]).unwrap();
        let s = smallest(&ps).unwrap();
        assert_eq!((s.id, s.size, s.time), (2, 2, 5));
        assert!(smallest(&[]).is_none());
    }

    #[test]
    fn final_time_only_counts_placed_processes() {
        let cfg = SimConfig::new(8)
            .with_compaction_time(300)
            .with_coalescing_hole_time(200);
        let mut placed = AllocationRecord::pending(&Process::new(1, 2, 4));
        placed.block_start = Some(0);
        placed.status = Status::Allocated;
        let mut failed = AllocationRecord::pending(&Process::new(2, 20, 90));
        failed.status = Status::NotAllocated;

        assert_eq!(final_time([&placed, &failed], &cfg), 504);
        assert_eq!(final_time([&failed], &cfg), 500);

        let huge = SimConfig::new(8).with_compaction_time(u64::MAX);
        assert_eq!(final_time([&placed], &huge), u64::MAX);
    }

    #[test]
    fn random_workloads_are_reproducible() {
        let a = random_workload(20, 6, 3, 42).unwrap();
        let b = random_workload(20, 6, 3, 42).unwrap();
        assert_eq!(
            a.iter().map(|p| (p.size, p.time)).collect::<Vec<_>>(),
            b.iter().map(|p| (p.size, p.time)).collect::<Vec<_>>()
        );
        assert!(a.iter().all(|p| (1..=6).contains(&p.size) && p.time <= 3));
    }
}
