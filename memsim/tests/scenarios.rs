/*!
 * End-to-end Scenarios
 * Full runs through placement, countdowns, release and coalescing
 */

use memsim::*;
use memsim::algo::simulate;
use pretty_assertions::assert_eq;

#[test]
fn two_processes_fit_and_drain() {
    let procs = init(vec![(4, 2), (3, 1)]).unwrap();
    let mut clk = VirtualClock::new();
    let mut rec = Recorder::new();

    let out = simulate(SimConfig::new(10), procs, &mut clk, &mut rec)
        .expect("valid configuration");

    // Smallest first: the 3-cell process lands at offset 0, the
    // 4-cell one right after it.
    assert_eq!(
        rec.rows().expect("rows are reported"),
        &[
            AllocationRow { id: 2, size: 3, block_no: BlockNo::At(1), time: TimeCell::Units(1) },
            AllocationRow { id: 1, size: 4, block_no: BlockNo::At(4), time: TimeCell::Units(2) },
        ]
    );
    assert_eq!(rec.snapshots()[0].phase, Phase::InitialAllocation);
    assert_eq!(rec.snapshots()[0].cells, vec![2, 2, 2, 1, 1, 1, 1, 0, 0, 0]);

    // After process 2 leaves, process 1 slides to the front.
    assert_eq!(out.coalescings[0], (2, Coalesced { compacted: true, hole_size: 3, cells_moved: 4 }));
    assert_eq!(rec.snapshots()[1].cells, vec![1, 1, 1, 1, 0, 0, 0, 0, 0, 0]);
    assert_eq!(rec.coalescings().len(), 2);

    // After both are gone memory is fully free and nothing had to move.
    let (last_id, last) = out.coalescings[1];
    assert_eq!(last_id, 1);
    assert_eq!(last.cells_moved, 0);
    assert_eq!(rec.snapshots()[2].phase, Phase::NoCoalescingNeeded);
    assert_eq!(out.memory, Memory::new(10));
    assert!(out.records.iter().all(|r| r.status == Status::Completed));

    // Two ticks for process 2, three for process 1, no delays.
    assert_eq!(out.elapsed, DEFAULT_TICK * 5);
    assert_eq!(out.summary.final_time, 2);
}

#[test]
fn oversized_process_is_never_scheduled() {
    let procs = init(vec![(5, 1)]).unwrap();
    let mut clk = VirtualClock::new();
    let mut rec = Recorder::new();

    let out = simulate(SimConfig::new(3), procs, &mut clk, &mut rec).unwrap();

    let row = &rec.rows().unwrap()[0];
    assert_eq!(row.block_no.to_string(), "Not Allocated");
    assert_eq!(row.time.to_string(), "N/A");
    assert_eq!(out.records[0].status, Status::NotAllocated);
    assert!(rec.countdown_of(1).is_empty());
    assert!(out.coalescings.is_empty());
    assert_eq!(clk.waits(), 0);
}

#[test]
fn summary_reports_smallest_submitted_and_totals() {
    let procs = init(vec![(6, 3), (2, 7), (9, 9)]).unwrap();
    let cfg = SimConfig::new(8)
        .with_compaction_time(1500)
        .with_coalescing_hole_time(500);
    let mut rec = Recorder::new();

    simulate(cfg, procs, &mut VirtualClock::new(), &mut rec).unwrap();

    let summary = rec.summary().unwrap();
    // The 9-cell process didn't fit, so its 9 units don't count.
    assert_eq!(summary.final_time, 7 + 1500 + 500);
    assert_eq!(summary.final_time_secs(), 2.007);
    let smallest = summary.smallest.unwrap();
    assert_eq!((smallest.size, smallest.time), (2, 7));
}

#[test]
fn countdown_reports_every_value_then_completion() {
    let procs = init(vec![(1, 3)]).unwrap();
    let mut rec = Recorder::new();
    simulate(SimConfig::new(1), procs, &mut VirtualClock::new(), &mut rec).unwrap();

    assert_eq!(
        rec.countdown_of(1),
        vec![
            TimeCell::Units(3),
            TimeCell::Units(2),
            TimeCell::Units(1),
            TimeCell::Units(0),
            TimeCell::Completed,
        ]
    );
}

#[test]
fn delays_are_waited_in_full() {
    let procs = init(vec![(2, 1), (1, 1)]).unwrap();
    let cfg = SimConfig::new(4)
        .with_compaction_time(200)
        .with_coalescing_hole_time(50)
        .with_tick(Duration::from_millis(10));
    let mut clk = VirtualClock::new();

    let out = simulate(cfg, procs, &mut clk, &mut Silent).unwrap();

    // Per lifecycle: 2 ticks, the compaction delay, then the coalescing
    // delay (there is always a hole once something has been released).
    // The coalescing hole time itself is never waited.
    assert_eq!(out.elapsed, Duration::from_millis(2 * (2 * 10 + 200 + 200)));
}

#[test]
fn equal_sizes_keep_submission_order() {
    let procs = init(vec![(2, 1), (1, 4), (2, 2), (1, 3)]).unwrap();
    let out = simulate(SimConfig::new(6), procs, &mut VirtualClock::new(), &mut Silent).unwrap();

    let placed: Vec<(ProcId, Option<Steps>)> = out.records
        .iter()
        .map(|r| (r.process_id, r.block_start))
        .collect();
    assert_eq!(placed, vec![(2, Some(0)), (4, Some(1)), (1, Some(2)), (3, Some(4))]);
    // Lifecycles run in that same order.
    assert_eq!(
        out.coalescings.iter().map(|(id, _)| *id).collect::<Vec<_>>(),
        vec![2, 4, 1, 3]
    );
}

#[test]
fn huge_delays_do_not_overflow() {
    let procs = init(vec![(1, 1)]).unwrap();
    let cfg = SimConfig::new(2)
        .with_compaction_time(u64::MAX)
        .with_coalescing_hole_time(1);
    let mut rec = Recorder::new();

    let out = simulate(cfg, procs, &mut VirtualClock::new(), &mut rec).unwrap();

    assert_eq!(rec.summary().unwrap().final_time, u64::MAX);
    assert_eq!(out.summary.final_time, u64::MAX);
    assert_eq!(out.memory.occupied(), 0);
}

#[test]
fn bad_configurations_are_rejected() {
    let procs = init(vec![(1, 1)]).unwrap();
    assert!(matches!(
        simulate(SimConfig::new(0), procs, &mut VirtualClock::new(), &mut Silent),
        Err(SimError::ZeroMemory)
    ));

    let dupes = vec![Process::new(4, 1, 1), Process::new(4, 2, 2)];
    assert!(matches!(
        Simulation::new(SimConfig::new(8), dupes),
        Err(SimError::DuplicateId(4))
    ));
    assert!(matches!(
        Simulation::new(SimConfig::new(8), vec![Process::new(0, 1, 1)]),
        Err(SimError::ReservedId)
    ));
}

#[test]
fn console_shows_the_whole_story() {
    let procs = init(vec![(2, 1), (7, 1)]).unwrap();
    let mut console = ConsoleReporter::new(Vec::new());
    simulate(SimConfig::new(4), procs, &mut VirtualClock::new(), &mut console).unwrap();
    let text = String::from_utf8(console.into_inner()).unwrap();

    assert!(text.contains("[11..] Initial Allocation"));
    assert!(text.contains("Not Allocated"));
    assert!(text.contains("Process 1: Completed"));
    // The only process leaves nothing behind to move.
    assert!(text.contains("Memory already compact, no coalescing work done (0 ms"));
    assert!(!text.contains("Compaction and coalescing completed"));
    assert!(text.contains("Smallest process:\t2 KB, 1 units"));
}
