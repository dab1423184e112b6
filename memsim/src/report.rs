//! The narrow interface between the engine and whoever draws it.
//!
//! The engine only ever hands out borrowed, immutable views. Any
//! "current chart" handle a renderer might need is its own business.

use crate::helpe::*;

/// Block column of an allocation row. Block numbers are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockNo {
    At(Steps),
    NotAllocated,
}

impl fmt::Display for BlockNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockNo::At(n)          => write!(f, "{n}"),
            BlockNo::NotAllocated   => write!(f, "Not Allocated"),
        }
    }
}

/// Time column of an allocation row, and the payload of live
/// countdown updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeCell {
    Units(Steps),
    Completed,
    NotApplicable,
}

impl fmt::Display for TimeCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeCell::Units(t)      => write!(f, "{t}"),
            TimeCell::Completed     => write!(f, "Completed"),
            TimeCell::NotApplicable => write!(f, "N/A"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationRow {
    pub id:         ProcId,
    pub size:       Steps,
    pub block_no:   BlockNo,
    pub time:       TimeCell,
}

impl From<&AllocationRecord> for AllocationRow {
    fn from(r: &AllocationRecord) -> Self {
        Self {
            id:         r.process_id,
            size:       r.size,
            block_no:   match r.block_start {
                Some(s) => BlockNo::At(s + 1),
                None    => BlockNo::NotAllocated,
            },
            time:       match r.status {
                Status::NotAllocated    => TimeCell::NotApplicable,
                _                       => TimeCell::Units(r.time),
            },
        }
    }
}

/// Which moment a [Snapshot] was taken at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    InitialAllocation,
    NoCoalescingNeeded,
    AfterCompaction,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::InitialAllocation    => "Initial Allocation",
            Phase::NoCoalescingNeeded   => "No Coalescing Needed",
            Phase::AfterCompaction      => "After Compaction",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Memory occupancy at some [Phase]: one entry per cell, `0` for
/// free, owner id otherwise. Good enough to stack into a chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub phase:  Phase,
    pub cells:  Vec<ProcId>,
}

impl Snapshot {
    pub fn of(memory: &Memory, phase: Phase) -> Self {
        Self {
            phase,
            cells: memory.owners(),
        }
    }

    pub fn free_cells(&self) -> Steps {
        self.cells.iter().filter(|&&c| c == 0).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Longest allocated process time plus compaction and coalescing
    /// times. The two halves come in different units (ticks vs. ms);
    /// the sum is reported raw, exactly as it has always been.
    pub final_time:         u64,
    /// The smallest *submitted* process, allocated or not. `None`
    /// only when nothing was submitted.
    pub smallest:           Option<Process>,
}

impl Summary {
    /// The renderer's unit conversion: ms to s.
    pub fn final_time_secs(&self) -> f64 {
        self.final_time as f64 / 1000.0
    }
}

/// Everything the engine has to say. Implementors decide what
/// "saying" means: a table, a chart, a log, a test vector.
pub trait Reporter {
    /// One row per process, in placement order.
    fn allocation_rows(&mut self, rows: &[AllocationRow]);
    /// A live countdown value for process `id`, or its completion.
    fn remaining_time(&mut self, id: ProcId, time: TimeCell);
    fn memory_snapshot(&mut self, snapshot: &Snapshot);
    /// A coalescing attempt has finished, either way.
    fn coalescing_done(&mut self, outcome: &Coalesced, message: &str);
    fn summary(&mut self, summary: &Summary);
    /// Process `id` gave back `freed` cells. Most renderers don't care.
    fn process_released(&mut self, _id: ProcId, _freed: Steps) {}
}

/// A [Reporter] that swallows everything.
pub struct Silent;

impl Reporter for Silent {
    fn allocation_rows(&mut self, _: &[AllocationRow]) {}
    fn remaining_time(&mut self, _: ProcId, _: TimeCell) {}
    fn memory_snapshot(&mut self, _: &Snapshot) {}
    fn coalescing_done(&mut self, _: &Coalesced, _: &str) {}
    fn summary(&mut self, _: &Summary) {}
}

//---START RECORDING
/// A single call made on a [Reporter], frozen.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Rows(Vec<AllocationRow>),
    Remaining(ProcId, TimeCell),
    Snapshot(Snapshot),
    Coalesced(Coalesced, String),
    Summary(Summary),
    Released(ProcId, Steps),
}

/// Keeps every event, in the order it happened. This is the
/// ordering log: if it says B ticked before A's coalescing
/// reported, the scheduler is broken.
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<Event>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Option<&[AllocationRow]> {
        self.events
            .iter()
            .find_map(|e| match e {
                Event::Rows(r)  => Some(r.as_slice()),
                _               => None,
            })
    }

    pub fn snapshots(&self) -> Vec<&Snapshot> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Snapshot(s)  => Some(s),
                _                   => None,
            })
            .collect()
    }

    /// Every countdown value reported for process `id`.
    pub fn countdown_of(&self, id: ProcId) -> Vec<TimeCell> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Remaining(who, t) if *who == id  => Some(*t),
                _                                       => None,
            })
            .collect()
    }

    pub fn coalescings(&self) -> Vec<&Coalesced> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Coalesced(c, _)  => Some(c),
                _                       => None,
            })
            .collect()
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.events
            .iter()
            .find_map(|e| match e {
                Event::Summary(s)   => Some(s),
                _                   => None,
            })
    }

    /// Index of the first event satisfying `pred`.
    pub fn position<P>(&self, pred: P) -> Option<usize>
    where P: FnMut(&Event) -> bool {
        self.events.iter().position(pred)
    }

    /// Index of the last event satisfying `pred`.
    pub fn last_position<P>(&self, pred: P) -> Option<usize>
    where P: FnMut(&Event) -> bool {
        self.events.iter().rposition(pred)
    }
}

impl Reporter for Recorder {
    fn allocation_rows(&mut self, rows: &[AllocationRow]) {
        self.events.push(Event::Rows(rows.to_vec()));
    }

    fn remaining_time(&mut self, id: ProcId, time: TimeCell) {
        self.events.push(Event::Remaining(id, time));
    }

    fn memory_snapshot(&mut self, snapshot: &Snapshot) {
        self.events.push(Event::Snapshot(snapshot.clone()));
    }

    fn coalescing_done(&mut self, outcome: &Coalesced, message: &str) {
        self.events.push(Event::Coalesced(*outcome, message.to_owned()));
    }

    fn summary(&mut self, summary: &Summary) {
        self.events.push(Event::Summary(summary.clone()));
    }

    fn process_released(&mut self, id: ProcId, freed: Steps) {
        self.events.push(Event::Released(id, freed));
    }
}
//---END RECORDING

//---START CONSOLE RENDERING
/// Draws the simulation as plain text: a table, a countdown
/// ticker, and a one-line occupancy bar per snapshot.
pub struct ConsoleReporter<W: Write> {
    out:    W,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    // A renderer that can't write has nobody to complain to
    // but the log.
    fn emit(&mut self, line: fmt::Arguments<'_>) {
        if let Err(e) = self.out.write_fmt(line).and_then(|_| self.out.write_all(b"\n")) {
            warn!("Console output failed: {e}");
        }
    }
}

impl ConsoleReporter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn allocation_rows(&mut self, rows: &[AllocationRow]) {
        self.emit(format_args!("{:>6}\t{:>6}\t{:>14}\t{:>6}", "ID", "Size", "Block", "Time"));
        for r in rows {
            self.emit(format_args!("{:>6}\t{:>6}\t{:>14}\t{:>6}", r.id, r.size, r.block_no, r.time));
        }
    }

    fn remaining_time(&mut self, id: ProcId, time: TimeCell) {
        self.emit(format_args!("Process {id}: {time}"));
    }

    fn memory_snapshot(&mut self, snapshot: &Snapshot) {
        let bar: String = snapshot.cells
            .iter()
            .map(|&c| if c == 0 { '.' } else { char::from_digit(c % 36, 36).unwrap_or('?') })
            .collect();
        self.emit(format_args!(
            "[{bar}] {} ({} of {} cells free)",
            snapshot.phase,
            snapshot.free_cells(),
            snapshot.cells.len()
        ));
    }

    fn coalescing_done(&mut self, _: &Coalesced, message: &str) {
        self.emit(format_args!("{message}"));
    }

    fn summary(&mut self, summary: &Summary) {
        self.emit(format_args!("Final time unit:\t{} s", summary.final_time_secs()));
        match summary.smallest {
            Some(p) => {
                self.emit(format_args!("Smallest process:\t{} KB, {} units", p.size, p.time));
            },
            None    => {
                self.emit(format_args!("Smallest process:\tnone"));
            }
        }
    }
}
//---END CONSOLE RENDERING

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(status: Status, block_start: Option<Steps>) -> AllocationRecord {
        AllocationRecord {
            process_id: 3,
            size:       5,
            time:       2,
            block_start,
            status,
        }
    }

    #[test]
    fn rows_use_sentinels_for_failures() {
        let ok = AllocationRow::from(&record(Status::Allocated, Some(0)));
        assert_eq!(ok.block_no.to_string(), "1");
        assert_eq!(ok.time.to_string(), "2");

        let ko = AllocationRow::from(&record(Status::NotAllocated, None));
        assert_eq!(ko.block_no.to_string(), "Not Allocated");
        assert_eq!(ko.time.to_string(), "N/A");
    }

    #[test]
    fn console_draws_bars() {
        let mut con = ConsoleReporter::new(Vec::new());
        con.memory_snapshot(&Snapshot {
            phase:  Phase::AfterCompaction,
            cells:  vec![1, 1, 2, 0],
        });
        let text = String::from_utf8(con.into_inner()).unwrap();
        assert_eq!(text, "[112.] After Compaction (1 of 4 cells free)\n");
    }
}
