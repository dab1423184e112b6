pub use std::{
    io::{BufRead, BufReader, Write},
    collections::{HashSet, VecDeque},
    path::PathBuf,
    fmt,
    time::{Duration, Instant},
};
pub use thiserror::Error;
pub use itertools::Itertools;
pub use indexmap::IndexMap;
pub use clap::Parser;
pub use log::{debug, info, warn};

pub use crate::{Process, Memory, Simulation,
    procset::*,
    clock::*,
    config::*,
    report::*,
    algo::{
        coalesce::Coalesced,
        lifecycle::{Lifecycle, Scheduler, Stage},
    },
};

/// The unit for measuring both space (cells) and logical time.
/// `memsim` does not care about semantics: a size of 4 is four
/// cells, a time of 4 is four ticks.
///
/// Same trick as using one type for sizes and lifetimes in an
/// allocator trace. It keeps arithmetic between the two painless.
pub type Steps = usize;

/// Process identities are handed out 1-based, in submission order.
/// Zero is reserved: snapshots use it to mean "free".
pub type ProcId = u32;

/// The contents of a single memory cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Free,
    OwnedBy(ProcId),
}

impl Slot {
    #[inline(always)]
    pub fn is_free(&self) -> bool {
        matches!(self, Slot::Free)
    }

    #[inline(always)]
    pub fn owner(&self) -> Option<ProcId> {
        match self {
            Slot::Free          => None,
            Slot::OwnedBy(id)   => Some(*id),
        }
    }
}

/// Where a process stands. The only legal paths are
/// `Pending -> Allocated -> Completed` and `Pending -> NotAllocated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Pending,
    Allocated,
    Completed,
    NotAllocated,
}

/// One per process. Written once by placement; afterwards only
/// the scheduler touches it, and only its `status`.
///
/// `block_start` is the offset the process was *placed* at. Compaction
/// may later slide the process's cells toward the front; the record
/// keeps reporting the original placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationRecord {
    pub process_id:     ProcId,
    pub size:           Steps,
    pub time:           Steps,
    pub block_start:    Option<Steps>,
    pub status:         Status,
}

impl AllocationRecord {
    pub fn pending(p: &Process) -> Self {
        Self {
            process_id:     p.id,
            size:           p.size,
            time:           p.time,
            block_start:    None,
            status:         Status::Pending,
        }
    }
}

#[derive(Error, Debug)]
/// Everything that can go wrong *before* a simulation starts. Once
/// a [Simulation] exists, the only failure is a process not fitting,
/// and that is recorded as [Status::NotAllocated], not raised.
pub enum SimError {
    #[error("memory size must be positive")]
    ZeroMemory,
    #[error("process id 0 is reserved for free cells")]
    ReservedId,
    #[error("process id {0} submitted twice")]
    DuplicateId(ProcId),
    #[error("too many processes: ids must fit in a u32")]
    TooManyProcesses,
    #[error("line {line}: {message}")]
    Parse {
        line:       usize,
        message:    String,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

//---START EXTERNAL INTERFACES
// Collectors: anything that turns some data source into a list
// of `(size, time)` requests. Ids are assigned later, by
// `procset::init`, so that they always follow submission order.

/// Defines the interface for reading process requests.
///
/// The user can implement their own types as needed.
pub trait ProcGen<T> {
    fn new(path: PathBuf) -> Self;
    /// Reads every `(size, time)` request, in submission order.
    fn read_requests(&self) -> Result<Vec<(Steps, Steps)>, SimError>;
    /// Turns a single record into a request.
    fn gen_single(&self, d: T, line: usize) -> Result<(Steps, Steps), SimError>;
}

/// Reads a CSV of `size,time` rows. The first line is a header
/// and is skipped.
pub struct CSVProcParser {
    pub path: PathBuf,
}

impl ProcGen<&str> for CSVProcParser {
    fn new(path: PathBuf) -> Self {
        Self {
            path
        }
    }

    fn read_requests(&self) -> Result<Vec<(Steps, Steps)>, SimError> {
        let fd = std::fs::File::open(self.path.as_path())?;
        let reader = BufReader::new(fd);
        let mut res = vec![];
        for (idx, line) in reader.lines()
            .enumerate()
            // First line is the header!
            .skip(1) {
            let line = line?;
            if line.trim().is_empty() { continue; }
            // Humans count lines from 1.
            res.push(self.gen_single(&line, idx + 1)?);
        }

        Ok(res)
    }

    fn gen_single(&self, d: &str, line: usize) -> Result<(Steps, Steps), SimError> {
        let fields: Vec<&str> = d.split(',')
            .map(|x| x.trim())
            .collect();
        if fields.len() != 2 {
            return Err(SimError::Parse {
                line,
                message: format!("expected 2 fields (size,time), found {}", fields.len()),
            });
        }
        let parse = |what: &str, x: &str| {
            x.parse::<Steps>()
                .map_err(|e| SimError::Parse {
                    line,
                    message: format!("bad {what} {x:?}: {e}"),
                })
        };

        Ok((parse("size", fields[0])?, parse("time", fields[1])?))
    }
}

pub fn read_from_path<T, B>(file_path: PathBuf) -> Result<Vec<Process>, SimError>
where T: ProcGen<B> {
    let parser = T::new(file_path);
    let requests = parser.read_requests()?;

    crate::procset::init(requests)
}
//---END EXTERNAL INTERFACES
