//! # Timeline logs
//!
//! The four parallel per-tick logs the engine emits as it runs, plus the
//! row types that make them up. All rows are plain data; the engine
//! appends, the host reads.

/// One row of the execution log: what ran during a given tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionEntry {
    pub tick: u64,
    /// The id of the task that executed, or `None` for an idle tick.
    pub task_id: Option<String>,
    pub color: String,
    pub lottery_used: bool,
}

/// One row of the mutex-block log: a task spent this tick blocked on a
/// mutex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutexBlockEntry {
    pub tick: u64,
    pub task_id: String,
}

/// One row of the I/O log: a task spent this tick blocked on I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoEntry {
    pub tick: u64,
    pub task_id: String,
}

/// What happened to a mutex during a [`MutexEventEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutexEventKind {
    Lock,
    LockFailed,
    Unlock,
}

/// One row of the mutex-event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutexEventEntry {
    pub tick: u64,
    pub task_id: String,
    pub kind: MutexEventKind,
    pub mutex_id: u32,
}

/// The full set of logs accumulated over a run.
#[derive(Debug, Clone, Default)]
pub struct Timelines {
    pub execution: Vec<ExecutionEntry>,
    pub mutex_block: Vec<MutexBlockEntry>,
    pub io: Vec<IoEntry>,
    pub mutex_event: Vec<MutexEventEntry>,
}

impl Timelines {
    pub fn new() -> Self {
        Self::default()
    }
}
