/// Worker state definitions for tracking the pool during a crawl
///
/// Each worker moves through `Idle -> Fetching -> Extracting -> Dispatching
/// -> Idle` until it reaches `Stopped`, which is terminal.
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Represents what a single worker is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerState {
    /// Waiting on the frontier (or on cancellation)
    Idle,

    /// Checking the visited set and fetching a page
    Fetching,

    /// Extracting links from a fetched HTML page
    Extracting,

    /// Filtering extracted links and pushing them to the frontier
    Dispatching,

    /// The worker loop has exited
    Stopped,
}

impl WorkerState {
    /// Returns true if the worker has left its loop for good
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    fn as_u8(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Fetching => 1,
            Self::Extracting => 2,
            Self::Dispatching => 3,
            Self::Stopped => 4,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::Fetching,
            2 => Self::Extracting,
            3 => Self::Dispatching,
            _ => Self::Stopped,
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::Dispatching => "dispatching",
            Self::Stopped => "stopped",
        };
        write!(f, "{}", s)
    }
}

/// Lock-free board holding the current state of every worker
///
/// Slots start out `Idle`. Each worker only ever writes its own slot; anyone
/// may read.
#[derive(Debug)]
pub struct WorkerBoard {
    slots: Vec<AtomicU8>,
}

impl WorkerBoard {
    pub fn new(workers: usize) -> Self {
        let slots = (0..workers)
            .map(|_| AtomicU8::new(WorkerState::Idle.as_u8()))
            .collect();
        Self { slots }
    }

    /// Records a transition for worker `id`
    ///
    /// Ignored once the worker is `Stopped` and for unknown ids.
    pub fn set(&self, id: usize, state: WorkerState) {
        if let Some(slot) = self.slots.get(id) {
            let _ = slot.fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                if WorkerState::from_u8(current).is_terminal() {
                    None
                } else {
                    Some(state.as_u8())
                }
            });
        }
    }

    pub fn get(&self, id: usize) -> Option<WorkerState> {
        self.slots
            .get(id)
            .map(|slot| WorkerState::from_u8(slot.load(Ordering::Acquire)))
    }

    /// Current state of every worker, indexed by worker id
    pub fn snapshot(&self) -> Vec<WorkerState> {
        self.slots
            .iter()
            .map(|slot| WorkerState::from_u8(slot.load(Ordering::Acquire)))
            .collect()
    }

    /// Number of workers that have not reached `Stopped`
    pub fn active(&self) -> usize {
        self.snapshot().iter().filter(|s| !s.is_terminal()).count()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Marks a worker `Stopped` when dropped, including on panic or task abort
pub struct StopGuard<'a> {
    board: &'a WorkerBoard,
    id: usize,
}

impl<'a> StopGuard<'a> {
    pub fn new(board: &'a WorkerBoard, id: usize) -> Self {
        Self { board, id }
    }
}

impl Drop for StopGuard<'_> {
    fn drop(&mut self) {
        self.board.set(self.id, WorkerState::Stopped);
    }
}
