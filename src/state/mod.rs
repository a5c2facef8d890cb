//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `WorkerState`: What a single worker is doing (idle, fetching, extracting, dispatching, stopped)
//! - `WorkerBoard`: Shared, lock-free view of every worker's state
//! - `StopGuard`: Marks a worker stopped however its task ends

mod worker_state;

// Re-export main types
pub use worker_state::{StopGuard, WorkerBoard, WorkerState};
