//! Worker pool for executing queued jobs.
//!
//! Each worker is an independent task with its own dequeue loop; workers
//! share nothing beyond the queue (hand-off) and the result store (state):
//! - **Claiming**: the first write a worker makes is the Started record
//! - **Execution**: the computation is resolved through the job registry
//! - **Completion**: the terminal record carries the result or the error
//!   description; a computation failure never escapes the pool
//!
//! # Components
//!
//! - [`JobExecutor`]: runs a single claimed job to a terminal state
//! - [`WorkerPool`]: spawns the worker loops and drains them on shutdown
//!
//! # Execution Flow
//!
//! 1. Worker awaits [`JobReceiver::dequeue`](crate::queue::JobReceiver::dequeue)
//! 2. [`JobExecutor::execute`] writes Started, runs the handler
//! 3. Writes Success with the result, or Failure with the error description

pub mod executor;
pub mod pool;

pub use executor::JobExecutor;
pub use pool::WorkerPool;
