use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::job::JobKind;

/// Error raised by a job's own computation. The worker converts it into a
/// terminal Failure record; it never surfaces as a system error.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct ComputationError(pub String);

#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn run(&self, args: &[u64]) -> Result<String, ComputationError>;
}

/// Fixed mapping from job kind to its computation, resolved once at pool
/// startup. A kind without a handler at dequeue time is a configuration
/// error, not a droppable job.
pub struct JobRegistry {
    handlers: HashMap<JobKind, Arc<dyn JobHandler>>,
}

impl JobRegistry {
    /// Registry holding the two built-in computations.
    pub fn builtin() -> Self {
        let mut handlers: HashMap<JobKind, Arc<dyn JobHandler>> = HashMap::new();
        handlers.insert(JobKind::Sleep, Arc::new(SleepTask));
        handlers.insert(JobKind::Fibonacci, Arc::new(FibonacciTask));
        Self { handlers }
    }

    pub fn resolve(&self, kind: JobKind) -> Option<Arc<dyn JobHandler>> {
        self.handlers.get(&kind).cloned()
    }
}

fn single_arg(args: &[u64]) -> Result<u64, ComputationError> {
    match args {
        [value] => Ok(*value),
        _ => Err(ComputationError(format!(
            "expected exactly 1 argument, got {}",
            args.len()
        ))),
    }
}

/// Sleeps for `args[0]` seconds, then reports how long it slept. Models a
/// long-running external operation that occupies its worker slot for the
/// full duration.
pub struct SleepTask;

#[async_trait]
impl JobHandler for SleepTask {
    async fn run(&self, args: &[u64]) -> Result<String, ComputationError> {
        let seconds = single_arg(args)?;
        tokio::time::sleep(Duration::from_secs(seconds)).await;
        Ok(format!("Slept for {} second(s)", seconds))
    }
}

/// Iterative Fibonacci, 1-indexed with F(1) = F(2) = 1, pausing one second
/// between steps so a long-running computation stays observable in flight.
pub struct FibonacciTask;

#[async_trait]
impl JobHandler for FibonacciTask {
    async fn run(&self, args: &[u64]) -> Result<String, ComputationError> {
        let n = single_arg(args)?;

        let (mut a, mut b): (u128, u128) = (1, 1);
        for step in 1..n {
            tokio::time::sleep(Duration::from_secs(1)).await;
            let next = a.checked_add(b).ok_or_else(|| {
                ComputationError(format!("fibonacci overflow at step {}", step))
            })?;
            a = b;
            b = next;
        }
        Ok(a.to_string())
    }
}
