use thiserror::Error;
use uuid::Uuid;

use crate::job::JobKind;
use crate::queue::QueueError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum TaskmillError {
    #[error("Invalid job arguments: {0}")]
    InvalidArgs(String),

    #[error("Job not found: {0}")]
    JobNotFound(Uuid),

    #[error("Result store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    #[error("Job queue unavailable: {0}")]
    QueueUnavailable(#[from] QueueError),

    #[error("No handler registered for job kind {0}")]
    UnknownJobKind(JobKind),
}

pub type Result<T> = std::result::Result<T, TaskmillError>;
