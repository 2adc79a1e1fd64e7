use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobKind {
    Sleep,
    Fibonacci,
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobKind::Sleep => write!(f, "SLEEP"),
            JobKind::Fibonacci => write!(f, "FIBONACCI"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobState {
    Pending,
    Started,
    Success,
    Failure,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Success | JobState::Failure)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobState::Pending => write!(f, "PENDING"),
            JobState::Started => write!(f, "STARTED"),
            JobState::Success => write!(f, "SUCCESS"),
            JobState::Failure => write!(f, "FAILURE"),
        }
    }
}

/// What travels on the queue: the immutable identity of a job to execute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRequest {
    pub id: Uuid,
    pub kind: JobKind,
    pub args: Vec<u64>,
}

/// The unit of state in the result store. `id`, `kind` and `args` are fixed
/// at submission; `state`, `result` and `completed_at` are written only by
/// the worker that claimed the job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: Uuid,
    pub kind: JobKind,
    pub args: Vec<u64>,
    pub state: JobState,
    pub result: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl JobRecord {
    pub fn new(kind: JobKind, args: Vec<u64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            args,
            state: JobState::Pending,
            result: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Rebuild a pending record from a queued request. Used when a delivery
    /// arrives and the store has no record under the job's key.
    pub fn from_request(request: &JobRequest) -> Self {
        Self {
            id: request.id,
            kind: request.kind,
            args: request.args.clone(),
            state: JobState::Pending,
            result: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Claim transition: Pending -> Started.
    pub fn start(&mut self) {
        debug_assert_eq!(self.state, JobState::Pending);
        self.state = JobState::Started;
    }

    /// Terminal transition. `result` and `completed_at` are stamped together
    /// and never change afterwards.
    pub fn complete(&mut self, state: JobState, result: String) {
        debug_assert!(state.is_terminal());
        debug_assert!(!self.state.is_terminal());
        self.state = state;
        self.result = Some(result);
        self.completed_at = Some(Utc::now());
    }

    pub fn request(&self) -> JobRequest {
        JobRequest {
            id: self.id,
            kind: self.kind,
            args: self.args.clone(),
        }
    }
}
