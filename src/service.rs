use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, TaskmillError};
use crate::job::{JobKind, JobRecord, JobState};
use crate::queue::JobQueue;
use crate::store::{result_key, ResultStore, RESULT_KEY_PREFIX};

/// Upper bound (exclusive) on the seconds argument of a sleep job.
const MAX_SLEEP_SECS: u64 = 3600;

/// Read-model view of a job record, served to clients.
#[derive(Debug, Clone, Serialize)]
pub struct JobStatus {
    pub id: Uuid,
    pub state: JobState,
    pub result: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<JobRecord> for JobStatus {
    fn from(record: JobRecord) -> Self {
        Self {
            id: record.id,
            state: record.state,
            result: record.result,
            completed_at: record.completed_at,
        }
    }
}

/// Field a bulk listing is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Id,
    #[default]
    Date,
    Result,
    State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Submission and query API: the narrow interface the request-handling
/// layer calls into. Owns writing the Pending record and admitting the job;
/// every later mutation belongs to the worker pool.
#[derive(Clone)]
pub struct JobService {
    store: Arc<dyn ResultStore>,
    queue: JobQueue,
}

impl JobService {
    pub fn new(store: Arc<dyn ResultStore>, queue: JobQueue) -> Self {
        Self { store, queue }
    }

    /// Validate and admit a new job, optionally delayed.
    ///
    /// The Pending record is written to the store before the job is
    /// enqueued, so a status lookup immediately after submission finds it.
    pub async fn submit(&self, kind: JobKind, args: Vec<u64>, delay: Duration) -> Result<Uuid> {
        validate_args(kind, &args)?;

        let record = JobRecord::new(kind, args);
        let id = record.id;
        let request = record.request();

        self.store.put(&result_key(&id), record).await?;
        self.queue.enqueue(request, delay)?;

        tracing::info!(job_id = %id, kind = %kind, delay_secs = delay.as_secs(), "Job submitted");
        Ok(id)
    }

    /// Point lookup by job id.
    pub async fn get_status(&self, id: Uuid) -> Result<JobStatus> {
        self.store
            .get(&result_key(&id))
            .await?
            .map(JobStatus::from)
            .ok_or(TaskmillError::JobNotFound(id))
    }

    /// Fetch every known record, sorted by `field`.
    ///
    /// Fields compare as strings, numeric results included; a record missing
    /// the field compares as the empty string. The sort is stable.
    pub async fn list_status(&self, field: SortField, order: SortOrder) -> Result<Vec<JobStatus>> {
        let records = self.store.list(RESULT_KEY_PREFIX).await?;
        let mut statuses: Vec<JobStatus> = records.into_iter().map(JobStatus::from).collect();
        statuses.sort_by(|a, b| {
            let (ka, kb) = (sort_key(a, field), sort_key(b, field));
            match order {
                SortOrder::Asc => ka.cmp(&kb),
                SortOrder::Desc => kb.cmp(&ka),
            }
        });
        Ok(statuses)
    }
}

fn sort_key(status: &JobStatus, field: SortField) -> String {
    match field {
        SortField::Id => status.id.to_string(),
        SortField::Date => status
            .completed_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_default(),
        SortField::Result => status.result.clone().unwrap_or_default(),
        SortField::State => status.state.to_string(),
    }
}

fn validate_args(kind: JobKind, args: &[u64]) -> Result<()> {
    match kind {
        JobKind::Sleep => match args {
            [seconds] if *seconds > 0 && *seconds < MAX_SLEEP_SECS => Ok(()),
            [seconds] => Err(TaskmillError::InvalidArgs(format!(
                "sleep seconds must be greater than 0 and less than {}, got {}",
                MAX_SLEEP_SECS, seconds
            ))),
            _ => Err(TaskmillError::InvalidArgs(format!(
                "sleep takes exactly one argument, got {}",
                args.len()
            ))),
        },
        JobKind::Fibonacci => match args {
            [_] => Ok(()),
            _ => Err(TaskmillError::InvalidArgs(format!(
                "fibonacci takes exactly one argument, got {}",
                args.len()
            ))),
        },
    }
}
