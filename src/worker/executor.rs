use std::sync::Arc;

use crate::config::RetryConfig;
use crate::error::{Result, TaskmillError};
use crate::job::{JobRecord, JobRequest, JobState};
use crate::registry::JobRegistry;
use crate::store::{result_key, ResultStore};

/// Runs a single claimed job to a terminal state.
///
/// The executor owns every record mutation after submission: the Started
/// claim, then exactly one terminal write. Transient store failures are
/// retried per [`RetryConfig`] before they are reported.
#[derive(Clone)]
pub struct JobExecutor {
    store: Arc<dyn ResultStore>,
    registry: Arc<JobRegistry>,
    retry: RetryConfig,
}

impl JobExecutor {
    pub fn new(store: Arc<dyn ResultStore>, registry: Arc<JobRegistry>, retry: RetryConfig) -> Self {
        Self {
            store,
            registry,
            retry,
        }
    }

    /// Execute one dequeued request.
    ///
    /// A failing computation is not an error here; it becomes a terminal
    /// Failure record. Errors are reserved for an unresolvable job kind and
    /// for a store that stays unreachable through the retry budget.
    pub async fn execute(&self, request: JobRequest) -> Result<()> {
        let handler = self
            .registry
            .resolve(request.kind)
            .ok_or(TaskmillError::UnknownJobKind(request.kind))?;

        let key = result_key(&request.id);
        let mut record = match self.get_with_retry(&key).await? {
            Some(record) => record,
            None => JobRecord::from_request(&request),
        };

        // At-least-once delivery: a redelivered job that already reached a
        // terminal state must not run again.
        if record.state.is_terminal() {
            tracing::debug!(job_id = %request.id, state = %record.state, "Skipping redelivered job");
            return Ok(());
        }

        record.start();
        self.put_with_retry(&key, record.clone()).await?;
        tracing::info!(job_id = %request.id, kind = %request.kind, "Job started");

        match handler.run(&request.args).await {
            Ok(result) => {
                record.complete(JobState::Success, result);
                tracing::info!(job_id = %request.id, "Job succeeded");
            }
            Err(e) => {
                record.complete(JobState::Failure, e.to_string());
                tracing::warn!(job_id = %request.id, error = %e, "Job failed");
            }
        }

        self.put_with_retry(&key, record).await?;
        Ok(())
    }

    async fn get_with_retry(&self, key: &str) -> Result<Option<JobRecord>> {
        let mut attempt = 1;
        loop {
            match self.store.get(key).await {
                Ok(record) => return Ok(record),
                Err(e) if attempt < self.retry.max_attempts => {
                    tracing::warn!(key, attempt, error = %e, "Store read failed, retrying");
                    tokio::time::sleep(self.retry.backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn put_with_retry(&self, key: &str, record: JobRecord) -> Result<()> {
        let mut attempt = 1;
        loop {
            match self.store.put(key, record.clone()).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt < self.retry.max_attempts => {
                    tracing::warn!(key, attempt, error = %e, "Store write failed, retrying");
                    tokio::time::sleep(self.retry.backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
