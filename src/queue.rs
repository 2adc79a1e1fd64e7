use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, Mutex};

use crate::job::JobRequest;

#[derive(Error, Debug)]
pub enum QueueError {
    /// Every receiver is gone; nothing can consume the job.
    #[error("queue closed")]
    Closed,
}

/// Producer half of the job queue. Cheap to clone; every submitter holds one.
///
/// The queue is a hand-off channel, not a job table: each admitted request is
/// delivered to exactly one consumer, and state lives in the result store.
#[derive(Debug, Clone)]
pub struct JobQueue {
    tx: mpsc::UnboundedSender<JobRequest>,
}

/// Consumer half, shared by all workers. The receiver sits behind an async
/// mutex so concurrent workers compete for deliveries without duplication.
#[derive(Debug)]
pub struct JobReceiver {
    rx: Mutex<mpsc::UnboundedReceiver<JobRequest>>,
}

impl JobQueue {
    pub fn new() -> (JobQueue, JobReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (JobQueue { tx }, JobReceiver { rx: Mutex::new(rx) })
    }

    /// Admit a job for execution. Returns immediately in both modes: a zero
    /// delay makes the request eligible for dequeue at once, otherwise a
    /// timer task holds it until `delay` has elapsed.
    pub fn enqueue(&self, request: JobRequest, delay: Duration) -> Result<(), QueueError> {
        if delay.is_zero() {
            return self.tx.send(request).map_err(|_| QueueError::Closed);
        }

        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let job_id = request.id;
            if tx.send(request).is_err() {
                tracing::warn!(job_id = %job_id, "Queue closed before delayed job became due");
            }
        });
        Ok(())
    }
}

impl JobReceiver {
    /// Wait until a job is available and take ownership of it. Each request
    /// is handed to exactly one caller. Returns `None` once every producer
    /// is gone and the channel has drained.
    pub async fn dequeue(&self) -> Option<JobRequest> {
        self.rx.lock().await.recv().await
    }
}
