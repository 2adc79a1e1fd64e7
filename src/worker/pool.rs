use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::PoolConfig;
use crate::error::TaskmillError;
use crate::queue::JobReceiver;
use crate::registry::JobRegistry;
use crate::store::ResultStore;
use crate::worker::JobExecutor;

/// Pool of independent worker tasks, each running its own dequeue loop.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
    shutdown: CancellationToken,
}

impl WorkerPool {
    /// Spawn `config.workers` workers consuming from `receiver`.
    ///
    /// The registry is built once here; workers only resolve handlers by
    /// kind afterwards.
    pub fn start(config: PoolConfig, store: Arc<dyn ResultStore>, receiver: JobReceiver) -> Self {
        let registry = Arc::new(JobRegistry::builtin());
        let receiver = Arc::new(receiver);
        let shutdown = CancellationToken::new();

        let mut handles = Vec::with_capacity(config.workers);
        for worker_id in 0..config.workers {
            let executor = JobExecutor::new(store.clone(), registry.clone(), config.retry.clone());
            let receiver = receiver.clone();
            let token = shutdown.clone();
            handles.push(tokio::spawn(async move {
                worker_loop(worker_id, executor, receiver, token).await;
            }));
        }

        tracing::info!(workers = config.workers, "Worker pool started");
        Self { handles, shutdown }
    }

    /// Stop the pool: no further jobs are claimed, in-flight jobs run to
    /// their terminal write, then every worker task is awaited.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        for handle in self.handles {
            let _ = handle.await;
        }
        tracing::info!("Worker pool stopped");
    }
}

async fn worker_loop(
    worker_id: usize,
    executor: JobExecutor,
    receiver: Arc<JobReceiver>,
    token: CancellationToken,
) {
    loop {
        let request = tokio::select! {
            _ = token.cancelled() => break,
            request = receiver.dequeue() => match request {
                Some(request) => request,
                // Queue closed and drained
                None => break,
            },
        };

        tracing::debug!(worker_id, job_id = %request.id, "Job claimed");
        let job_id = request.id;
        match executor.execute(request).await {
            Ok(()) => {}
            Err(e @ TaskmillError::UnknownJobKind(_)) => {
                // Registry misconfiguration. Stop this worker rather than
                // keep pulling jobs it cannot run.
                tracing::error!(worker_id, job_id = %job_id, error = %e, "Fatal: unresolvable job kind");
                break;
            }
            Err(e) => {
                // Store stayed unreachable through the retry budget. The job
                // may be stuck in its last written state; remediation is the
                // operator's.
                tracing::error!(worker_id, job_id = %job_id, error = %e, "Job abandoned");
            }
        }
    }
    tracing::debug!(worker_id, "Worker exiting");
}
