//! Job queue tests: hand-off semantics, FIFO for immediate jobs, delayed
//! admission, and closure behavior.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use taskmill::job::{JobKind, JobRequest};
use taskmill::queue::JobQueue;
use uuid::Uuid;

fn request() -> JobRequest {
    JobRequest {
        id: Uuid::new_v4(),
        kind: JobKind::Sleep,
        args: vec![1],
    }
}

#[tokio::test]
async fn immediate_jobs_dequeue_in_fifo_order() {
    let (queue, receiver) = JobQueue::new();

    let first = request();
    let second = request();
    let third = request();
    queue.enqueue(first.clone(), Duration::ZERO).unwrap();
    queue.enqueue(second.clone(), Duration::ZERO).unwrap();
    queue.enqueue(third.clone(), Duration::ZERO).unwrap();

    assert_eq!(receiver.dequeue().await.unwrap().id, first.id);
    assert_eq!(receiver.dequeue().await.unwrap().id, second.id);
    assert_eq!(receiver.dequeue().await.unwrap().id, third.id);
}

#[tokio::test(start_paused = true)]
async fn zero_delay_job_is_available_at_once() {
    let (queue, receiver) = JobQueue::new();

    queue.enqueue(request(), Duration::ZERO).unwrap();
    let delivered = tokio::time::timeout(Duration::from_millis(10), receiver.dequeue()).await;
    assert!(delivered.is_ok());
}

#[tokio::test(start_paused = true)]
async fn delayed_job_is_held_until_due() {
    let (queue, receiver) = JobQueue::new();

    let delayed = request();
    queue
        .enqueue(delayed.clone(), Duration::from_secs(10))
        .unwrap();

    // Not available at the halfway point
    let early = tokio::time::timeout(Duration::from_secs(5), receiver.dequeue()).await;
    assert!(early.is_err());

    // Due after the full delay
    let late = tokio::time::timeout(Duration::from_secs(10), receiver.dequeue()).await;
    assert_eq!(late.unwrap().unwrap().id, delayed.id);
}

#[tokio::test(start_paused = true)]
async fn delayed_job_does_not_block_immediate_jobs() {
    let (queue, receiver) = JobQueue::new();

    let slow = request();
    let fast = request();
    queue.enqueue(slow.clone(), Duration::from_secs(30)).unwrap();
    queue.enqueue(fast.clone(), Duration::ZERO).unwrap();

    assert_eq!(receiver.dequeue().await.unwrap().id, fast.id);
    assert_eq!(receiver.dequeue().await.unwrap().id, slow.id);
}

#[tokio::test]
async fn each_request_is_delivered_to_exactly_one_consumer() {
    let (queue, receiver) = JobQueue::new();
    let receiver = Arc::new(receiver);

    let mut submitted = HashSet::new();
    for _ in 0..20 {
        let req = request();
        submitted.insert(req.id);
        queue.enqueue(req, Duration::ZERO).unwrap();
    }
    drop(queue);

    let mut consumers = Vec::new();
    for _ in 0..2 {
        let receiver = receiver.clone();
        consumers.push(tokio::spawn(async move {
            let mut seen = Vec::new();
            while let Some(req) = receiver.dequeue().await {
                seen.push(req.id);
            }
            seen
        }));
    }

    let mut delivered = Vec::new();
    for consumer in consumers {
        delivered.extend(consumer.await.unwrap());
    }

    assert_eq!(delivered.len(), submitted.len());
    let unique: HashSet<_> = delivered.into_iter().collect();
    assert_eq!(unique, submitted);
}

#[tokio::test]
async fn enqueue_fails_once_every_receiver_is_gone() {
    let (queue, receiver) = JobQueue::new();
    drop(receiver);

    assert!(queue.enqueue(request(), Duration::ZERO).is_err());
}
