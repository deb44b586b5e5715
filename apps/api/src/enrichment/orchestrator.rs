//! Enrichment Orchestrator: a bounded worker pool that runs section generation
//! for batches of tasks.
//!
//! # Scheduling
//! One priority queue is shared by every batch. Jobs pop in order of batch
//! priority, then task priority, then submission order. `concurrency` workers
//! pull from the queue, so at most that many generations run at once no matter
//! how many batches are in flight.
//!
//! # Timeouts
//! `await_batch` never waits past `submitted_at + timeout`. Tasks not finished
//! by then are reported `timed_out` and their results discarded if they arrive
//! later. A worker skips any queued job whose waiter has already gone, and
//! bounds each generation by the per-task timeout, so the queue always drains.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::{oneshot, Notify};
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::enrichment::generator::SectionGenerator;
use crate::enrichment::EnrichmentTask;
use crate::errors::AppError;
use crate::models::segment::{Priority, SemanticType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Queued,
    Running,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum TaskFailure {
    #[error("task timed out")]
    TimedOut,

    #[error("generation failed: {0}")]
    GenerationFailed(String),

    #[error("task was dropped by its worker")]
    WorkerDropped,
}

type TaskOutcome = Result<String, TaskFailure>;

/// Outcome of one task, at the task's position in the submitted batch.
#[derive(Debug, Clone, Serialize)]
pub struct TaskResult {
    pub index: usize,
    pub section_type: SemanticType,
    pub success: bool,
    pub content: Option<String>,
    pub error: Option<TaskFailure>,
}

impl TaskResult {
    fn new(index: usize, section_type: SemanticType, outcome: TaskOutcome) -> Self {
        match outcome {
            Ok(content) => Self {
                index,
                section_type,
                success: true,
                content: Some(content),
                error: None,
            },
            Err(failure) => Self {
                index,
                section_type,
                success: false,
                content: None,
                error: Some(failure),
            },
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared view of a batch's per-task lifecycle. Stays valid after the batch
/// has been awaited.
#[derive(Debug, Clone)]
pub struct TaskStates(Arc<Mutex<Vec<TaskState>>>);

impl TaskStates {
    fn new(len: usize) -> Self {
        Self(Arc::new(Mutex::new(vec![TaskState::Queued; len])))
    }

    fn set(&self, index: usize, state: TaskState) {
        if let Some(slot) = lock(&self.0).get_mut(index) {
            *slot = state;
        }
    }

    pub fn snapshot(&self) -> Vec<TaskState> {
        lock(&self.0).clone()
    }
}

struct QueuedJob {
    batch_priority: Priority,
    seq: u64,
    batch_id: Uuid,
    index: usize,
    task: EnrichmentTask,
    states: TaskStates,
    reply: oneshot::Sender<TaskOutcome>,
}

impl QueuedJob {
    fn rank(&self) -> (Priority, Priority, Reverse<u64>) {
        (self.batch_priority, self.task.priority, Reverse(self.seq))
    }
}

impl PartialEq for QueuedJob {
    fn eq(&self, other: &Self) -> bool {
        self.rank() == other.rank()
    }
}

impl Eq for QueuedJob {}

impl PartialOrd for QueuedJob {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedJob {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

/// Returned by `submit_batch`; consumed by `await_batch`.
pub struct BatchHandle {
    pub batch_id: Uuid,
    submitted_at: Instant,
    section_types: Vec<SemanticType>,
    receivers: Vec<oneshot::Receiver<TaskOutcome>>,
    states: TaskStates,
}

impl BatchHandle {
    pub fn len(&self) -> usize {
        self.receivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receivers.is_empty()
    }

    pub fn task_states(&self) -> TaskStates {
        self.states.clone()
    }
}

struct Shared {
    queue: Mutex<BinaryHeap<QueuedJob>>,
    notify: Notify,
    generator: Arc<dyn SectionGenerator>,
    task_timeout: Duration,
    next_seq: AtomicU64,
}

impl Shared {
    /// Registers as a waiter before checking the queue so a submit landing
    /// between the check and the wait still wakes this worker.
    async fn next_job(&self) -> QueuedJob {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let next = lock(&self.queue).pop();
            if let Some(job) = next {
                return job;
            }
            notified.await;
        }
    }
}

#[derive(Clone)]
pub struct EnrichmentOrchestrator {
    shared: Arc<Shared>,
}

impl EnrichmentOrchestrator {
    /// Spawns `concurrency` workers (at least one) on the current tokio runtime.
    pub fn new(generator: Arc<dyn SectionGenerator>, concurrency: usize, task_timeout: Duration) -> Self {
        let concurrency = concurrency.max(1);
        let shared = Arc::new(Shared {
            queue: Mutex::new(BinaryHeap::new()),
            notify: Notify::new(),
            generator,
            task_timeout,
            next_seq: AtomicU64::new(0),
        });

        for worker_id in 0..concurrency {
            tokio::spawn(worker_loop(Arc::clone(&shared), worker_id));
        }
        info!(
            "Enrichment orchestrator started: {concurrency} worker(s), task timeout {}ms",
            task_timeout.as_millis()
        );

        Self { shared }
    }

    /// Queues every task of the batch. Never blocks on generation.
    pub fn submit_batch(&self, tasks: Vec<EnrichmentTask>, priority: Priority) -> BatchHandle {
        let submitted_at = Instant::now();
        let batch_id = Uuid::new_v4();
        let states = TaskStates::new(tasks.len());
        let mut section_types = Vec::with_capacity(tasks.len());
        let mut receivers = Vec::with_capacity(tasks.len());

        {
            let mut queue = lock(&self.shared.queue);
            for (index, task) in tasks.into_iter().enumerate() {
                let (reply, receiver) = oneshot::channel();
                section_types.push(task.section_type);
                receivers.push(receiver);
                queue.push(QueuedJob {
                    batch_priority: priority,
                    seq: self.shared.next_seq.fetch_add(1, AtomicOrdering::Relaxed),
                    batch_id,
                    index,
                    task,
                    states: states.clone(),
                    reply,
                });
            }
        }
        for _ in 0..receivers.len() {
            self.shared.notify.notify_one();
        }

        info!(
            "Submitted enrichment batch {batch_id}: {} task(s) at {priority:?} priority",
            receivers.len()
        );

        BatchHandle {
            batch_id,
            submitted_at,
            section_types,
            receivers,
            states,
        }
    }

    /// Collects one result per submitted task, in submission order, returning
    /// no later than `timeout` after the batch was submitted.
    pub async fn await_batch(&self, handle: BatchHandle, timeout: Duration) -> Vec<TaskResult> {
        let deadline = handle.submitted_at + timeout;
        let batch_id = handle.batch_id;
        let mut results = Vec::with_capacity(handle.receivers.len());

        for (index, (receiver, section_type)) in handle
            .receivers
            .into_iter()
            .zip(handle.section_types)
            .enumerate()
        {
            let outcome = match tokio::time::timeout_at(deadline, receiver).await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(_)) => Err(TaskFailure::WorkerDropped),
                Err(_) => Err(TaskFailure::TimedOut),
            };
            results.push(TaskResult::new(index, section_type, outcome));
        }

        let succeeded = results.iter().filter(|r| r.success).count();
        let timed_out = results
            .iter()
            .filter(|r| r.error == Some(TaskFailure::TimedOut))
            .count();
        if timed_out > 0 {
            warn!("Enrichment batch {batch_id}: {timed_out} task(s) timed out");
        }
        info!(
            "Enrichment batch {batch_id} finished: {succeeded}/{} succeeded",
            results.len()
        );
        results
    }
}

/// Batch-level failure when not a single task produced content.
pub fn require_success(results: &[TaskResult]) -> Result<(), AppError> {
    if results.iter().any(|r| r.success) {
        return Ok(());
    }
    Err(AppError::EnrichmentFailed(format!(
        "none of the {} enrichment task(s) succeeded",
        results.len()
    )))
}

async fn worker_loop(shared: Arc<Shared>, worker_id: usize) {
    loop {
        let job = shared.next_job().await;

        if job.reply.is_closed() {
            debug!(
                "Worker {worker_id}: skipping task {}#{}, waiter gone",
                job.batch_id, job.index
            );
            job.states.set(job.index, TaskState::Failed);
            continue;
        }

        job.states.set(job.index, TaskState::Running);
        debug!(
            "Worker {worker_id}: running task {}#{} ({})",
            job.batch_id,
            job.index,
            job.task.section_type.slug()
        );

        let generator = Arc::clone(&shared.generator);
        let task = job.task.clone();
        let mut run = tokio::spawn(async move { generator.generate(&task).await });

        let outcome = match tokio::time::timeout(shared.task_timeout, &mut run).await {
            Ok(Ok(Ok(text))) if !text.trim().is_empty() => Ok(text),
            Ok(Ok(Ok(_))) => Err(TaskFailure::GenerationFailed(
                "generator returned empty content".to_string(),
            )),
            Ok(Ok(Err(e))) => Err(TaskFailure::GenerationFailed(e.to_string())),
            Ok(Err(join_error)) => {
                warn!("Worker {worker_id}: generation task aborted: {join_error}");
                Err(TaskFailure::WorkerDropped)
            }
            Err(_) => {
                run.abort();
                Err(TaskFailure::TimedOut)
            }
        };

        match &outcome {
            Ok(_) => {
                job.states.set(job.index, TaskState::Succeeded);
                debug!("Worker {worker_id}: task {}#{} succeeded", job.batch_id, job.index);
            }
            Err(failure) => {
                job.states.set(job.index, TaskState::Failed);
                warn!(
                    "Worker {worker_id}: task {}#{} failed: {failure}",
                    job.batch_id, job.index
                );
            }
        }

        if job.reply.send(outcome).is_err() {
            debug!(
                "Worker {worker_id}: discarding late result for {}#{}",
                job.batch_id, job.index
            );
        }
    }
}
