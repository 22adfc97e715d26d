//! Batch dispatcher
//!
//! Debounced, single-flight flushing of the log queue:
//!
//! ```text
//! Idle ──write──▶ Pending(timer armed) ──tick elapses──▶ Flushing ──▶ Idle
//!                   ▲          │
//!                   └─write────┘  (timer reset)
//! ```
//!
//! Every write resets the timer, so the flush body runs once per quiet period
//! no matter how many writes happened during it (trailing-edge debounce).

use super::shared::lock;
use crate::config::Credentials;
use crate::ports::transport::LogTransport;
use phospho_domain::LogQueue;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Result of one flush cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Nothing was ready to ship; the queue is untouched.
    Skipped,
    /// A batch of `events` records was accepted and removed from the queue.
    Sent { events: usize },
    /// The transport failed; the queue is untouched.
    Failed,
}

/// Debounce timer owned by the dispatcher.
///
/// `generation` identifies the most recently armed timer. A timer task only
/// flushes if it is still the current generation when it wakes up.
#[derive(Default)]
struct TimerSlot {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

struct DispatcherInner {
    queue: Arc<Mutex<LogQueue>>,
    transport: Arc<dyn LogTransport>,
    credentials: Option<Credentials>,
    tick: Duration,
    timer: Mutex<TimerSlot>,
    /// Serializes flush bodies: at most one batch is in flight.
    flush_lock: tokio::sync::Mutex<()>,
    runtime: Option<Handle>,
}

/// Debounced batch sender for the shared log queue.
///
/// Cloning is cheap; clones share the same timer and queue.
#[derive(Clone)]
pub struct BatchDispatcher {
    inner: Arc<DispatcherInner>,
}

impl BatchDispatcher {
    /// Create a dispatcher over `queue`.
    ///
    /// Captures the current tokio runtime (if any) so writes coming from
    /// threads outside the runtime can still arm the timer.
    pub fn new(
        queue: Arc<Mutex<LogQueue>>,
        transport: Arc<dyn LogTransport>,
        credentials: Option<Credentials>,
        tick: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                queue,
                transport,
                credentials,
                tick,
                timer: Mutex::new(TimerSlot::default()),
                flush_lock: tokio::sync::Mutex::new(()),
                runtime: Handle::try_current().ok(),
            }),
        }
    }

    /// Number of queued entries, ready or not.
    pub fn pending(&self) -> usize {
        lock(&self.inner.queue).len()
    }

    /// (Re)arm the debounce timer. A pending timer is cancelled.
    pub fn schedule(&self) {
        let Some(runtime) = Handle::try_current().ok().or_else(|| self.inner.runtime.clone())
        else {
            warn!("No tokio runtime available; queued log events wait for an explicit flush");
            return;
        };

        let mut slot = lock(&self.inner.timer);
        slot.generation += 1;
        let generation = slot.generation;
        if let Some(previous) = slot.handle.take() {
            previous.abort();
        }

        let inner = Arc::clone(&self.inner);
        slot.handle = Some(runtime.spawn(async move {
            tokio::time::sleep(inner.tick).await;
            if inner.claim_timer(generation) {
                inner.flush().await;
            }
        }));
    }

    /// Flush now, cancelling any pending timer.
    ///
    /// Waits for an in-flight flush to finish first.
    pub async fn flush(&self) -> FlushOutcome {
        {
            let mut slot = lock(&self.inner.timer);
            slot.generation += 1;
            if let Some(pending) = slot.handle.take() {
                pending.abort();
            }
        }
        self.inner.flush().await
    }
}

impl DispatcherInner {
    /// Called by a timer task after its sleep. Returns false if a newer timer
    /// superseded it. On success the handle is detached from the slot so a
    /// later reschedule cannot abort the flush that is about to run.
    fn claim_timer(&self, generation: u64) -> bool {
        let mut slot = lock(&self.timer);
        if slot.generation != generation {
            return false;
        }
        slot.handle = None;
        true
    }

    async fn flush(&self) -> FlushOutcome {
        let _in_flight = self.flush_lock.lock().await;

        let Some(batch) = lock(&self.queue).ready_batch() else {
            debug!("No log events ready to ship");
            return FlushOutcome::Skipped;
        };

        let Some(credentials) = &self.credentials else {
            warn!(
                "Dropping flush of {} log events: API key or project id not configured",
                batch.len()
            );
            return FlushOutcome::Failed;
        };

        debug!("Sending batch of {} log events", batch.len());
        match self.transport.send_batch(credentials, &batch.records).await {
            Ok(()) => {
                let removed = lock(&self.queue).remove_shipped(&batch.ids);
                debug!("Batch accepted, removed {} entries from the queue", removed);
                FlushOutcome::Sent {
                    events: batch.len(),
                }
            }
            Err(e) => {
                warn!("Error sending batch of {} log events: {}", batch.len(), e);
                FlushOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::ports::transport::TransportError;
    use async_trait::async_trait;
    use phospho_domain::{
        Extensions, FeedbackPayload, LogRecord, Metadata, Normalizer, TaskId, TaskWrite,
    };
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicBool, Ordering};

    // ==================== Test Mocks ====================

    #[derive(Default)]
    pub(crate) struct MockTransport {
        pub batches: Mutex<Vec<Vec<LogRecord>>>,
        pub feedback: Mutex<Vec<(TaskId, FeedbackPayload)>>,
        pub fail: AtomicBool,
    }

    impl MockTransport {
        pub fn failing() -> Self {
            let transport = Self::default();
            transport.fail.store(true, Ordering::SeqCst);
            transport
        }

        pub fn batch_count(&self) -> usize {
            self.batches.lock().unwrap().len()
        }

        pub fn batch(&self, index: usize) -> Vec<LogRecord> {
            self.batches.lock().unwrap()[index].clone()
        }
    }

    #[async_trait]
    impl LogTransport for MockTransport {
        async fn send_batch(
            &self,
            _credentials: &Credentials,
            records: &[LogRecord],
        ) -> Result<(), TransportError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(TransportError::ConnectionError("collector down".to_string()));
            }
            self.batches.lock().unwrap().push(records.to_vec());
            Ok(())
        }

        async fn send_feedback(
            &self,
            _credentials: &Credentials,
            task_id: &TaskId,
            payload: &FeedbackPayload,
        ) -> Result<Value, TransportError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(TransportError::ConnectionError("collector down".to_string()));
            }
            self.feedback
                .lock()
                .unwrap()
                .push((task_id.clone(), payload.clone()));
            Ok(json!({"id": task_id.as_str(), "flag": payload.flag}))
        }
    }

    fn task_write(task: &str, output: &str, terminal: bool) -> TaskWrite {
        TaskWrite {
            task_id: TaskId::new(task),
            session_id: None,
            project_id: "proj".to_string(),
            created_at: 0,
            normalized: Normalizer::new()
                .normalize(&json!("q"), Some(&json!(output)), None, None)
                .unwrap(),
            metadata: Metadata::default(),
            extensions: Extensions::new(),
            concatenate_raw_outputs: true,
            is_terminal: terminal,
        }
    }

    fn setup(transport: Arc<MockTransport>) -> (Arc<Mutex<LogQueue>>, BatchDispatcher) {
        let queue = Arc::new(Mutex::new(LogQueue::new()));
        let dispatcher = BatchDispatcher::new(
            Arc::clone(&queue),
            transport,
            Some(Credentials::new("key", "proj")),
            Duration::from_millis(500),
        );
        (queue, dispatcher)
    }

    fn write(queue: &Arc<Mutex<LogQueue>>, dispatcher: &BatchDispatcher, w: TaskWrite) {
        queue.lock().unwrap().merge(w);
        dispatcher.schedule();
    }

    #[tokio::test(start_paused = true)]
    async fn debounce_coalesces_writes_into_one_flush() {
        let transport = Arc::new(MockTransport::default());
        let (queue, dispatcher) = setup(Arc::clone(&transport));

        write(&queue, &dispatcher, task_write("a", "1", true));
        write(&queue, &dispatcher, task_write("b", "2", true));
        write(&queue, &dispatcher, task_write("a", "3", true));
        write(&queue, &dispatcher, task_write("c", "4", true));

        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(transport.batch_count(), 1);
        let batch = transport.batch(0);
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0].output.as_deref(), Some("13"));
        assert_eq!(dispatcher.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn each_write_resets_the_timer() {
        let transport = Arc::new(MockTransport::default());
        let (queue, dispatcher) = setup(Arc::clone(&transport));

        write(&queue, &dispatcher, task_write("a", "1", true));
        tokio::time::sleep(Duration::from_millis(300)).await;
        write(&queue, &dispatcher, task_write("b", "2", true));
        tokio::time::sleep(Duration::from_millis(300)).await;

        // 600ms after the first write, but only 300ms after the last one
        assert_eq!(transport.batch_count(), 0);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(transport.batch_count(), 1);
        assert_eq!(transport.batch(0).len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn not_ready_entries_are_not_shipped() {
        let transport = Arc::new(MockTransport::default());
        let (queue, dispatcher) = setup(Arc::clone(&transport));

        write(&queue, &dispatcher, task_write("streaming", "par", false));
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(transport.batch_count(), 0);
        assert_eq!(dispatcher.pending(), 1);

        write(&queue, &dispatcher, task_write("done", "full", true));
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(transport.batch_count(), 1);
        let ids: Vec<_> = transport.batch(0).iter().map(|r| r.task_id.clone()).collect();
        assert_eq!(ids, vec![TaskId::new("done")]);
        assert!(queue.lock().unwrap().contains(&TaskId::new("streaming")));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_flush_retains_queue_for_next_cycle() {
        let transport = Arc::new(MockTransport::failing());
        let (queue, dispatcher) = setup(Arc::clone(&transport));

        write(&queue, &dispatcher, task_write("a", "1", true));
        write(&queue, &dispatcher, task_write("b", "2", true));
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(transport.batch_count(), 0);
        assert_eq!(dispatcher.pending(), 2);

        transport.fail.store(false, Ordering::SeqCst);
        write(&queue, &dispatcher, task_write("c", "3", true));
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(transport.batch_count(), 1);
        assert_eq!(transport.batch(0).len(), 3);
        assert_eq!(dispatcher.pending(), 0);
    }

    #[tokio::test]
    async fn explicit_flush_reports_outcome() {
        let transport = Arc::new(MockTransport::default());
        let (queue, dispatcher) = setup(Arc::clone(&transport));

        assert_eq!(dispatcher.flush().await, FlushOutcome::Skipped);

        write(&queue, &dispatcher, task_write("a", "1", true));
        assert_eq!(dispatcher.flush().await, FlushOutcome::Sent { events: 1 });
        assert_eq!(dispatcher.pending(), 0);

        transport.fail.store(true, Ordering::SeqCst);
        write(&queue, &dispatcher, task_write("b", "2", true));
        assert_eq!(dispatcher.flush().await, FlushOutcome::Failed);
        assert_eq!(dispatcher.pending(), 1);
    }

    #[tokio::test]
    async fn flush_without_credentials_keeps_queue() {
        let queue = Arc::new(Mutex::new(LogQueue::new()));
        let transport = Arc::new(MockTransport::default());
        let dispatcher = BatchDispatcher::new(
            Arc::clone(&queue),
            transport.clone(),
            None,
            Duration::from_millis(500),
        );

        queue.lock().unwrap().merge(task_write("a", "1", true));
        assert_eq!(dispatcher.flush().await, FlushOutcome::Failed);
        assert_eq!(transport.batch_count(), 0);
        assert_eq!(dispatcher.pending(), 1);
    }
}
