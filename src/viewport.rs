//! Debounced recompilation for interactive diagram views.
//!
//! A view recompiles its diagram whenever the normalized input changes. Bursts
//! of changes are collapsed by a single-slot, schedule-or-replace timer: each
//! request cancels the one still waiting and only the last request runs. A
//! compilation that has already started always runs to completion.
//!
//! Compiled source is published through a `watch` channel; the string is the
//! only artifact handed to the renderer. Results of superseded submissions are
//! never published, even when they finish last.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Delay used when none is configured
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Single-slot debounce timer
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `task` after the delay, replacing any task still waiting.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut slot = self.slot();
        if let Some(previous) = slot.take() {
            if !previous.is_finished() {
                trace!("Replacing pending recompilation");
            }
            previous.abort();
        }

        let delay = self.delay;
        *slot = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // No await points past here: once started, the task cannot be aborted
            task();
        }));
    }

    /// Drop the waiting task, if any
    pub fn cancel(&self) {
        if let Some(previous) = self.slot().take() {
            previous.abort();
        }
    }

    /// Whether a scheduled task has not finished yet
    pub fn is_pending(&self) -> bool {
        self.slot().as_ref().is_some_and(|h| !h.is_finished())
    }

    fn slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// A compile function from an input snapshot to diagram source
pub type CompileFn<T> = dyn Fn(&T) -> String + Send + Sync;

/// Submission and publication counters, updated under one lock
#[derive(Debug, Default)]
struct PublishState {
    /// Sequence number of the newest submission
    latest: u64,
    /// Number of compilations published
    generation: u64,
}

/// Debounced pipeline from input snapshots to published diagram source.
///
/// Only the newest submission is ever published. A compilation that started
/// before a newer submission still runs, but its result is dropped.
pub struct DiagramPipeline<T> {
    debouncer: Debouncer,
    compile: Arc<CompileFn<T>>,
    sender: Arc<watch::Sender<String>>,
    state: Arc<Mutex<PublishState>>,
}

impl<T> DiagramPipeline<T>
where
    T: Send + Sync + 'static,
{
    pub fn new<F>(delay: Duration, compile: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        let (sender, _) = watch::channel(String::new());
        Self {
            debouncer: Debouncer::new(delay),
            compile: Arc::new(compile),
            sender: Arc::new(sender),
            state: Arc::new(Mutex::new(PublishState::default())),
        }
    }

    /// Receiver observing every published diagram source
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.sender.subscribe()
    }

    /// Most recently published source (empty before the first compile)
    pub fn current(&self) -> String {
        self.sender.borrow().clone()
    }

    /// Number of compilations that have been published
    pub fn generation(&self) -> u64 {
        lock_state(&self.state).generation
    }

    /// Request a recompilation for a new input snapshot
    pub fn submit(&self, input: T) {
        let seq = {
            let mut state = lock_state(&self.state);
            state.latest += 1;
            state.latest
        };

        let compile = Arc::clone(&self.compile);
        let sender = Arc::clone(&self.sender);
        let state = Arc::clone(&self.state);

        self.debouncer.schedule(move || {
            let source = compile(&input);

            // Checked and published under the lock so a newer result can
            // never be overwritten by an older one
            let mut state = lock_state(&state);
            if state.latest != seq {
                debug!(seq, latest = state.latest, "Dropping superseded compilation");
                return;
            }
            state.generation += 1;
            debug!(
                generation = state.generation,
                bytes = source.len(),
                "Recompiled diagram"
            );
            sender.send_replace(source);
        });
    }

    /// Drop a pending recompilation
    pub fn cancel(&self) {
        self.debouncer.cancel();
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}

fn lock_state(state: &Mutex<PublishState>) -> MutexGuard<'_, PublishState> {
    state
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_only_last_schedule_runs() {
        let debouncer = Debouncer::new(Duration::from_millis(100));
        let hits = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5 {
            let hits = Arc::clone(&hits);
            debouncer.schedule(move || hits.lock().unwrap().push(i));
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        assert!(debouncer.is_pending());
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(*hits.lock().unwrap(), vec![4]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_schedules_all_run() {
        let debouncer = Debouncer::new(Duration::from_millis(50));
        let count = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let count = Arc::clone(&count);
            debouncer.schedule(move || {
                count.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(80)).await;
        }

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel() {
        let debouncer = Debouncer::new(Duration::from_millis(50));
        let count = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&count);
        debouncer.schedule(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pipeline_publishes_last_input() {
        let pipeline = DiagramPipeline::new(Duration::from_millis(100), |n: &usize| {
            format!("graph TD\n    N{}\n", n)
        });
        let mut rx = pipeline.subscribe();

        pipeline.submit(1);
        pipeline.submit(2);
        pipeline.submit(3);
        assert_eq!(pipeline.current(), "");

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), "graph TD\n    N3\n");
        assert_eq!(pipeline.generation(), 1);
        assert!(!pipeline.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pipeline_cancel() {
        let pipeline = DiagramPipeline::new(Duration::from_millis(100), |s: &String| s.clone());
        pipeline.submit("erDiagram\n".to_string());
        pipeline.cancel();
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(pipeline.generation(), 0);
        assert_eq!(pipeline.current(), "");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_slow_older_compile_is_not_published() {
        let pipeline = DiagramPipeline::new(Duration::from_millis(10), |n: &u64| {
            if *n == 1 {
                std::thread::sleep(Duration::from_millis(300));
            }
            format!("v{}", n)
        });

        pipeline.submit(1);
        // First compile is now running and can no longer be aborted
        tokio::time::sleep(Duration::from_millis(80)).await;
        pipeline.submit(2);

        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(pipeline.current(), "v2");
        assert_eq!(pipeline.generation(), 1);
    }
}
