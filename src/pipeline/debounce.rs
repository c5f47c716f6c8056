//! Debounce primitive — turns a rapidly changing value into one that is only
//! emitted after it has stayed unchanged for a quiet period.
//!
//! [`Debouncer`] owns at most one pending timer task.  Every
//! [`push`](Debouncer::push) aborts the pending task and schedules a new one,
//! so only the last value of a burst is ever emitted.  Dropping the handle
//! aborts the pending task; nothing is emitted after teardown.
//!
//! ```text
//! push("h")   push("he")   push("hel")
//!    │  50ms     │  50ms      │────── 300ms ──────▶ emit "hel"
//!    ✗ aborted   ✗ aborted
//! ```
//!
//! The timer runs on the tokio runtime captured at construction, so `push`
//! may be called from a non-async thread (e.g. the egui update loop).

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Owned debounce timer emitting into an unbounded mpsc channel.
///
/// Values equal to the last emitted one are suppressed.
pub struct Debouncer<T> {
    delay: Duration,
    tx: mpsc::UnboundedSender<T>,
    runtime: Handle,
    pending: Option<JoinHandle<()>>,
    last_emitted: Arc<Mutex<Option<T>>>,
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    /// Create a debouncer on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime context.
    pub fn new(delay: Duration, tx: mpsc::UnboundedSender<T>) -> Self {
        Self::with_runtime(delay, tx, Handle::current())
    }

    /// Create a debouncer whose timers run on `runtime`.
    pub fn with_runtime(delay: Duration, tx: mpsc::UnboundedSender<T>, runtime: Handle) -> Self {
        Self {
            delay,
            tx,
            runtime,
            pending: None,
            last_emitted: Arc::new(Mutex::new(None)),
        }
    }

    /// Record a new value, restarting the quiet-period timer.
    pub fn push(&mut self, value: T) {
        self.cancel();

        let delay = self.delay;
        let tx = self.tx.clone();
        let last_emitted = Arc::clone(&self.last_emitted);

        self.pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;

            let mut last = last_emitted.lock().unwrap_or_else(PoisonError::into_inner);
            if last.as_ref() == Some(&value) {
                log::trace!("debounce: value unchanged since last emission, suppressed");
                return;
            }
            *last = Some(value.clone());
            if tx.send(value).is_err() {
                log::debug!("debounce: receiver dropped, emission discarded");
            }
        }));
    }

    /// Abort the pending emission, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// `true` while a scheduled emission has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, Instant};

    const D: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn burst_emits_only_last_value_once() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(D, tx);

        debouncer.push("h");
        sleep(Duration::from_millis(50)).await;
        debouncer.push("he");
        sleep(Duration::from_millis(50)).await;
        debouncer.push("hel");
        let last_push = Instant::now();

        assert_eq!(rx.recv().await, Some("hel"));
        let waited = last_push.elapsed();
        assert!(waited >= D, "emitted too early: {waited:?}");
        assert!(waited < D + Duration::from_millis(10), "emitted too late: {waited:?}");

        sleep(Duration::from_secs(2)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_is_emitted_before_the_quiet_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(D, tx);

        debouncer.push(1);
        sleep(Duration::from_millis(299)).await;
        assert!(rx.try_recv().is_err());
        assert!(debouncer.is_pending());

        sleep(Duration::from_millis(5)).await;
        assert_eq!(rx.try_recv().ok(), Some(1));
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn value_that_never_settles_never_emits() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(D, tx);

        for i in 0..20 {
            debouncer.push(i);
            sleep(Duration::from_millis(100)).await;
            assert!(rx.try_recv().is_err());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_value_is_suppressed() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(D, tx);

        debouncer.push("cat");
        sleep(Duration::from_millis(400)).await;
        assert_eq!(rx.try_recv().ok(), Some("cat"));

        // "cat" → "cats" → "cat" within one burst settles on the same value.
        debouncer.push("cats");
        sleep(Duration::from_millis(50)).await;
        debouncer.push("cat");
        sleep(Duration::from_millis(400)).await;
        assert!(rx.try_recv().is_err());

        debouncer.push("dog");
        sleep(Duration::from_millis(400)).await;
        assert_eq!(rx.try_recv().ok(), Some("dog"));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_discards_pending_value() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(D, tx);

        debouncer.push("pending");
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_pending_emission() {
        let (tx, mut rx) = mpsc::unbounded_channel::<&str>();
        let mut debouncer = Debouncer::new(D, tx);

        debouncer.push("late");
        drop(debouncer);

        // All senders are gone once the aborted timer task is dropped.
        assert_eq!(rx.recv().await, None);
    }
}
