//! Deferred callback scheduler implementation

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;
use uuid::Uuid;

use crate::config::SchedulerConfig;
use crate::host::RenderWaker;

use super::handle::ScheduleHandle;
use super::queue::{PendingExecution, PendingQueue, QueueState, SchedulerStats};

/// Queue state shared between a scheduler and its handles
pub(crate) struct Inner<A> {
    pub(crate) queue: PendingQueue<A>,
    pub(crate) stats: SchedulerStats,
    pub(crate) waker: Option<Rc<dyn RenderWaker>>,
    pub(crate) depth_warning: usize,
    pub(crate) instance: String,
}

/// Wraps a callback so that invocations queue until the host runtime has
/// committed the caller's pending state changes
///
/// The scheduler owns the callback and the pending queue for one component
/// instance. Callers enqueue through [`ScheduleHandle`]s; the embedding
/// layer drives execution by calling [`notify_commit`](Self::notify_commit)
/// after each commit. Dropping the scheduler tears the queue down and
/// discards any entries that have not been drained.
pub struct DeferredCallback<A> {
    callback: Box<dyn FnMut(A)>,
    inner: Rc<RefCell<Inner<A>>>,
}

impl<A> DeferredCallback<A> {
    /// Wrap `callback` with the default configuration
    pub fn new(callback: impl FnMut(A) + 'static) -> Self {
        Self::with_config(callback, SchedulerConfig::default())
    }

    /// Wrap `callback` with an explicit configuration
    pub fn with_config(callback: impl FnMut(A) + 'static, config: SchedulerConfig) -> Self {
        let instance = Uuid::now_v7().to_string();
        debug!(%instance, ?config, "DeferredCallback::with_config: created");
        Self {
            callback: Box::new(callback),
            inner: Rc::new(RefCell::new(Inner {
                queue: PendingQueue::with_capacity(config.initial_capacity),
                stats: SchedulerStats::default(),
                waker: None,
                depth_warning: config.depth_warning,
                instance,
            })),
        }
    }

    /// Scheduling handle bound to this scheduler's queue
    ///
    /// Handles returned across repeated calls all share one underlying
    /// channel; see [`ScheduleHandle::same_channel`].
    pub fn handle(&self) -> ScheduleHandle<A> {
        ScheduleHandle::new(&self.inner)
    }

    /// Wire the host's render-request channel
    ///
    /// Each subsequent `schedule` asks the host for a commit through
    /// `waker`. Without a waker the host is expected to commit on its own
    /// cadence.
    pub fn attach_waker(&self, waker: impl RenderWaker + 'static) {
        let mut inner = self.inner.borrow_mut();
        debug!(instance = %inner.instance, "DeferredCallback::attach_waker: wired");
        inner.waker = Some(Rc::new(waker));
    }

    /// Drain hook, called by the embedding layer after each commit
    ///
    /// Invokes the callback once per entry that was queued before the call,
    /// in enqueue order, and returns the number of invocations performed.
    /// Entries appended while draining, including by the callback itself
    /// through a handle, stay queued for the next cycle. An empty queue is
    /// a no-op: no state is touched and nothing is re-requested from the
    /// host.
    ///
    /// Each entry is removed from the queue before its invocation. A
    /// callback panic therefore consumes the failing entry along with the
    /// ones already run, leaves the untouched remainder of the batch
    /// queued, and propagates to the host unmodified.
    pub fn notify_commit(&mut self) -> usize {
        let cutoff = {
            let inner = self.inner.borrow();
            match inner.queue.back_seq() {
                Some(seq) => seq,
                None => {
                    debug!(instance = %inner.instance, "DeferredCallback::notify_commit: queue empty, no-op");
                    return 0;
                }
            }
        };

        let mut invoked = 0usize;
        loop {
            // Release the borrow around each invocation so the callback can
            // re-enter schedule() on a handle.
            let entry = {
                let mut inner = self.inner.borrow_mut();
                inner.queue.pop_through(cutoff)
            };
            let Some(entry) = entry else { break };
            debug!(seq = entry.seq, "DeferredCallback::notify_commit: invoking");
            (self.callback)(entry.args);
            invoked += 1;
        }

        let mut inner = self.inner.borrow_mut();
        inner.stats.total_invoked += invoked as u64;
        inner.stats.drain_cycles += 1;
        debug!(
            instance = %inner.instance,
            invoked,
            remaining = inner.queue.len(),
            "DeferredCallback::notify_commit: drained"
        );
        invoked
    }

    /// Entries waiting for the next commit
    pub fn pending(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    /// Oldest entry still waiting for a commit, if any
    pub fn oldest_pending(&self) -> Option<PendingExecution<A>>
    where
        A: Clone,
    {
        self.inner.borrow().queue.front().cloned()
    }

    /// Lifetime counters for this scheduler
    pub fn stats(&self) -> SchedulerStats {
        self.inner.borrow().stats.clone()
    }

    /// Point-in-time queue view
    pub fn queue_state(&self) -> QueueState {
        let inner = self.inner.borrow();
        QueueState {
            pending: inner.queue.len(),
            next_seq: inner.queue.next_seq(),
            stats: inner.stats.clone(),
        }
    }
}
