//! Scheduling handle returned to callers

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use super::core::Inner;

/// Callable handle that queues invocations of the wrapped callback
///
/// Cheap to clone. Every handle obtained from one scheduler shares the same
/// underlying channel, so a handle can serve as a stable dependency for the
/// lifetime of the owning instance. A handle that outlives its scheduler
/// degrades to a no-op.
pub struct ScheduleHandle<A> {
    inner: Weak<RefCell<Inner<A>>>,
}

impl<A> Clone for ScheduleHandle<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<A> ScheduleHandle<A> {
    pub(crate) fn new(inner: &Rc<RefCell<Inner<A>>>) -> Self {
        Self {
            inner: Rc::downgrade(inner),
        }
    }

    /// Queue one invocation of the underlying callback for the next commit
    ///
    /// Fire-and-forget: returns immediately without running the callback.
    /// Each call produces a distinct entry, including for value-identical
    /// arguments. After the owning scheduler is torn down the call is
    /// silently dropped.
    pub fn schedule(&self, args: A) {
        let Some(inner) = self.inner.upgrade() else {
            debug!("ScheduleHandle::schedule: scheduler torn down, dropping entry");
            return;
        };

        let waker = {
            let mut inner = inner.borrow_mut();
            let seq = inner.queue.push(args);
            inner.stats.total_scheduled += 1;

            let depth = inner.queue.len();
            if depth > inner.stats.peak_queue_depth {
                inner.stats.peak_queue_depth = depth;
            }
            if depth == inner.depth_warning {
                warn!(
                    instance = %inner.instance,
                    depth,
                    "pending queue depth reached warning threshold"
                );
            }

            debug!(instance = %inner.instance, seq, depth, "ScheduleHandle::schedule: queued");
            inner.waker.clone()
        };

        // Wake outside the borrow so the host may call back into the
        // scheduler synchronously.
        if let Some(waker) = waker {
            waker.request_render();
        }
    }

    /// True if both handles feed the same scheduler queue
    pub fn same_channel(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.inner, &other.inner)
    }

    /// True while the owning scheduler is still alive
    pub fn is_live(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::super::core::DeferredCallback;

    #[test]
    fn test_schedule_does_not_invoke_synchronously() {
        let scheduler = DeferredCallback::new(|_: u32| panic!("must not run"));
        let handle = scheduler.handle();

        handle.schedule(1);
        handle.schedule(2);
        assert_eq!(scheduler.pending(), 2);
    }

    #[test]
    fn test_clones_share_the_channel() {
        let scheduler = DeferredCallback::new(|_: u32| {});
        let a = scheduler.handle();
        let b = a.clone();
        assert!(a.same_channel(&b));
    }

    #[test]
    fn test_handles_from_distinct_schedulers_differ() {
        let first = DeferredCallback::new(|_: u32| {});
        let second = DeferredCallback::new(|_: u32| {});
        assert!(!first.handle().same_channel(&second.handle()));
    }

    #[test]
    fn test_schedule_after_teardown_is_noop() {
        let scheduler = DeferredCallback::new(|_: u32| panic!("must not run"));
        let handle = scheduler.handle();
        drop(scheduler);

        assert!(!handle.is_live());
        handle.schedule(42);
    }
}
