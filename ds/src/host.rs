//! Host-runtime integration
//!
//! The scheduler core is decoupled from any concrete reactive-state
//! implementation. This module carries the two halves of the seam: the
//! [`RenderWaker`] contract a host implements so schedulers can request a
//! commit, and [`RenderLoop`], a deterministic single-threaded commit/effect
//! driver used by the demo binary and the test suite.

use std::cell::Cell;
use std::rc::Rc;

use thiserror::Error;
use tracing::debug;

use crate::scheduler::DeferredCallback;

/// Commit/effect cycle cap for [`RenderLoop::run_until_settled`]
pub const DEFAULT_MAX_CYCLES: usize = 64;

/// How a scheduler asks the host to commit a render for its instance
///
/// Implementations must be cheap and non-blocking; the scheduler calls
/// `request_render` from inside `schedule`, outside any queue borrow.
pub trait RenderWaker {
    fn request_render(&self);
}

impl<F: Fn()> RenderWaker for F {
    fn request_render(&self) {
        self()
    }
}

/// Shared dirty flag set by `request_render` and cleared at each commit
#[derive(Clone, Default)]
pub struct DirtyFlag(Rc<Cell<bool>>);

impl DirtyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if a render has been requested since the last commit
    pub fn is_set(&self) -> bool {
        self.0.get()
    }

    /// Clear the flag, returning whether it was set
    pub fn clear(&self) -> bool {
        self.0.replace(false)
    }
}

impl RenderWaker for DirtyFlag {
    fn request_render(&self) {
        self.0.set(true);
    }
}

/// Errors from the reference host driver
#[derive(Debug, Error)]
pub enum HostError {
    /// A callback kept rescheduling itself on every cycle
    #[error("render loop did not settle after {0} cycles")]
    DidNotSettle(usize),
}

/// Deterministic commit/effect driver for one scheduler instance
///
/// Each cycle models the host runtime: clear the dirty flag (the commit),
/// then run the post-commit effect by calling `notify_commit`. Entries
/// scheduled during the effect set the flag again, so the loop keeps
/// cycling until the instance settles.
pub struct RenderLoop {
    dirty: DirtyFlag,
    max_cycles: usize,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::with_max_cycles(DEFAULT_MAX_CYCLES)
    }

    /// Driver with an explicit cycle cap for `run_until_settled`
    pub fn with_max_cycles(max_cycles: usize) -> Self {
        Self {
            dirty: DirtyFlag::new(),
            max_cycles,
        }
    }

    /// The waker this loop watches
    pub fn waker(&self) -> DirtyFlag {
        self.dirty.clone()
    }

    /// Attach this loop's waker to a scheduler
    pub fn mount<A>(&self, scheduler: &DeferredCallback<A>) {
        scheduler.attach_waker(self.dirty.clone());
    }

    /// Run one commit/effect cycle; returns invocations performed
    pub fn commit<A>(&mut self, scheduler: &mut DeferredCallback<A>) -> usize {
        self.dirty.clear();
        let invoked = scheduler.notify_commit();
        debug!(invoked, "RenderLoop::commit: effect phase done");
        invoked
    }

    /// Cycle until no render is pending; returns the number of cycles run
    ///
    /// Fails with [`HostError::DidNotSettle`] once the cycle cap is hit,
    /// which happens when a callback unconditionally reschedules itself.
    pub fn run_until_settled<A>(
        &mut self,
        scheduler: &mut DeferredCallback<A>,
    ) -> Result<usize, HostError> {
        let mut cycles = 0;
        while self.dirty.is_set() {
            if cycles >= self.max_cycles {
                return Err(HostError::DidNotSettle(cycles));
            }
            self.commit(scheduler);
            cycles += 1;
        }
        debug!(cycles, "RenderLoop::run_until_settled: settled");
        Ok(cycles)
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_dirty_flag_set_and_clear() {
        let flag = DirtyFlag::new();
        assert!(!flag.is_set());

        flag.request_render();
        assert!(flag.is_set());
        assert!(flag.clear());
        assert!(!flag.is_set());
    }

    #[test]
    fn test_closure_waker() {
        let count = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&count);

        let scheduler = DeferredCallback::new(|_: u32| {});
        scheduler.attach_waker(move || counter.set(counter.get() + 1));

        let handle = scheduler.handle();
        handle.schedule(1);
        handle.schedule(2);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_schedule_marks_loop_dirty() {
        let scheduler = DeferredCallback::new(|_: u32| {});
        let host = RenderLoop::new();
        host.mount(&scheduler);

        assert!(!host.waker().is_set());
        scheduler.handle().schedule(1);
        assert!(host.waker().is_set());
    }

    #[test]
    fn test_run_until_settled_drains_everything() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut scheduler = DeferredCallback::new(move |n: u32| sink.borrow_mut().push(n));
        let handle = scheduler.handle();

        let mut host = RenderLoop::new();
        host.mount(&scheduler);

        handle.schedule(1);
        handle.schedule(2);
        handle.schedule(3);

        let cycles = host.run_until_settled(&mut scheduler).unwrap();
        assert_eq!(cycles, 1);
        assert_eq!(*seen.borrow(), vec![1, 2, 3]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_settled_loop_runs_zero_cycles() {
        let mut scheduler = DeferredCallback::new(|_: u32| {});
        let mut host = RenderLoop::new();
        host.mount(&scheduler);

        let cycles = host.run_until_settled(&mut scheduler).unwrap();
        assert_eq!(cycles, 0);
    }

    #[test]
    fn test_runaway_reschedule_hits_cycle_cap() {
        let reentrant: Rc<RefCell<Option<crate::ScheduleHandle<u32>>>> =
            Rc::new(RefCell::new(None));
        let reentrant_in_cb = Rc::clone(&reentrant);

        let mut scheduler = DeferredCallback::new(move |n: u32| {
            if let Some(handle) = reentrant_in_cb.borrow().as_ref() {
                handle.schedule(n + 1);
            }
        });
        *reentrant.borrow_mut() = Some(scheduler.handle());

        let mut host = RenderLoop::with_max_cycles(8);
        host.mount(&scheduler);

        scheduler.handle().schedule(0);
        let err = host.run_until_settled(&mut scheduler).unwrap_err();
        assert!(matches!(err, HostError::DidNotSettle(8)));
    }
}
