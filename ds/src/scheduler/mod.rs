//! Deferred callback scheduling
//!
//! Wraps a callback so that invoking it queues work instead of running it,
//! with execution deferred to the host runtime's post-commit effect phase.
//! One scheduler owns one FIFO queue scoped to one component instance.

mod core;
mod handle;
mod queue;

pub use self::core::DeferredCallback;
pub use self::handle::ScheduleHandle;
pub use self::queue::{PendingExecution, QueueState, SchedulerStats};
