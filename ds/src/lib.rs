//! defersched - deferred callback scheduling for component UI runtimes
//!
//! Wraps a callback so that invoking it defers execution until after the
//! host runtime has committed the caller's pending state changes. Each call
//! on the handle queues one pending execution; the queue drains in FIFO
//! order during the post-commit effect phase.
//!
//! # Architecture
//!
//! ```text
//! handle.schedule(args)
//!       │
//!       ▼
//! PendingQueue ──► waker.request_render() ──► host commits
//!       ▲                                          │
//!       │                                          ▼
//!       │                                    effect phase
//!       │                                          │
//!       └── entries queued mid-drain        notify_commit()
//!           wait for the next cycle         drains FIFO batch
//! ```
//!
//! # Example
//!
//! ```ignore
//! use defersched::{DeferredCallback, RenderLoop};
//!
//! let mut printer = DeferredCallback::new(|n: u32| println!("ran {n}"));
//! let handle = printer.handle();
//!
//! let mut host = RenderLoop::new();
//! host.mount(&printer);
//!
//! handle.schedule(1);
//! handle.schedule(2);
//! host.run_until_settled(&mut printer)?;  // invokes with 1, then 2
//! ```

pub mod cli;
pub mod config;
pub mod host;
pub mod scheduler;

pub use config::SchedulerConfig;
pub use host::{DEFAULT_MAX_CYCLES, DirtyFlag, HostError, RenderLoop, RenderWaker};
pub use scheduler::{DeferredCallback, PendingExecution, QueueState, ScheduleHandle, SchedulerStats};

/// Default pending queue preallocation
pub const DEFAULT_INITIAL_CAPACITY: usize = 8;

/// Default queue depth that triggers a warning on enqueue
pub const DEFAULT_DEPTH_WARNING: usize = 1024;
