//! Worker pool building blocks
//!
//! A Worker is the execution unit of a run, responsible for the loop:
//! **take permit -> execute -> record -> pause -> repeat**.
//!
//! Workers never decide *when* a request happens; the [`RequestRateLimiter`]
//! does, by issuing permits on a fixed grid into the shared permit queue.
//! Concurrency is bounded by the number of workers alone: each worker has at
//! most one request in flight. Each Worker:
//!
//! 1. Waits for a permit (or shutdown)
//! 2. Executes one request through the shared [`RequestExecutor`](crate::traits::RequestExecutor)
//! 3. Records the outcome into the shared run statistics and its own [`WorkerStats`]
//! 4. Sleeps a jittered think-time
//! 5. Repeats until the queue is closed and drained
//!
//! # Example
//!
//! ```ignore
//! use loadpace_core::worker::WorkerBuilder;
//!
//! let worker = WorkerBuilder::new(0)
//!     .executor(executor)
//!     .stats(stats)
//!     .permits(queue)
//!     .think_time(Duration::from_millis(100))
//!     .build()?;
//!
//! let stats = worker.run(cancel).await;
//! println!("Succeeded: {}", stats.succeeded);
//! ```

mod builder;
mod executor;
mod rate_limiter;
mod stats;
mod think_time;

pub use builder::WorkerBuilder;
pub use executor::Worker;
pub use rate_limiter::RequestRateLimiter;
pub use stats::WorkerStats;
pub use think_time::{ThinkTime, JITTER_FRACTION};
