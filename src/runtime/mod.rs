//! Runtime module - executes commands produced by `update`
//!
//! - `worker` - runs highlight jobs on background threads or an explicit queue

pub mod worker;

pub use worker::{run_job, ExecutionMode, HighlightWorker};
