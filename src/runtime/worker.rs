//! Highlight job execution
//!
//! Jobs only read their own snapshot, so they can run anywhere. Results come
//! back as `Msg::Highlight(Completed)` on the storage's channel and are
//! applied on the primary thread when the host drains it.

use std::collections::VecDeque;
use std::sync::mpsc::Sender;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::messages::{HighlightMsg, Msg};
use crate::model::HighlightJob;
use crate::syntax::HighlightEngine;

/// Where highlight jobs run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// One short-lived thread per job
    #[default]
    Background,
    /// Held until the host calls `run_queued`; deterministic for tests and tools
    Queued,
}

/// Highlight a job's snapshot and wrap the outcome as a completion message
pub fn run_job(engine: &dyn HighlightEngine, job: HighlightJob) -> Msg {
    let text = job.source_text();
    let result = engine.highlight(&text, job.language);
    Msg::Highlight(HighlightMsg::Completed { job, result })
}

pub struct HighlightWorker {
    engine: Arc<dyn HighlightEngine>,
    mode: ExecutionMode,
    msg_tx: Sender<Msg>,
    queued: VecDeque<HighlightJob>,
}

impl HighlightWorker {
    pub fn new(engine: Arc<dyn HighlightEngine>, mode: ExecutionMode, msg_tx: Sender<Msg>) -> Self {
        Self {
            engine,
            mode,
            msg_tx,
            queued: VecDeque::new(),
        }
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Jobs waiting for `run_queued`
    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }

    /// Start or enqueue a job
    pub fn dispatch(&mut self, job: HighlightJob) {
        match self.mode {
            ExecutionMode::Queued => self.queued.push_back(job),
            ExecutionMode::Background => self.spawn(job),
        }
    }

    /// Run every queued job on the calling thread, in dispatch order.
    /// Completions are sent to the channel, not applied. Returns the number run.
    pub fn run_queued(&mut self) -> usize {
        let mut count = 0;
        while let Some(job) = self.queued.pop_front() {
            let msg = run_job(self.engine.as_ref(), job);
            if self.msg_tx.send(msg).is_err() {
                tracing::warn!("Highlight result channel closed");
            }
            count += 1;
        }
        count
    }

    fn spawn(&self, job: HighlightJob) {
        let engine = Arc::clone(&self.engine);
        let tx = self.msg_tx.clone();
        let id = job.id;
        // Kept so a failed spawn can still report completion
        let fallback = job.clone();

        let spawned = std::thread::Builder::new()
            .name("highlight-worker".to_string())
            .spawn(move || {
                let _ = tx.send(run_job(engine.as_ref(), job));
            });

        if let Err(e) = spawned {
            tracing::error!("Failed to spawn highlight worker for job {}: {}", id, e);
            let _ = self.msg_tx.send(Msg::Highlight(HighlightMsg::Completed {
                job: fallback,
                result: None,
            }));
        }
    }
}

impl std::fmt::Debug for HighlightWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighlightWorker")
            .field("mode", &self.mode)
            .field("queued", &self.queued.len())
            .finish()
    }
}
