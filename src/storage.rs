//! Host-facing text storage with asynchronous syntax highlighting
//!
//! `TextStorage` owns the model and drives the update loop: host calls become
//! messages, `update` turns them into commands, and commands are executed
//! here. Highlight jobs run through the [`HighlightWorker`]; their results
//! come back over a channel and are only applied when the host calls
//! [`TextStorage::process_pending`] (or one of the waiting helpers) on the
//! thread that owns the storage.

use std::ops::Range;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::attributes::AttributeSet;
use crate::buffer::{AttributedBuffer, BufferError};
use crate::commands::Cmd;
use crate::config::StorageConfig;
use crate::messages::{HighlightMsg, Msg, StorageMsg};
use crate::model::{EditEvent, HighlightDelegate, HighlightStats, StorageModel};
use crate::runtime::{ExecutionMode, HighlightWorker};
use crate::syntax::{HighlightEngine, LanguageId};
use crate::update::update;

/// Errors returned to the host for invalid ranges
pub type StorageError = BufferError;

/// Receives a change notification after every mutation
pub trait EditObserver {
    fn edited(&mut self, event: &EditEvent);
}

impl<F: FnMut(&EditEvent)> EditObserver for F {
    fn edited(&mut self, event: &EditEvent) {
        self(event)
    }
}

pub struct TextStorage {
    model: StorageModel,
    worker: HighlightWorker,
    msg_rx: Receiver<Msg>,
    observers: Vec<Box<dyn EditObserver>>,
    /// Jobs dispatched but not yet applied or rejected
    pending_jobs: usize,
}

impl TextStorage {
    /// Empty storage running jobs on background threads
    pub fn new(engine: Arc<dyn HighlightEngine>) -> Self {
        Self::with_mode(engine, ExecutionMode::default())
    }

    pub fn with_mode(engine: Arc<dyn HighlightEngine>, mode: ExecutionMode) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();

        let theme_tx = msg_tx.clone();
        engine.subscribe_theme_changes(Box::new(move || {
            // Fails once the storage is dropped, which unsubscribes
            theme_tx
                .send(Msg::Highlight(HighlightMsg::ThemeChanged))
                .is_ok()
        }));

        let worker = HighlightWorker::new(engine, mode, msg_tx);
        tracing::debug!("Created text storage ({:?} execution)", mode);

        Self {
            model: StorageModel::new(),
            worker,
            msg_rx,
            observers: Vec::new(),
            pending_jobs: 0,
        }
    }

    /// Storage using the configured execution mode and default language
    pub fn from_config(engine: Arc<dyn HighlightEngine>, config: &StorageConfig) -> Self {
        let mut storage = Self::with_mode(engine, config.execution);
        if let Some(language) = config.default_language() {
            storage.set_language(Some(language));
        }
        storage
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub fn text(&self) -> String {
        self.model.buffer.text()
    }

    /// Length in chars
    pub fn len(&self) -> usize {
        self.model.buffer.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.model.buffer.is_empty()
    }

    /// Incremented on every character edit
    pub fn revision(&self) -> u64 {
        self.model.revision
    }

    pub fn buffer(&self) -> &AttributedBuffer {
        &self.model.buffer
    }

    pub fn substring(&self, range: Range<usize>) -> Result<String, StorageError> {
        self.model.buffer.check_range(&range)?;
        Ok(self.model.buffer.substring(range).unwrap_or_default())
    }

    pub fn attributes_at(&self, location: usize) -> Option<&AttributeSet> {
        self.model.buffer.attributes_at(location)
    }

    /// Attributes at `location` and the full range they extend over
    pub fn attributes_with_range(&self, location: usize) -> Option<(&AttributeSet, Range<usize>)> {
        self.model.buffer.attributes_with_range(location)
    }

    pub fn language(&self) -> Option<LanguageId> {
        self.model.language
    }

    pub fn stats(&self) -> &HighlightStats {
        &self.model.stats
    }

    /// Jobs dispatched but not yet applied or rejected
    pub fn pending_jobs(&self) -> usize {
        self.pending_jobs
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        self.worker.mode()
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Replace the characters in `range` with `text` and re-highlight the
    /// surrounding lines.
    pub fn replace_characters(
        &mut self,
        range: Range<usize>,
        text: &str,
    ) -> Result<EditEvent, StorageError> {
        self.model.buffer.check_range(&range)?;
        let event = EditEvent::characters(range.clone(), text.chars().count());
        self.dispatch(Msg::Storage(StorageMsg::ReplaceCharacters {
            range,
            text: text.to_string(),
        }));
        Ok(event)
    }

    /// Replace the attributes of `range`. Never schedules highlighting.
    pub fn set_attributes(
        &mut self,
        range: Range<usize>,
        attributes: AttributeSet,
    ) -> Result<EditEvent, StorageError> {
        self.model.buffer.check_range(&range)?;
        let event = EditEvent::attributes(range.clone());
        self.dispatch(Msg::Storage(StorageMsg::SetAttributes { range, attributes }));
        Ok(event)
    }

    /// Merge `attributes` into `range`. Never schedules highlighting.
    pub fn add_attributes(
        &mut self,
        range: Range<usize>,
        attributes: AttributeSet,
    ) -> Result<EditEvent, StorageError> {
        self.model.buffer.check_range(&range)?;
        let event = EditEvent::attributes(range.clone());
        self.dispatch(Msg::Storage(StorageMsg::AddAttributes { range, attributes }));
        Ok(event)
    }

    /// Change the language. `Some` re-highlights the whole buffer; `None`
    /// stops highlighting and leaves existing attributes alone.
    pub fn set_language(&mut self, language: Option<LanguageId>) {
        self.dispatch(Msg::Storage(StorageMsg::SetLanguage(language)));
    }

    // ========================================================================
    // Highlighting
    // ========================================================================

    /// Highlight exactly `range`, without widening it to whole lines
    pub fn highlight_range(&mut self, range: Range<usize>) -> Result<(), StorageError> {
        self.model.buffer.check_range(&range)?;
        self.dispatch(Msg::Highlight(HighlightMsg::Request { range }));
        Ok(())
    }

    pub fn rehighlight_all(&mut self) {
        self.dispatch(Msg::Highlight(HighlightMsg::RequestAll));
    }

    /// Re-highlight everything because the host's styling changed
    pub fn theme_changed(&mut self) {
        self.dispatch(Msg::Highlight(HighlightMsg::ThemeChanged));
    }

    pub fn set_delegate(&mut self, delegate: impl HighlightDelegate + 'static) {
        self.model.delegate = Some(Box::new(delegate));
    }

    pub fn clear_delegate(&mut self) {
        self.model.delegate = None;
    }

    pub fn add_observer(&mut self, observer: impl EditObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Apply every completion and notification that has arrived so far.
    /// Returns the number of messages handled.
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.receive(msg);
            handled += 1;
        }
        handled
    }

    /// Run queued jobs on this thread. Their results still need
    /// [`process_pending`](Self::process_pending) to be applied.
    pub fn run_queued_jobs(&mut self) -> usize {
        self.worker.run_queued()
    }

    /// Block until every dispatched job has been applied or rejected.
    ///
    /// Queued jobs are run on this thread as part of waiting. Returns `false`
    /// if `timeout` elapsed first.
    pub fn wait_for_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;

        loop {
            self.process_pending();
            if self.pending_jobs == 0 {
                return true;
            }
            if self.worker.queued_len() > 0 {
                self.worker.run_queued();
                continue;
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                tracing::debug!("Timed out with {} highlight jobs pending", self.pending_jobs);
                return false;
            }

            match self.msg_rx.recv_timeout(remaining) {
                Ok(msg) => self.receive(msg),
                Err(RecvTimeoutError::Timeout) => {
                    tracing::debug!("Timed out with {} highlight jobs pending", self.pending_jobs);
                    return false;
                }
                Err(RecvTimeoutError::Disconnected) => return self.pending_jobs == 0,
            }
        }
    }

    // ========================================================================
    // Runtime
    // ========================================================================

    fn receive(&mut self, msg: Msg) {
        if matches!(msg, Msg::Highlight(HighlightMsg::Completed { .. })) {
            self.pending_jobs = self.pending_jobs.saturating_sub(1);
        }
        self.dispatch(msg);
    }

    fn dispatch(&mut self, msg: Msg) {
        if let Some(cmd) = update(&mut self.model, msg) {
            self.process_cmd(cmd);
        }
    }

    fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::Edited(event) => {
                for observer in &mut self.observers {
                    observer.edited(&event);
                }
            }
            Cmd::RunHighlight(job) => {
                self.pending_jobs += 1;
                self.worker.dispatch(job);
            }
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }
        }
    }
}

impl std::fmt::Debug for TextStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextStorage")
            .field("model", &self.model)
            .field("worker", &self.worker)
            .field("observers", &self.observers.len())
            .field("pending_jobs", &self.pending_jobs)
            .finish()
    }
}
