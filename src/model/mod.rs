//! Storage model - the complete state owned by the primary thread
//!
//! This module contains the state types following the Elm Architecture pattern.
//! Only `update` functions mutate it, and only on the thread that owns the storage.

pub mod delegate;
pub mod job;

pub use delegate::{CallbackDelegate, HighlightDelegate};
pub use job::{HighlightJob, JobKind};

use std::ops::Range;

use crate::buffer::AttributedBuffer;
use crate::syntax::LanguageId;

/// What a mutation touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// Characters (and the attributes they carry) changed
    Characters,
    /// Only attributes changed
    Attributes,
}

/// Change notification reported to the host after every mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditEvent {
    pub kind: EditKind,
    /// Post-edit range covering the change
    pub range: Range<usize>,
    /// Net change in buffer length
    pub change_in_length: isize,
}

impl EditEvent {
    /// Event for `old_range` having been replaced by `new_len` chars
    pub fn characters(old_range: Range<usize>, new_len: usize) -> Self {
        Self {
            kind: EditKind::Characters,
            range: old_range.start..old_range.start + new_len,
            change_in_length: new_len as isize - old_range.len() as isize,
        }
    }

    pub fn attributes(range: Range<usize>) -> Self {
        Self {
            kind: EditKind::Attributes,
            range,
            change_in_length: 0,
        }
    }
}

/// Counters for the highlight pipeline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighlightStats {
    /// Jobs handed to workers
    pub dispatched: u64,
    /// Results written into the buffer
    pub applied: u64,
    /// Results rejected because the buffer moved on
    pub stale: u64,
    /// Jobs where the engine returned nothing
    pub failed: u64,
    /// Ranges skipped by the delegate
    pub vetoed: u64,
}

/// The text storage state
pub struct StorageModel {
    pub buffer: AttributedBuffer,
    /// Grammar to highlight with; `None` disables highlighting
    pub language: Option<LanguageId>,
    /// Incremented on every character edit
    pub revision: u64,
    pub delegate: Option<Box<dyn HighlightDelegate>>,
    pub stats: HighlightStats,
    next_job_id: u64,
}

impl StorageModel {
    pub fn new() -> Self {
        Self::with_text("")
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            buffer: AttributedBuffer::from_text(text),
            language: None,
            revision: 0,
            delegate: None,
            stats: HighlightStats::default(),
            next_job_id: 1,
        }
    }

    pub fn next_job_id(&mut self) -> u64 {
        let id = self.next_job_id;
        self.next_job_id += 1;
        id
    }

    /// Ask the delegate whether `range` may be highlighted (default yes)
    pub fn should_highlight(&mut self, range: &Range<usize>) -> bool {
        self.delegate
            .as_mut()
            .and_then(|d| d.should_highlight(range))
            .unwrap_or(true)
    }

    pub fn notify_did_highlight(&mut self, range: Range<usize>, success: bool) {
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.did_highlight(range, success);
        }
    }
}

impl Default for StorageModel {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StorageModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageModel")
            .field("len", &self.buffer.len_chars())
            .field("language", &self.language)
            .field("revision", &self.revision)
            .field("has_delegate", &self.delegate.is_some())
            .field("stats", &self.stats)
            .finish()
    }
}
