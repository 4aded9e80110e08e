//! Highlight jobs handed to background workers

use std::ops::Range;

use ropey::Rope;

use crate::syntax::LanguageId;

/// Whether a job covers the whole buffer or a slice of it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    /// Range covered the entire buffer at dispatch; results replace all attributes
    Full,
    /// Range covered part of the buffer; results overlay existing attributes
    Partial,
}

/// One asynchronous highlight request
#[derive(Debug, Clone)]
pub struct HighlightJob {
    /// Sequence number for logging
    pub id: u64,
    /// Target range in the buffer at dispatch time
    pub range: Range<usize>,
    pub kind: JobKind,
    pub language: LanguageId,
    /// Buffer revision at dispatch time
    pub revision: u64,
    /// Shared, immutable view of the text at dispatch time
    pub snapshot: Rope,
}

impl HighlightJob {
    /// The text this job highlights, read from its snapshot
    pub fn source_text(&self) -> String {
        match self.kind {
            JobKind::Full => self.snapshot.to_string(),
            JobKind::Partial => {
                let end = self.range.end.min(self.snapshot.len_chars());
                let start = self.range.start.min(end);
                self.snapshot.slice(start..end).to_string()
            }
        }
    }

    /// Buffer offset that span ranges are relative to
    pub fn base(&self) -> usize {
        match self.kind {
            JobKind::Full => 0,
            JobKind::Partial => self.range.start,
        }
    }
}
