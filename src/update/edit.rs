//! Edit tracking and highlight scheduling
//!
//! Decides which range needs re-highlighting after an edit and builds the
//! job for it. Every dispatched job runs to completion; superseded results
//! are discarded later by the staleness check.

use std::ops::Range;

use crate::commands::Cmd;
use crate::model::{HighlightJob, JobKind, StorageModel};

/// Schedule a re-highlight after a character edit.
///
/// `edited` is the post-edit range covering the replacement. It is widened
/// to whole lines, since a single character can reclassify tokens across
/// the line.
pub fn schedule_after_edit(model: &mut StorageModel, edited: Range<usize>) -> Option<Cmd> {
    let range = model.buffer.paragraph_range(edited);
    if range.is_empty() {
        tracing::trace!("Edit expanded to an empty paragraph, nothing to highlight");
        return None;
    }
    dispatch_highlight(model, range)
}

/// Schedule a highlight of the entire buffer
pub fn schedule_full(model: &mut StorageModel) -> Option<Cmd> {
    let len = model.buffer.len_chars();
    dispatch_highlight(model, 0..len)
}

/// Build a highlight job for `range` unless highlighting is disabled,
/// the range is empty, or the delegate vetoes it.
pub fn dispatch_highlight(model: &mut StorageModel, range: Range<usize>) -> Option<Cmd> {
    let Some(language) = model.language.filter(|lang| lang.has_highlighting()) else {
        tracing::trace!("No language selected, skipping highlight of {:?}", range);
        return None;
    };

    if range.is_empty() {
        return None;
    }

    if let Err(e) = model.buffer.check_range(&range) {
        tracing::warn!("Ignoring highlight request: {}", e);
        return None;
    }

    if !model.should_highlight(&range) {
        tracing::debug!("Delegate vetoed highlight of {:?}", range);
        model.stats.vetoed += 1;
        return None;
    }

    let len = model.buffer.len_chars();
    let kind = if range.start == 0 && range.end == len {
        JobKind::Full
    } else {
        JobKind::Partial
    };

    let job = HighlightJob {
        id: model.next_job_id(),
        range,
        kind,
        language,
        revision: model.revision,
        snapshot: model.buffer.snapshot(),
    };
    model.stats.dispatched += 1;

    tracing::debug!(
        "Dispatching highlight job {} ({:?}, {:?}) for {:?} at rev {}",
        job.id,
        job.kind,
        job.language,
        job.range,
        job.revision
    );

    Some(Cmd::RunHighlight(job))
}
