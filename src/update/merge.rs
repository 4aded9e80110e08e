//! Writes engine spans back onto the live buffer

use std::ops::Range;

use crate::buffer::AttributedBuffer;
use crate::syntax::StyledSpan;

/// Shift `relative` by `base` and clip it to `len`. `None` if nothing is left.
pub fn clip(relative: &Range<usize>, base: usize, len: usize) -> Option<Range<usize>> {
    let start = base.saturating_add(relative.start);
    let end = base.saturating_add(relative.end).min(len);
    (start < end).then_some(start..end)
}

/// Overlay spans onto the buffer. Characters no span covers keep their
/// attributes. Returns the number of spans written.
pub fn overlay(buffer: &mut AttributedBuffer, base: usize, spans: &[StyledSpan]) -> usize {
    let len = buffer.len_chars();
    let mut written = 0;

    for span in spans {
        let Some(range) = clip(&span.range, base, len) else {
            tracing::trace!("Dropping span {:?} (base {}, len {})", span.range, base, len);
            continue;
        };
        match buffer.set_attributes(range, span.attributes.clone()) {
            Ok(()) => written += 1,
            Err(e) => tracing::warn!("Failed to apply span: {}", e),
        }
    }

    written
}

/// Build a fresh copy of the storage from the spans alone and swap it in.
/// Returns the number of spans written.
pub fn replace_all(buffer: &mut AttributedBuffer, spans: &[StyledSpan]) -> usize {
    let mut fresh = AttributedBuffer::from_rope(buffer.snapshot());
    let written = overlay(&mut fresh, 0, spans);
    *buffer = fresh;
    written
}
