//! Staleness check for finished highlight jobs
//!
//! Jobs run against a snapshot while the buffer keeps changing. A result is
//! only applied if the buffer still holds exactly the text that was
//! highlighted, at the same place.

use crate::buffer::AttributedBuffer;
use crate::model::HighlightJob;
use crate::syntax::LanguageId;

/// Why a result may no longer be applied
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Staleness {
    #[error("job range {start}..{end} exceeds buffer length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },
    #[error("text in {start}..{end} changed since dispatch")]
    ContentChanged { start: usize, end: usize },
    #[error("language changed since dispatch")]
    LanguageChanged,
}

/// Validate a result for `job` whose engine output covered `highlighted`.
///
/// The content comparison runs on every completion, even when no edit
/// happened since dispatch.
pub fn check(
    buffer: &AttributedBuffer,
    job: &HighlightJob,
    highlighted: &str,
    language: Option<LanguageId>,
) -> Result<(), Staleness> {
    if language != Some(job.language) {
        return Err(Staleness::LanguageChanged);
    }

    let len = buffer.len_chars();
    let range = &job.range;
    if range.end > len {
        return Err(Staleness::OutOfBounds {
            start: range.start,
            end: range.end,
            len,
        });
    }

    if !buffer.text_matches(range.clone(), highlighted) {
        return Err(Staleness::ContentChanged {
            start: range.start,
            end: range.end,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::JobKind;
    use std::ops::Range;

    fn job_for(buffer: &AttributedBuffer, range: Range<usize>) -> HighlightJob {
        HighlightJob {
            id: 1,
            range,
            kind: JobKind::Partial,
            language: LanguageId::Rust,
            revision: 0,
            snapshot: buffer.snapshot(),
        }
    }

    #[test]
    fn test_unchanged_buffer_is_fresh() {
        let buffer = AttributedBuffer::from_text("let x = 1");
        let job = job_for(&buffer, 0..9);
        assert_eq!(check(&buffer, &job, "let x = 1", Some(LanguageId::Rust)), Ok(()));
    }

    #[test]
    fn test_same_length_edit_is_stale() {
        let mut buffer = AttributedBuffer::from_text("let x = 1");
        let job = job_for(&buffer, 0..9);
        buffer.replace(4..5, "y").unwrap();
        assert_eq!(
            check(&buffer, &job, "let x = 1", Some(LanguageId::Rust)),
            Err(Staleness::ContentChanged { start: 0, end: 9 })
        );
    }

    #[test]
    fn test_shrunk_buffer_is_stale() {
        let mut buffer = AttributedBuffer::from_text("0123456789abcdefghij");
        let job = job_for(&buffer, 0..20);
        buffer.replace(5..20, "").unwrap();
        assert_eq!(
            check(&buffer, &job, "0123456789abcdefghij", Some(LanguageId::Rust)),
            Err(Staleness::OutOfBounds {
                start: 0,
                end: 20,
                len: 5
            })
        );
    }

    #[test]
    fn test_edit_outside_range_keeps_result_fresh() {
        let mut buffer = AttributedBuffer::from_text("let a = 1;\nlet b = 2;");
        let job = job_for(&buffer, 0..10);
        buffer.replace(21..21, " // tail").unwrap();
        assert_eq!(check(&buffer, &job, "let a = 1;", Some(LanguageId::Rust)), Ok(()));
    }

    #[test]
    fn test_edit_before_range_shifts_text_and_is_stale() {
        let mut buffer = AttributedBuffer::from_text("let a = 1;\nlet b = 2;");
        let job = job_for(&buffer, 11..21);
        buffer.replace(0..0, "\n").unwrap();
        assert!(matches!(
            check(&buffer, &job, "let b = 2;", Some(LanguageId::Rust)),
            Err(Staleness::ContentChanged { .. })
        ));
    }

    #[test]
    fn test_language_switch_is_stale() {
        let buffer = AttributedBuffer::from_text("x = 1");
        let job = job_for(&buffer, 0..5);
        assert_eq!(
            check(&buffer, &job, "x = 1", Some(LanguageId::Python)),
            Err(Staleness::LanguageChanged)
        );
        assert_eq!(check(&buffer, &job, "x = 1", None), Err(Staleness::LanguageChanged));
    }
}
