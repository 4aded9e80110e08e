//! Highlight pipeline update handlers
//!
//! Handles highlight requests and applies finished jobs on the primary thread.

use crate::commands::Cmd;
use crate::messages::HighlightMsg;
use crate::model::{EditEvent, HighlightJob, JobKind, StorageModel};
use crate::syntax::StyledText;

use super::edit::{dispatch_highlight, schedule_full};
use super::{merge, staleness};

/// Handle highlight-related messages
pub fn update_highlight(model: &mut StorageModel, msg: HighlightMsg) -> Option<Cmd> {
    match msg {
        HighlightMsg::Request { range } => dispatch_highlight(model, range),
        HighlightMsg::RequestAll => schedule_full(model),
        HighlightMsg::ThemeChanged => {
            tracing::debug!("Theme changed, re-highlighting whole buffer");
            schedule_full(model)
        }
        HighlightMsg::Completed { job, result } => apply_result(model, job, result),
    }
}

/// Validate a finished job and write its spans into the buffer
fn apply_result(
    model: &mut StorageModel,
    job: HighlightJob,
    result: Option<StyledText>,
) -> Option<Cmd> {
    let Some(styled) = result else {
        // Engine failures are silent: no delegate call, no attribute change
        tracing::debug!("Highlight job {} produced no result", job.id);
        model.stats.failed += 1;
        return None;
    };

    if let Err(reason) = staleness::check(&model.buffer, &job, &styled.text, model.language) {
        tracing::debug!(
            "Discarding stale highlight job {} (dispatched at rev {}, now rev {}): {}",
            job.id,
            job.revision,
            model.revision,
            reason
        );
        model.stats.stale += 1;
        model.notify_did_highlight(job.range, false);
        return None;
    }

    let covers_buffer = job.range.start == 0 && job.range.end == model.buffer.len_chars();
    let written = match job.kind {
        JobKind::Full if covers_buffer => merge::replace_all(&mut model.buffer, &styled.spans),
        _ => merge::overlay(&mut model.buffer, job.base(), &styled.spans),
    };

    tracing::debug!(
        "Applied highlight job {} ({:?}): {} spans over {:?}",
        job.id,
        job.kind,
        written,
        job.range
    );
    model.stats.applied += 1;
    model.notify_did_highlight(job.range.clone(), true);

    Some(Cmd::Edited(EditEvent::attributes(job.range)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{Attribute, AttributeSet};
    use crate::syntax::{LanguageId, StyledSpan};

    fn model_with(text: &str) -> StorageModel {
        let mut model = StorageModel::with_text(text);
        model.language = Some(LanguageId::Rust);
        model
    }

    fn take_job(model: &mut StorageModel) -> HighlightJob {
        match schedule_full(model) {
            Some(Cmd::RunHighlight(job)) => job,
            other => panic!("Expected RunHighlight, got {:?}", other),
        }
    }

    fn keyword_span(range: std::ops::Range<usize>) -> StyledSpan {
        StyledSpan::new(range, AttributeSet::from_iter([Attribute::Token("keyword")]))
    }

    #[test]
    fn test_completed_applies_spans() {
        let mut model = model_with("let x = 1");
        let job = take_job(&mut model);
        let result = StyledText::new("let x = 1", vec![keyword_span(0..3)]);

        let cmd = update_highlight(
            &mut model,
            HighlightMsg::Completed {
                job,
                result: Some(result),
            },
        );

        assert!(matches!(cmd, Some(Cmd::Edited(ref e)) if e.range == (0..9)));
        assert!(model.buffer.attributes_at(0).unwrap().has_token("keyword"));
        assert_eq!(model.stats.applied, 1);
    }

    #[test]
    fn test_engine_failure_is_silent() {
        let mut model = model_with("let x = 1");
        let job = take_job(&mut model);
        let cmd = update_highlight(&mut model, HighlightMsg::Completed { job, result: None });
        assert!(cmd.is_none());
        assert_eq!(model.stats.failed, 1);
        assert_eq!(model.stats.stale, 0);
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut model = model_with("let x = 1");
        let job = take_job(&mut model);
        model.buffer.replace(4..5, "y").unwrap();
        model.revision += 1;

        let result = StyledText::new("let x = 1", vec![keyword_span(0..3)]);
        let cmd = update_highlight(
            &mut model,
            HighlightMsg::Completed {
                job,
                result: Some(result),
            },
        );

        assert!(cmd.is_none());
        assert!(model.buffer.attributes_at(0).unwrap().is_empty());
        assert_eq!(model.stats.stale, 1);
    }

    #[test]
    fn test_full_job_overlays_when_buffer_grew() {
        let mut model = model_with("let");
        let job = take_job(&mut model);
        model
            .buffer
            .replace(3..3, " x")
            .unwrap();
        model
            .buffer
            .set_attributes(3..5, AttributeSet::from_iter([Attribute::Bold]))
            .unwrap();

        let result = StyledText::new("let", vec![keyword_span(0..3)]);
        update_highlight(
            &mut model,
            HighlightMsg::Completed {
                job,
                result: Some(result),
            },
        );

        assert!(model.buffer.attributes_at(0).unwrap().has_token("keyword"));
        assert!(model.buffer.attributes_at(4).unwrap().contains(&Attribute::Bold));
    }
}
