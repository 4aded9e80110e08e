//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

pub mod edit;
mod highlight;
pub mod merge;
pub mod staleness;
mod storage;

use crate::commands::Cmd;
use crate::messages::{HighlightMsg, Msg, StorageMsg};
use crate::model::StorageModel;

use tracing::{span, Level};

pub use edit::{dispatch_highlight, schedule_after_edit, schedule_full};
pub use highlight::update_highlight;
pub use staleness::Staleness;
pub use storage::update_storage;

/// Main update function - dispatches to sub-handlers
pub fn update(model: &mut StorageModel, msg: Msg) -> Option<Cmd> {
    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();
    tracing::trace!(target: "message", msg = %msg_name, rev = model.revision, "processing");

    match msg {
        Msg::Storage(m) => update_storage(model, m),
        Msg::Highlight(m) => update_highlight(model, m),
    }
}

/// Get a display name for a message type
///
/// Kept short: jobs carry a full text snapshot that must not end up in logs.
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::Storage(StorageMsg::ReplaceCharacters { range, text }) => {
            format!("Storage::ReplaceCharacters({:?}, {} chars)", range, text.chars().count())
        }
        Msg::Storage(StorageMsg::SetAttributes { range, .. }) => {
            format!("Storage::SetAttributes({:?})", range)
        }
        Msg::Storage(StorageMsg::AddAttributes { range, .. }) => {
            format!("Storage::AddAttributes({:?})", range)
        }
        Msg::Storage(StorageMsg::SetLanguage(lang)) => format!("Storage::SetLanguage({:?})", lang),
        Msg::Highlight(HighlightMsg::Request { range }) => format!("Highlight::Request({:?})", range),
        Msg::Highlight(HighlightMsg::RequestAll) => "Highlight::RequestAll".to_string(),
        Msg::Highlight(HighlightMsg::Completed { job, result }) => format!(
            "Highlight::Completed(job {}, {:?}, ok={})",
            job.id,
            job.range,
            result.is_some()
        ),
        Msg::Highlight(HighlightMsg::ThemeChanged) => "Highlight::ThemeChanged".to_string(),
    }
}
