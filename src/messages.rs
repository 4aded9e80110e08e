//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types.

use std::ops::Range;

use crate::attributes::AttributeSet;
use crate::model::HighlightJob;
use crate::syntax::{LanguageId, StyledText};

/// Host-initiated storage mutations
#[derive(Debug, Clone)]
pub enum StorageMsg {
    /// Replace the characters in a range (range already validated)
    ReplaceCharacters { range: Range<usize>, text: String },
    /// Replace the attributes of a range
    SetAttributes {
        range: Range<usize>,
        attributes: AttributeSet,
    },
    /// Merge attributes into a range
    AddAttributes {
        range: Range<usize>,
        attributes: AttributeSet,
    },
    /// Change the language selector (triggers a full re-highlight)
    SetLanguage(Option<LanguageId>),
}

/// Highlight pipeline messages
#[derive(Debug, Clone)]
pub enum HighlightMsg {
    /// Highlight a raw range without paragraph expansion
    Request { range: Range<usize> },
    /// Re-highlight the whole buffer
    RequestAll,
    /// A worker finished a job; `result` is `None` if the engine failed
    Completed {
        job: HighlightJob,
        result: Option<StyledText>,
    },
    /// The engine's theme changed
    ThemeChanged,
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    Storage(StorageMsg),
    Highlight(HighlightMsg),
}
