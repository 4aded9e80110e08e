//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.

use crate::model::{EditEvent, HighlightJob};

/// Commands returned by update functions
#[derive(Debug, Clone, Default)]
pub enum Cmd {
    /// No command
    #[default]
    None,
    /// Report a mutation to the host's observers
    Edited(EditEvent),
    /// Run a highlight job off the primary thread
    /// Sends Msg::Highlight(Completed) when done
    RunHighlight(HighlightJob),
    /// Multiple commands to execute
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    /// Combine two optional commands into one
    pub fn join(first: Option<Cmd>, second: Option<Cmd>) -> Option<Cmd> {
        match (first, second) {
            (None, None) => None,
            (Some(cmd), None) | (None, Some(cmd)) => Some(cmd),
            (Some(a), Some(b)) => Some(Cmd::Batch(vec![a, b])),
        }
    }

    /// Highlight jobs contained in this command (recursing into batches)
    pub fn jobs(&self) -> Vec<&HighlightJob> {
        match self {
            Cmd::RunHighlight(job) => vec![job],
            Cmd::Batch(cmds) => cmds.iter().flat_map(Cmd::jobs).collect(),
            Cmd::None | Cmd::Edited(_) => Vec::new(),
        }
    }
}
