//! Syntax Storage - attributed text storage with asynchronous highlighting
//!
//! This crate provides a text buffer with per-character attributes that
//! re-highlights itself after every edit. Highlighting runs off the owning
//! thread; results are validated against the live text before they are
//! applied, following the Elm Architecture pattern.

pub mod attributes;
pub mod buffer;
pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod messages;
pub mod model;
pub mod runtime;
pub mod storage;
pub mod syntax;
pub mod theme;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use attributes::{Attribute, AttributeSet};
pub use buffer::{AttributedBuffer, BufferError};
pub use commands::Cmd;
pub use config::StorageConfig;
pub use messages::Msg;
pub use model::{
    CallbackDelegate, EditEvent, EditKind, HighlightDelegate, HighlightStats, StorageModel,
};
pub use runtime::ExecutionMode;
pub use storage::{EditObserver, StorageError, TextStorage};
pub use syntax::{HighlightEngine, LanguageId, StyledSpan, StyledText, TreeSitterEngine};
pub use theme::{Color, Theme};
