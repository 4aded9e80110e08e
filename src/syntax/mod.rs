//! Syntax highlighting module
//!
//! Provides tree-sitter based highlighting behind the [`HighlightEngine`] trait:
//! - Language detection from file extensions and names
//! - Lazily initialized grammars, one parser state per concurrent job
//! - Theme mapping from capture classes to attribute sets
//!
//! ## Supported Languages
//!
//! Rust, Python, Go, C, C++, Java, Bash

mod engine;
mod highlights;
mod languages;
mod parser;

pub use engine::{HighlightEngine, ThemeListener, TreeSitterEngine};
pub use highlights::{
    highlight_id_for_name, highlight_name, segment_tokens, HighlightId, HighlightToken,
    StyledSpan, StyledText, HIGHLIGHT_NAMES,
};
pub use languages::LanguageId;
pub use parser::ParserState;
