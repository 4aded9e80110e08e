//! Highlighting engines
//!
//! The storage talks to highlighters only through [`HighlightEngine`]. Jobs
//! call it from background threads, so implementations must tolerate
//! concurrent `highlight` calls.

use std::sync::{Mutex, PoisonError, RwLock};

use super::highlights::{highlight_name, segment_tokens, StyledSpan, StyledText};
use super::languages::LanguageId;
use super::parser::ParserState;
use crate::theme::Theme;

/// Called when the engine's theme changes. Return `false` to unsubscribe.
pub type ThemeListener = Box<dyn Fn() -> bool + Send + Sync>;

/// Maps text in a language to styled spans
pub trait HighlightEngine: Send + Sync {
    /// Highlight `text`, or `None` for an unsupported language or grammar failure.
    ///
    /// Span ranges are char offsets into `text`.
    fn highlight(&self, text: &str, language: LanguageId) -> Option<StyledText>;

    /// Register for theme change notifications
    fn subscribe_theme_changes(&self, _listener: ThemeListener) {}
}

/// Tree-sitter backed engine with a themed attribute mapping
pub struct TreeSitterEngine {
    theme: RwLock<Theme>,
    /// Idle parser states; jobs check one out per call
    parsers: Mutex<Vec<ParserState>>,
    listeners: Mutex<Vec<ThemeListener>>,
}

impl TreeSitterEngine {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme: RwLock::new(theme),
            parsers: Mutex::new(Vec::new()),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn theme_name(&self) -> String {
        self.theme
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .name
            .clone()
    }

    /// Swap the theme and notify subscribers
    pub fn set_theme(&self, theme: Theme) {
        tracing::info!("Theme changed to {}", theme.name);
        *self.theme.write().unwrap_or_else(PoisonError::into_inner) = theme;

        let mut listeners = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        listeners.retain(|listener| listener());
    }

    fn checkout_parser(&self) -> ParserState {
        self.parsers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .unwrap_or_default()
    }

    fn return_parser(&self, state: ParserState) {
        self.parsers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(state);
    }
}

impl Default for TreeSitterEngine {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl HighlightEngine for TreeSitterEngine {
    fn highlight(&self, text: &str, language: LanguageId) -> Option<StyledText> {
        let mut state = self.checkout_parser();
        let tokens = state.highlight_tokens(text, language);
        self.return_parser(state);
        let tokens = tokens?;

        let theme = self.theme.read().unwrap_or_else(PoisonError::into_inner);
        let plain = theme.plain_attributes();
        let len = text.chars().count();

        let spans = segment_tokens(&tokens, len)
            .into_iter()
            .map(|(range, highlight)| {
                let attributes = match highlight.and_then(highlight_name) {
                    Some(class) => theme.attributes_for(class),
                    None => plain.clone(),
                };
                StyledSpan::new(range, attributes)
            })
            .collect();

        Some(StyledText::new(text, spans))
    }

    fn subscribe_theme_changes(&self, listener: ThemeListener) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }
}
