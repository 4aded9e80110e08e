//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::ops::Range;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use syntax_storage::attributes::{Attribute, AttributeSet};
use syntax_storage::model::HighlightDelegate;
use syntax_storage::runtime::ExecutionMode;
use syntax_storage::syntax::{HighlightEngine, LanguageId, StyledSpan, StyledText, ThemeListener};
use syntax_storage::TextStorage;

/// Deterministic engine: "let"/"fn" are keywords, digit runs are numbers,
/// other words are identifiers, everything else is unstyled.
#[derive(Default)]
pub struct ScriptedEngine {
    failing: AtomicBool,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
    listeners: Mutex<Vec<ThemeListener>>,
}

impl ScriptedEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every following `highlight` call return `None`
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Texts handed to the engine, in call order
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    /// Notify subscribers as a theme switch would
    pub fn change_theme(&self) {
        self.listeners.lock().unwrap().retain(|listener| listener());
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }
}

fn classify(word: &str) -> &'static str {
    match word {
        "let" | "fn" => "keyword",
        w if w.chars().all(|c| c.is_ascii_digit()) => "number",
        _ => "identifier",
    }
}

impl HighlightEngine for ScriptedEngine {
    fn highlight(&self, text: &str, _language: LanguageId) -> Option<StyledText> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(text.to_string());
        if self.failing.load(Ordering::SeqCst) {
            return None;
        }

        let chars: Vec<char> = text.chars().collect();
        let mut spans = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            let is_word = |c: char| c.is_alphanumeric() || c == '_';
            let start = i;
            let word = is_word(chars[i]);
            while i < chars.len() && is_word(chars[i]) == word {
                i += 1;
            }
            let attributes = if word {
                let text: String = chars[start..i].iter().collect();
                AttributeSet::from_iter([Attribute::Token(classify(&text))])
            } else {
                AttributeSet::new()
            };
            spans.push(StyledSpan::new(start..i, attributes));
        }

        Some(StyledText::new(text, spans))
    }

    fn subscribe_theme_changes(&self, listener: ThemeListener) {
        self.listeners.lock().unwrap().push(listener);
    }
}

/// Delegate that records every hook call; clones share state
#[derive(Clone, Default)]
pub struct RecordingDelegate {
    pub asked: Rc<RefCell<Vec<Range<usize>>>>,
    pub completed: Rc<RefCell<Vec<(Range<usize>, bool)>>>,
    pub veto: Rc<Cell<bool>>,
}

impl RecordingDelegate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn completed(&self) -> Vec<(Range<usize>, bool)> {
        self.completed.borrow().clone()
    }
}

impl HighlightDelegate for RecordingDelegate {
    fn should_highlight(&mut self, range: &Range<usize>) -> Option<bool> {
        self.asked.borrow_mut().push(range.clone());
        Some(!self.veto.get())
    }

    fn did_highlight(&mut self, range: Range<usize>, success: bool) {
        self.completed.borrow_mut().push((range, success));
    }
}

/// Queued-mode storage over a scripted engine, holding `text`, no language yet
pub fn queued_storage(text: &str) -> (TextStorage, Arc<ScriptedEngine>) {
    let engine = ScriptedEngine::new();
    let mut storage = TextStorage::with_mode(engine.clone(), ExecutionMode::Queued);
    if !text.is_empty() {
        storage.replace_characters(0..0, text).unwrap();
    }
    (storage, engine)
}

/// Token class at `location`, if any
pub fn token_at(storage: &TextStorage, location: usize) -> Option<&'static str> {
    storage.attributes_at(location).and_then(|set| set.token())
}

/// Snapshot of every attribute run
pub fn runs(storage: &TextStorage) -> Vec<(Range<usize>, AttributeSet)> {
    storage
        .buffer()
        .runs()
        .map(|(range, set)| (range, set.clone()))
        .collect()
}
