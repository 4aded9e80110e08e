//! Tree-sitter parser state and highlight extraction
//!
//! Manages parsers and queries for syntax highlighting. Grammars and their
//! queries are compiled the first time a language is requested.

use std::collections::HashMap;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Parser, Query, QueryCursor, Tree};

use super::highlights::{highlight_id_for_name, HighlightToken};
use super::languages::LanguageId;

/// Maps byte offsets of a source string to char offsets
struct CharIndex {
    /// Byte offset of every char
    char_starts: Vec<usize>,
}

impl CharIndex {
    fn new(source: &str) -> Self {
        Self {
            char_starts: source.char_indices().map(|(byte, _)| byte).collect(),
        }
    }

    /// Char offset for a byte offset (number of chars starting before it)
    fn char_at(&self, byte: usize) -> usize {
        self.char_starts.partition_point(|&start| start < byte)
    }
}

fn grammar(lang: LanguageId) -> Option<(Language, &'static str)> {
    let entry: (Language, &'static str) = match lang {
        LanguageId::Rust => (
            tree_sitter_rust::LANGUAGE.into(),
            tree_sitter_rust::HIGHLIGHTS_QUERY,
        ),
        LanguageId::Python => (
            tree_sitter_python::LANGUAGE.into(),
            tree_sitter_python::HIGHLIGHTS_QUERY,
        ),
        LanguageId::Go => (
            tree_sitter_go::LANGUAGE.into(),
            tree_sitter_go::HIGHLIGHTS_QUERY,
        ),
        // C, C++ and Bash export HIGHLIGHT_QUERY (singular)
        LanguageId::C => (tree_sitter_c::LANGUAGE.into(), tree_sitter_c::HIGHLIGHT_QUERY),
        LanguageId::Cpp => (
            tree_sitter_cpp::LANGUAGE.into(),
            tree_sitter_cpp::HIGHLIGHT_QUERY,
        ),
        LanguageId::Java => (
            tree_sitter_java::LANGUAGE.into(),
            tree_sitter_java::HIGHLIGHTS_QUERY,
        ),
        LanguageId::Bash => (
            tree_sitter_bash::LANGUAGE.into(),
            tree_sitter_bash::HIGHLIGHT_QUERY,
        ),
        LanguageId::PlainText => return None,
    };
    Some(entry)
}

/// Per-thread parser state (tree-sitter parsers are !Sync)
pub struct ParserState {
    /// Parser instances per language
    parsers: HashMap<LanguageId, Parser>,
    /// Compiled queries per language
    queries: HashMap<LanguageId, Query>,
}

impl ParserState {
    /// Create an empty parser state; languages initialize on first use
    pub fn new() -> Self {
        Self {
            parsers: HashMap::new(),
            queries: HashMap::new(),
        }
    }

    /// Whether `lang` has a ready parser and query
    pub fn is_initialized(&self, lang: LanguageId) -> bool {
        self.parsers.contains_key(&lang) && self.queries.contains_key(&lang)
    }

    /// Initialize a language's parser and query. Returns false if the
    /// language has no grammar or setup failed.
    fn ensure_language(&mut self, lang: LanguageId) -> bool {
        if self.is_initialized(lang) {
            return true;
        }

        let Some((ts_lang, highlights_scm)) = grammar(lang) else {
            return false;
        };

        let mut parser = Parser::new();
        if let Err(e) = parser.set_language(&ts_lang) {
            tracing::error!("Failed to set language for {:?}: {}", lang, e);
            return false;
        }

        // Query compilation may fail if query syntax is invalid
        let query = match Query::new(&ts_lang, highlights_scm) {
            Ok(query) => query,
            Err(e) => {
                tracing::error!("Failed to compile query for {:?}: {:?}", lang, e);
                return false;
            }
        };

        tracing::debug!("Initialized grammar for {:?}", lang);
        self.parsers.insert(lang, parser);
        self.queries.insert(lang, query);
        true
    }

    /// Parse `source` and extract highlight tokens in char offsets.
    ///
    /// Returns `None` when the language has no grammar or parsing fails.
    pub fn highlight_tokens(
        &mut self,
        source: &str,
        language: LanguageId,
    ) -> Option<Vec<HighlightToken>> {
        if !self.ensure_language(language) {
            return None;
        }

        let parser = self.parsers.get_mut(&language)?;
        let Some(tree) = parser.parse(source, None) else {
            tracing::warn!("Parse failed for {:?}", language);
            return None;
        };

        Some(self.extract_tokens(source, &tree, language))
    }

    /// Extract highlight tokens from a parsed tree
    fn extract_tokens(&self, source: &str, tree: &Tree, language: LanguageId) -> Vec<HighlightToken> {
        let Some(query) = self.queries.get(&language) else {
            return Vec::new();
        };

        let index = CharIndex::new(source);
        let mut tokens = Vec::new();
        let mut cursor = QueryCursor::new();

        // Run query and collect captures using StreamingIterator
        let mut captures = cursor.captures(query, tree.root_node(), source.as_bytes());
        while let Some((query_match, capture_idx)) = captures.next() {
            let capture = &query_match.captures[*capture_idx];
            let capture_name = &query.capture_names()[capture.index as usize];

            // Skip captures the theme has no class for
            let Some(highlight) = highlight_id_for_name(capture_name) else {
                continue;
            };

            let node = capture.node;
            let start = index.char_at(node.start_byte());
            let end = index.char_at(node.end_byte());
            if start < end {
                tokens.push(HighlightToken {
                    start,
                    end,
                    highlight,
                });
            }
        }

        tokens.sort_by_key(|t| (t.start, t.end));
        tracing::trace!("Extracted {} tokens for {:?}", tokens.len(), language);
        tokens
    }
}

impl Default for ParserState {
    fn default() -> Self {
        Self::new()
    }
}
