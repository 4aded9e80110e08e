//! Syntax highlighting data structures
//!
//! Defines grammar tokens and the styled output handed back to the storage.

use std::ops::Range;

use serde::Serialize;

use crate::attributes::AttributeSet;

/// Standard tree-sitter capture names mapped to theme classes.
/// Index into this array is the HighlightId.
pub const HIGHLIGHT_NAMES: &[&str] = &[
    "attribute",             // @attribute
    "boolean",               // @boolean (true, false)
    "comment",               // @comment
    "constant",              // @constant
    "constant.builtin",      // @constant.builtin (null, nil)
    "constructor",           // @constructor (new Foo)
    "escape",                // @escape (string escapes)
    "function",              // @function
    "function.builtin",      // @function.builtin (echo, print)
    "function.macro",        // @function.macro (println!)
    "function.method",       // @function.method
    "keyword",               // @keyword
    "keyword.return",        // @keyword.return
    "keyword.function",      // @keyword.function (function, fn)
    "keyword.operator",      // @keyword.operator (and, or)
    "label",                 // @label
    "number",                // @number
    "operator",              // @operator
    "property",              // @property
    "punctuation",           // @punctuation (general)
    "punctuation.bracket",   // @punctuation.bracket
    "punctuation.delimiter", // @punctuation.delimiter
    "punctuation.special",   // @punctuation.special
    "string",                // @string
    "string.special",        // @string.special (regex, heredoc)
    "tag",                   // @tag
    "type",                  // @type
    "type.builtin",          // @type.builtin (int, string, bool)
    "variable",              // @variable
    "variable.builtin",      // @variable.builtin ($this, self)
    "variable.parameter",    // @variable.parameter
];

/// Index into HIGHLIGHT_NAMES
pub type HighlightId = u16;

/// A highlighted region of the source, in char offsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightToken {
    /// Start char (inclusive)
    pub start: usize,
    /// End char (exclusive)
    pub end: usize,
    /// Index into HIGHLIGHT_NAMES
    pub highlight: HighlightId,
}

/// One styled region, relative to the start of the highlighted text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledSpan {
    pub range: Range<usize>,
    pub attributes: AttributeSet,
}

impl StyledSpan {
    pub fn new(range: Range<usize>, attributes: AttributeSet) -> Self {
        Self { range, attributes }
    }
}

/// Engine output: the text that was highlighted and its spans
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledText {
    pub text: String,
    pub spans: Vec<StyledSpan>,
}

impl StyledText {
    pub fn new(text: impl Into<String>, spans: Vec<StyledSpan>) -> Self {
        Self {
            text: text.into(),
            spans,
        }
    }
}

/// Look up highlight ID by capture name
pub fn highlight_id_for_name(name: &str) -> Option<HighlightId> {
    // Handle hierarchical names: try exact match first, then progressively shorter
    // parents (e.g. "keyword.control.import" -> "keyword.control" -> "keyword").
    let mut current = name;
    loop {
        if let Some(pos) = HIGHLIGHT_NAMES.iter().position(|&n| n == current) {
            return Some(pos as HighlightId);
        }

        let Some(dot_pos) = current.rfind('.') else {
            break;
        };
        current = &current[..dot_pos];
    }

    None
}

/// Capture name for a highlight ID
pub fn highlight_name(id: HighlightId) -> Option<&'static str> {
    HIGHLIGHT_NAMES.get(id as usize).copied()
}

/// Flatten possibly nested tokens into contiguous segments covering `0..len`.
///
/// Where tokens overlap, the one starting later (or the shorter one for equal
/// starts) wins, so inner captures override their enclosing node. For tokens
/// covering the same range the first one wins: highlight queries list their
/// specific patterns before the general fallbacks. Gaps are returned with `None`.
pub fn segment_tokens(
    tokens: &[HighlightToken],
    len: usize,
) -> Vec<(Range<usize>, Option<HighlightId>)> {
    let mut by_char: Vec<Option<HighlightId>> = vec![None; len];

    let mut ordered: Vec<&HighlightToken> = tokens.iter().collect();
    ordered.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut previous: Option<(usize, usize)> = None;
    for token in ordered {
        // Sorting is stable, so equal ranges stay in capture order
        if previous == Some((token.start, token.end)) {
            continue;
        }
        previous = Some((token.start, token.end));
        let end = token.end.min(len);
        for slot in by_char.iter_mut().take(end).skip(token.start) {
            *slot = Some(token.highlight);
        }
    }

    let mut segments: Vec<(Range<usize>, Option<HighlightId>)> = Vec::new();
    for (i, highlight) in by_char.into_iter().enumerate() {
        match segments.last_mut() {
            Some((range, current)) if *current == highlight => range.end = i + 1,
            _ => segments.push((i..i + 1, highlight)),
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(start: usize, end: usize, name: &str) -> HighlightToken {
        HighlightToken {
            start,
            end,
            highlight: highlight_id_for_name(name).unwrap(),
        }
    }

    #[test]
    fn test_highlight_id_lookup() {
        assert!(highlight_id_for_name("keyword").is_some());
        assert!(highlight_id_for_name("keyword.function").is_some());
        assert!(highlight_id_for_name("keyword.control.import").is_some());
        assert!(highlight_id_for_name("string").is_some());
        assert!(highlight_id_for_name("nonexistent").is_none());
    }

    #[test]
    fn test_highlight_name_roundtrip() {
        let id = highlight_id_for_name("type.builtin").unwrap();
        assert_eq!(highlight_name(id), Some("type.builtin"));
        assert_eq!(highlight_name(u16::MAX), None);
    }

    #[test]
    fn test_segment_tokens_fills_gaps() {
        let tokens = vec![token(0, 3, "keyword"), token(6, 7, "number")];
        let segments = segment_tokens(&tokens, 8);
        let kw = highlight_id_for_name("keyword");
        let num = highlight_id_for_name("number");
        assert_eq!(
            segments,
            vec![(0..3, kw), (3..6, None), (6..7, num), (7..8, None)]
        );
    }

    #[test]
    fn test_segment_tokens_inner_capture_wins() {
        // string "a\nb" with an escape inside
        let tokens = vec![token(3, 5, "escape"), token(0, 8, "string")];
        let segments = segment_tokens(&tokens, 8);
        let s = highlight_id_for_name("string");
        let e = highlight_id_for_name("escape");
        assert_eq!(segments, vec![(0..3, s), (3..5, e), (5..8, s)]);
    }

    #[test]
    fn test_segment_tokens_first_capture_wins_on_same_range() {
        let tokens = vec![
            token(0, 4, "constructor"),
            token(0, 4, "function"),
            token(5, 6, "number"),
        ];
        let segments = segment_tokens(&tokens, 7);
        let c = highlight_id_for_name("constructor");
        let n = highlight_id_for_name("number");
        assert_eq!(
            segments,
            vec![(0..4, c), (4..5, None), (5..6, n), (6..7, None)]
        );
    }

    #[test]
    fn test_segment_tokens_clamps_to_len() {
        let tokens = vec![token(2, 50, "comment")];
        let segments = segment_tokens(&tokens, 4);
        assert_eq!(segments.last().map(|(r, _)| r.end), Some(4));
        assert!(segment_tokens(&[], 0).is_empty());
    }
}
