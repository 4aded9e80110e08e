//! Attributed text buffer
//!
//! Text lives in a [`Rope`]; attributes live in a parallel run-length list.
//! All positions are char indices.
//!
//! Invariants kept by every mutation:
//! - run lengths sum to `len_chars()`
//! - no run has zero length
//! - adjacent runs never carry equal attribute sets

use std::ops::Range;

use ropey::{Rope, RopeSlice};

use crate::attributes::AttributeSet;

/// A range handed to the buffer did not fit inside it
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    #[error("range {start}..{end} is out of bounds for buffer of length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },
    #[error("range start {start} is after range end {end}")]
    Inverted { start: usize, end: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeRun {
    len: usize,
    attributes: AttributeSet,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributedBuffer {
    text: Rope,
    runs: Vec<AttributeRun>,
}

impl AttributedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer holding `text` with no attributes
    pub fn from_text(text: &str) -> Self {
        Self::from_rope(Rope::from_str(text))
    }

    /// Fresh attribute storage over an existing text snapshot
    pub fn from_rope(text: Rope) -> Self {
        let len = text.len_chars();
        let runs = if len == 0 {
            Vec::new()
        } else {
            vec![AttributeRun {
                len,
                attributes: AttributeSet::new(),
            }]
        };
        Self { text, runs }
    }

    pub fn len_chars(&self) -> usize {
        self.text.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    /// O(1) immutable snapshot of the current text
    pub fn snapshot(&self) -> Rope {
        self.text.clone()
    }

    pub fn text(&self) -> String {
        self.text.to_string()
    }

    /// Text in `range`, or `None` if the range does not fit
    pub fn substring(&self, range: Range<usize>) -> Option<String> {
        self.check_range(&range).ok()?;
        Some(self.text.slice(range).to_string())
    }

    /// Whether the text in `range` is exactly `expected` (false if out of bounds)
    pub fn text_matches(&self, range: Range<usize>, expected: &str) -> bool {
        if self.check_range(&range).is_err() {
            return false;
        }
        self.text.slice(range) == expected
    }

    pub fn check_range(&self, range: &Range<usize>) -> Result<(), BufferError> {
        if range.start > range.end {
            return Err(BufferError::Inverted {
                start: range.start,
                end: range.end,
            });
        }
        let len = self.len_chars();
        if range.end > len {
            return Err(BufferError::OutOfBounds {
                start: range.start,
                end: range.end,
                len,
            });
        }
        Ok(())
    }

    /// Replace the text in `range`, returning the net change in length.
    ///
    /// New text takes the attributes of the first replaced character, or of
    /// the character before the insertion point for pure insertions.
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> Result<isize, BufferError> {
        self.check_range(&range)?;

        let inherited = self.inherited_attributes(&range);
        let new_len = text.chars().count();

        self.text.remove(range.clone());
        self.text.insert(range.start, text);

        let first = self.split_at(range.start);
        let last = self.split_at(range.end);
        self.runs.drain(first..last);
        if new_len > 0 {
            self.runs.insert(
                first,
                AttributeRun {
                    len: new_len,
                    attributes: inherited,
                },
            );
        }
        self.normalize();

        Ok(new_len as isize - range.len() as isize)
    }

    /// Replace the attributes of every character in `range` with `attributes`
    pub fn set_attributes(
        &mut self,
        range: Range<usize>,
        attributes: AttributeSet,
    ) -> Result<(), BufferError> {
        self.check_range(&range)?;
        if range.is_empty() {
            return Ok(());
        }

        let first = self.split_at(range.start);
        let last = self.split_at(range.end);
        self.runs.drain(first..last);
        self.runs.insert(
            first,
            AttributeRun {
                len: range.len(),
                attributes,
            },
        );
        self.normalize();
        Ok(())
    }

    /// Merge `attributes` into whatever each character in `range` already has
    pub fn add_attributes(
        &mut self,
        range: Range<usize>,
        attributes: &AttributeSet,
    ) -> Result<(), BufferError> {
        self.check_range(&range)?;
        if range.is_empty() {
            return Ok(());
        }

        let first = self.split_at(range.start);
        let last = self.split_at(range.end);
        for run in &mut self.runs[first..last] {
            run.attributes.merge(attributes);
        }
        self.normalize();
        Ok(())
    }

    pub fn attributes_at(&self, location: usize) -> Option<&AttributeSet> {
        self.attributes_with_range(location).map(|(attrs, _)| attrs)
    }

    /// Attributes at `location` plus the full extent of the run holding them
    pub fn attributes_with_range(&self, location: usize) -> Option<(&AttributeSet, Range<usize>)> {
        self.runs()
            .find(|(range, _)| range.contains(&location))
            .map(|(range, attrs)| (attrs, range))
    }

    /// Attribute runs in buffer order
    pub fn runs(&self) -> impl Iterator<Item = (Range<usize>, &AttributeSet)> + '_ {
        self.runs.iter().scan(0usize, |start, run| {
            let range = *start..*start + run.len;
            *start += run.len;
            Some((range, &run.attributes))
        })
    }

    /// Expand `range` to whole lines, excluding the final line terminator.
    ///
    /// The line holding `range.end` is included, so a newline inserted
    /// mid-line pulls in the text it pushed onto the next line.
    pub fn paragraph_range(&self, range: Range<usize>) -> Range<usize> {
        let len = self.len_chars();
        let start = range.start.min(len);
        let end = range.end.clamp(start, len);

        let first_line = self.text.char_to_line(start);
        let last_line = self.text.char_to_line(end);
        let para_start = self.text.line_to_char(first_line);

        let line = self.text.line(last_line);
        let para_end =
            self.text.line_to_char(last_line) + line.len_chars() - line_terminator_len(line);

        para_start..para_end.max(para_start)
    }

    fn inherited_attributes(&self, range: &Range<usize>) -> AttributeSet {
        let location = if !range.is_empty() || range.start == 0 {
            range.start
        } else {
            range.start - 1
        };
        self.attributes_at(location).cloned().unwrap_or_default()
    }

    /// Split runs so that one starts at `pos`; returns its index
    /// (`runs.len()` when `pos` is the end of the buffer).
    fn split_at(&mut self, pos: usize) -> usize {
        let mut start = 0;
        for i in 0..self.runs.len() {
            let len = self.runs[i].len;
            if pos == start {
                return i;
            }
            if pos < start + len {
                let head = pos - start;
                let tail = AttributeRun {
                    len: len - head,
                    attributes: self.runs[i].attributes.clone(),
                };
                self.runs[i].len = head;
                self.runs.insert(i + 1, tail);
                return i + 1;
            }
            start += len;
        }
        self.runs.len()
    }

    fn normalize(&mut self) {
        let mut merged: Vec<AttributeRun> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.len == 0 {
                continue;
            }
            match merged.last_mut() {
                Some(last) if last.attributes == run.attributes => last.len += run.len,
                _ => merged.push(run),
            }
        }
        self.runs = merged;
        debug_assert_eq!(
            self.runs.iter().map(|r| r.len).sum::<usize>(),
            self.text.len_chars()
        );
    }
}

fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}

fn line_terminator_len(line: RopeSlice<'_>) -> usize {
    let n = line.len_chars();
    if n >= 2 && line.char(n - 2) == '\r' && line.char(n - 1) == '\n' {
        2
    } else if n >= 1 && is_line_break(line.char(n - 1)) {
        1
    } else {
        0
    }
}
