use std::ops::Range;
use thiserror::Error;

//===========================================================================//

/// A span of byte offsets within a script.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SrcSpan {
    start: usize,
    end: usize,
}

impl SrcSpan {
    /// Constructs a span from the given the byte range.
    pub fn from_byte_range(range: Range<usize>) -> SrcSpan {
        assert!(range.start <= range.end);
        SrcSpan { start: range.start, end: range.end }
    }

    /// Returns the byte range represented by this span.
    pub fn byte_range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Merges two spans, returning the smallest span that covers both.
    pub fn merged_with(&self, other: SrcSpan) -> SrcSpan {
        SrcSpan {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Returns the one-based line number and zero-based column of the start
    /// of this span within `source`.
    pub fn line_and_column(&self, source: &str) -> (usize, usize) {
        let before = &source[..self.start.min(source.len())];
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(index) => before.len() - index - 1,
            None => before.len(),
        };
        (line, column)
    }

    pub(crate) fn end_span(&self) -> SrcSpan {
        SrcSpan { start: self.end, end: self.end }
    }
}

//===========================================================================//

/// An error encountered while parsing a script.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("{message}")]
pub struct ParseError {
    /// The location in the script where the error occurred.
    pub span: SrcSpan,
    /// The error message to report to the user.
    pub message: String,
}

impl ParseError {
    /// Constructs a parse error with the given span and message.
    pub fn new(span: SrcSpan, message: String) -> ParseError {
        ParseError { span, message }
    }
}

//===========================================================================//


//===========================================================================//
