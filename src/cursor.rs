//! Source positions and spans.
//!
//! [`LexerCursor`] walks the source text one character at a time and keeps
//! a [`Span`] covering the lexeme currently being matched. Lines and columns
//! are 1-based so that spans can be shown to the user unchanged.

use std::fmt;

/// A 1-based line/column position in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number (character position in the line).
    pub column: usize,
}

impl Position {
    /// Creates a new `Position`.
    #[inline]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// A half-open source range: `[start, end)`.
///
/// It is conventional for `start <= end` in lexicographic `(line, column)`
/// ordering; this is not enforced.
#[derive(Debug, Clone, Default, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    /// Creates a new `Span`.
    #[inline]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Restarts this span at its current `end` position.
    /// Effect: span(x,y, z,w) -> span(z,w, z,w)
    pub fn collapse(&mut self) {
        self.start = self.end;
    }

    /// Merge with another span by covering both.
    pub fn merge(&self, other: &Span) -> Span {
        let start = if self.start <= other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end >= other.end {
            self.end
        } else {
            other.end
        };
        Span { start, end }
    }
}

impl fmt::Display for Span {
    /// Diagnostics only point at where a span starts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.start.line, self.start.column)
    }
}

/// Tracks the current lexical position.
///
/// `LexerCursor` advances over the input character by character, updating
/// its byte offset and the span of the lexeme being matched.
#[derive(Debug, Clone, Default)]
pub struct LexerCursor {
    pub pos: usize,
    pub span: Span,
}

impl LexerCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by consuming the character `c`.
    ///
    /// A lone `\r` and the `\n` of a `\r\n` pair both end a line; the `\r`
    /// of a pair is an ordinary column step.
    pub fn advance(&mut self, c: char, next: Option<char>) {
        if c == '\n' || (c == '\r' && next != Some('\n')) {
            self.span.end.line += 1;
            self.span.end.column = 1;
        } else {
            self.span.end.column += 1;
        }
        self.pos += c.len_utf8();
    }

    /// Advance over a whole matched lexeme.
    pub fn advance_str(&mut self, s: &str) {
        let mut chars = s.chars().peekable();
        while let Some(c) = chars.next() {
            self.advance(c, chars.peek().copied());
        }
    }
}

/// Build an `Option<Span>` inline from 1-based line/column coordinates.
///
/// # Examples
///
/// ```rust
/// # use climb_calc::span;
/// let s = span!(1, 1, 2, 4);
/// assert_eq!(s.unwrap().end.column, 4);
/// ```
#[macro_export]
macro_rules! span {
    ($line_start:expr, $col_start:expr, $line_end:expr, $col_end:expr) => {
        Some($crate::Span {
            start: $crate::Position {
                line: $line_start,
                column: $col_start,
            },
            end: $crate::Position {
                line: $line_end,
                column: $col_end,
            },
        })
    };
}
