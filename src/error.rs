//! # Calculator Error Type
//!
//! This module defines [`CalcError`], the single diagnostic type of the
//! calculator pipeline. It covers four kinds of failure:
//!
//! - **Lexical**: an illegal character or an unrepresentable literal. The
//!   lexer reports it and keeps going.
//! - **Semantic**: a reference to an undefined name. The evaluator reports
//!   it, substitutes `0` and keeps going.
//! - **Arithmetic**: division by zero, a function outside its domain, or an
//!   integer overflow. Reported at the statement boundary; the statement
//!   prints nothing.
//! - **Syntax**: the token sequence does not fit the grammar. This ends the
//!   current parse.
use crate::symtab::SymTabError;
use crate::token::{CalcToken, TokenID};
use crate::value::ArithError;
use crate::Span;
use smartstring::alias::String;
use std::fmt;
use thiserror::Error;

/// What the parser found where the grammar expected something else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Found {
    /// A token with a printable lexeme.
    Token(String),
    /// A line break.
    EndOfLine,
    /// The end of the input.
    Eof,
}

impl From<&CalcToken> for Found {
    fn from(tok: &CalcToken) -> Self {
        match tok.token_id {
            TokenID::End => Found::Eof,
            TokenID::NewLine => Found::EndOfLine,
            _ => Found::Token(tok.lexeme.clone()),
        }
    }
}

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Found::Token(s) => write!(f, "'{s}'"),
            Found::EndOfLine => f.write_str("end of line"),
            Found::Eof => f.write_str("EOF"),
        }
    }
}

/// A diagnostic produced while lexing, parsing or evaluating.
///
/// # Examples
/// ```rust
/// # use climb_calc::{CalcError, Found, span};
/// let err = CalcError::Syntax {
///     found: Found::Eof,
///     span: span!(2, 5, 2, 5).unwrap(),
/// };
/// assert!(err.is_fatal());
/// assert_eq!(err.to_string(), "Syntax error at EOF (line 2, column 5)");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// A character that starts no token. Exactly that character is skipped.
    #[error("Illegal character {ch:?} ({span})")]
    IllegalChar { ch: char, span: Span },

    /// An integer literal that does not fit in an `i64`. The whole lexeme is
    /// skipped.
    #[error("Literal '{lexeme}' out of range ({span})")]
    LiteralRange { lexeme: String, span: Span },

    /// A variable was read before any assignment.
    #[error("{source} ({span})")]
    Undefined { source: SymTabError, span: Span },

    /// Evaluation of a statement failed.
    #[error("Arithmetic error: {source} ({span})")]
    Arithmetic { source: ArithError, span: Span },

    /// The token stream violates the grammar.
    #[error("Syntax error at {found} ({span})")]
    Syntax { found: Found, span: Span },

    /// An operand is nested too deeply to evaluate.
    #[error("Nesting too deep at {found} ({span})")]
    Nesting { found: Found, span: Span },
}

impl CalcError {
    /// Builds a syntax error pointing at `tok`.
    pub fn syntax(tok: &CalcToken) -> Self {
        CalcError::Syntax {
            found: Found::from(tok),
            span: tok.span,
        }
    }

    /// Where in the source the problem was detected.
    pub fn span(&self) -> Span {
        match self {
            CalcError::IllegalChar { span, .. }
            | CalcError::LiteralRange { span, .. }
            | CalcError::Undefined { span, .. }
            | CalcError::Arithmetic { span, .. }
            | CalcError::Syntax { span, .. }
            | CalcError::Nesting { span, .. } => *span,
        }
    }

    /// Only syntax and nesting errors end a parse.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CalcError::Syntax { .. } | CalcError::Nesting { .. })
    }
}
