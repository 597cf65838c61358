//! # Calculator Tokens
//!
//! This module defines the token kinds and the token type produced by the
//! lexer and consumed by the evaluator:
//!
//! - [`TokenID`]: the classification of a lexeme,
//! - [`TokenValue`]: the decoded payload (name, function, number, comment),
//! - [`CalcToken`]: a kind, payload, literal lexeme and source span.
use crate::Span;
use crate::func::Func;
use crate::value::Number;
use smartstring::alias::String;

/// Token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenID {
    /// Variable name (free-form identifier or memory slot).
    Ident,
    /// One of the function keywords `sin`, `cos`, `exp`, `log`.
    Func,
    /// `0x…` / `0o…` integer literal.
    Nondecimal,
    /// Literal with an exponent, e.g. `1.5e2`.
    Scientific,
    /// Decimal literal with a fractional part, e.g. `3.25`.
    Float,
    /// Plain decimal integer literal.
    Number,
    /// `%%` through end of line.
    Comment,
    /// A line break; ends a statement.
    NewLine,
    Equals,
    Plus,
    Minus,
    Asterisk,
    Slash,
    LeftParen,
    RightParen,
    /// End of input.
    End,
}

impl TokenID {
    /// Is this one of the four numeric literal kinds?
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenID::Nondecimal | TokenID::Scientific | TokenID::Float | TokenID::Number
        )
    }
}

/// The payload carried by a lexical token.
///
/// # Example
/// ```rust
/// # use climb_calc::{Number, TokenValue};
/// let token = TokenValue::Number(Number::Int(42));
///
/// let TokenValue::Number(n) = token else {
///     panic!("Expected a numeric token");
/// };
/// assert_eq!(n, Number::Int(42));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    /// No associated data (operators, line breaks, end of input).
    None,

    /// Variable name.
    Ident(String),

    /// Function keyword.
    Func(Func),

    /// Decoded numeric literal.
    Number(Number),

    /// Comment text following the `%%` marker.
    Comment(String),
}

/// A concrete lexical token for the calculator frontend.
///
/// # Example
/// ```rust
/// # use climb_calc::{CalcToken, Number, TokenID, TokenValue, span};
/// let tok = CalcToken {
///     token_id: TokenID::Number,
///     value: TokenValue::Number(Number::Int(99)),
///     lexeme: "99".into(),
///     span: span!(1, 1, 1, 3).unwrap(),
/// };
///
/// assert_eq!(tok.token_id, TokenID::Number);
/// assert!(tok.token_id.is_literal());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CalcToken {
    /// The token's kind.
    pub token_id: TokenID,
    /// The decoded value for the token, if applicable.
    pub value: TokenValue,
    /// The literal source text.
    pub lexeme: String,
    /// Where the lexeme sits in the source.
    pub span: Span,
}

impl CalcToken {
    pub fn merge_span(&mut self, other_span: &Span) {
        self.span = self.span.merge(other_span);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Position, span};

    fn sp(sl: usize, sc: usize, el: usize, ec: usize) -> Span {
        Span::new(Position::new(sl, sc), Position::new(el, ec))
    }

    fn tok(token_id: TokenID, value: TokenValue, lexeme: &str, span: Span) -> CalcToken {
        CalcToken {
            token_id,
            value,
            lexeme: lexeme.into(),
            span,
        }
    }

    #[test]
    fn token_values_keep_int_and_float_apart() {
        assert_ne!(
            TokenValue::Number(Number::Int(1)),
            TokenValue::Number(Number::Float(1.0))
        );
        assert_ne!(
            TokenValue::Ident("log".into()),
            TokenValue::Func(crate::func::Func::Log)
        );
    }

    #[test]
    fn tokens_compare_by_span_as_well_as_value() {
        let a = tok(TokenID::Plus, TokenValue::None, "+", sp(1, 3, 1, 4));
        let b = tok(TokenID::Plus, TokenValue::None, "+", sp(2, 3, 2, 4));
        assert_ne!(a, b);
        assert_eq!(a.clone(), a);
    }

    #[test]
    fn literal_kinds() {
        assert!(TokenID::Nondecimal.is_literal());
        assert!(TokenID::Scientific.is_literal());
        assert!(TokenID::Float.is_literal());
        assert!(TokenID::Number.is_literal());
        assert!(!TokenID::Ident.is_literal());
        assert!(!TokenID::Func.is_literal());
    }

    #[test]
    fn merge_span_expands_existing_span_to_cover_both() {
        let mut t = tok(
            TokenID::Number,
            TokenValue::Number(Number::Int(1)),
            "1",
            sp(1, 5, 1, 10),
        );
        t.merge_span(&sp(1, 2, 1, 12));
        assert_eq!(Some(t.span), span!(1, 2, 1, 12));
    }

    #[test]
    fn merge_span_other_within_self_no_change() {
        let mut t = tok(
            TokenID::Ident,
            TokenValue::Ident("abc".into()),
            "abc",
            sp(5, 2, 5, 10),
        );
        t.merge_span(&sp(5, 4, 5, 7));
        assert_eq!(t.span, sp(5, 2, 5, 10));
    }

    #[test]
    fn merge_span_cross_line_expands() {
        let mut t = tok(
            TokenID::Ident,
            TokenValue::Ident("y".into()),
            "y",
            sp(2, 5, 3, 3),
        );
        t.merge_span(&sp(1, 9, 4, 1));
        assert_eq!(t.span.start, Position::new(1, 9));
        assert_eq!(t.span.end, Position::new(4, 1));
    }
}
