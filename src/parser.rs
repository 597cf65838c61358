//! # Calculator Parser
//!
//! [`CalcParser`] is a syntax-directed evaluator: it pulls tokens from a
//! [`CalcLexer`] and computes each statement's value while recognising it.
//! No syntax tree is built.
//!
//! ```text
//! script     := { statement }
//! statement  := [ NAME '=' expression | expression ] [ COMMENT ] ( NEWLINE | END )
//! expression := unary { BINOP expression }        (precedence climbing)
//! unary      := ('+' | '-') unary | primary
//! primary    := LITERAL | NAME | FUNC '(' expression ')' | '(' expression ')'
//! ```
//!
//! Operator precedence and associativity come from [`crate::oper`].
//!
//! ## Behavior highlights
//! - **Expression statements** yield [`Output::Value`].
//! - **Assignments** store the value in the [`SymTab`] and yield nothing.
//! - **Comments** yield nothing; a trailing comment ends its statement.
//! - **Undefined names** yield a diagnostic and evaluate to `0`.
//! - **Arithmetic errors** yield a diagnostic at the end of the statement,
//!   which then produces no value and stores nothing.
//! - **Syntax errors** end the parse; see
//!   [`CalcParser::try_next_with_context`] and [`CalcParser::recover`].
//!   Operands nested deeper than [`MAX_NESTING`] levels of parentheses,
//!   function calls or prefix operators end the parse the same way.
//!
//! A trailing comment after an assignment does not print the assigned value;
//! only expression statements print.

use crate::error::{CalcError, Found};
use crate::lexer::{CalcLexer, LexerStats, NameGrammar};
use crate::oper::{BinOp, MIN_PRECEDENCE, UnOp};
use crate::symtab::SymTab;
use crate::token::{CalcToken, TokenID, TokenValue};
use crate::value::{ArithError, Number};
use crate::Span;
use smartstring::alias::String;
use std::collections::VecDeque;

/// One item of the evaluator's output stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// The value of an expression statement, to be printed.
    Value(Number),
    /// A non-fatal diagnostic.
    Diagnostic(CalcError),
}

/// Deepest nesting of parentheses, function calls and prefix operators
/// accepted within one statement.
pub const MAX_NESTING: usize = 256;

#[derive(Debug, Clone, Default)]
pub struct ParserStats {
    pub tokens: usize,
    pub statements: usize,
    pub diagnostics: usize,
}

enum Step {
    Continue,
    Finished,
}

/// What a statement asks for once it has been fully recognised.
enum Stat {
    Empty,
    Print(Number),
    Assign(String, Number),
}

/// The calculator parser/evaluator.
///
/// The symbol table is not owned by the parser: the caller passes it to
/// every [`try_next_with_context`](Self::try_next_with_context) call.
///
/// # Example
///
/// ```rust
/// # use climb_calc::{CalcParser, NameGrammar, Number, Output, SymTab};
/// let mut symtab = SymTab::new();
/// let mut parser = CalcParser::new("x = 5\nx * 2 %% double", NameGrammar::Free);
/// assert_eq!(
///     parser.try_next_with_context(&mut symtab).unwrap(),
///     Some(Output::Value(Number::Int(10)))
/// );
/// assert_eq!(parser.try_next_with_context(&mut symtab).unwrap(), None);
/// assert_eq!(symtab.get("x"), Some(Number::Int(5)));
/// ```
pub struct CalcParser<'a> {
    lexer: CalcLexer<'a>,
    lookahead: VecDeque<CalcToken>,
    pending: VecDeque<Output>,
    /// First arithmetic error of the statement being evaluated.
    fault: Option<CalcError>,
    /// Syntax error waiting to be returned once `pending` is drained.
    failure: Option<CalcError>,
    /// Current operand nesting depth.
    depth: usize,
    halted: bool,
    finished: bool,
    stats: ParserStats,
}

impl<'a> CalcParser<'a> {
    pub fn new(source: &'a str, names: NameGrammar) -> Self {
        Self {
            lexer: CalcLexer::new(source, names),
            lookahead: VecDeque::new(),
            pending: VecDeque::new(),
            fault: None,
            failure: None,
            depth: 0,
            halted: false,
            finished: false,
            stats: ParserStats::default(),
        }
    }

    pub fn stats(&self) -> (LexerStats, ParserStats) {
        (self.lexer.stats(), self.stats.clone())
    }

    /// Returns the next output of the script, or `None` once the script is
    /// fully evaluated.
    ///
    /// Diagnostics raised before a syntax error are returned first; the
    /// syntax error itself is returned as `Err`, after which the parser
    /// yields `Ok(None)` until [`recover`](Self::recover) is called.
    pub fn try_next_with_context(
        &mut self,
        symtab: &mut SymTab,
    ) -> Result<Option<Output>, CalcError> {
        loop {
            if let Some(out) = self.pending.pop_front() {
                return Ok(Some(out));
            }
            if let Some(err) = self.failure.take() {
                return Err(err);
            }
            if self.halted {
                return Ok(None);
            }
            match self.statement(symtab) {
                Ok(Step::Continue) => {}
                Ok(Step::Finished) => {
                    self.halted = true;
                    self.finished = true;
                }
                Err(err) => {
                    log::debug!("parse halted: {err}");
                    self.halted = true;
                    self.failure = Some(err);
                }
            }
        }
    }

    /// Restarts parsing after a syntax error.
    ///
    /// Everything up to and including the next line break is discarded.
    /// Returns `false` when there is nothing left to parse.
    pub fn recover(&mut self) -> bool {
        if !self.halted || self.finished {
            return false;
        }
        self.failure = None;
        loop {
            match self.peek_id(0) {
                TokenID::End => break,
                TokenID::NewLine => {
                    self.advance();
                    break;
                }
                _ => {
                    self.advance();
                }
            }
        }
        self.halted = false;
        true
    }

    fn fill(&mut self, n: usize) {
        while self.lookahead.len() <= n {
            match self.lexer.next() {
                Some(Ok(tok)) => self.lookahead.push_back(tok),
                Some(Err(err)) => self.report(err),
                None => match self.lookahead.back() {
                    Some(end) => {
                        let end = end.clone();
                        self.lookahead.push_back(end);
                    }
                    None => unreachable!("the End token is never consumed"),
                },
            }
        }
    }

    fn peek(&mut self, n: usize) -> &CalcToken {
        self.fill(n);
        &self.lookahead[n]
    }

    fn peek_id(&mut self, n: usize) -> TokenID {
        self.peek(n).token_id
    }

    /// Consumes the next token. The End token is returned but never
    /// consumed.
    fn advance(&mut self) -> CalcToken {
        self.fill(0);
        let tok = match self.lookahead.pop_front() {
            Some(tok) if tok.token_id == TokenID::End => {
                self.lookahead.push_front(tok.clone());
                tok
            }
            Some(tok) => tok,
            None => unreachable!("lookahead filled above"),
        };
        self.stats.tokens += 1;
        log::trace!("SHIFT: {:?} {:?}", tok.token_id, tok.lexeme);
        tok
    }

    fn expect(&mut self, token_id: TokenID) -> Result<CalcToken, CalcError> {
        if self.peek_id(0) == token_id {
            Ok(self.advance())
        } else {
            Err(CalcError::syntax(self.peek(0)))
        }
    }

    fn report(&mut self, err: CalcError) {
        log::debug!("diagnostic: {err}");
        self.stats.diagnostics += 1;
        self.pending.push_back(Output::Diagnostic(err));
    }

    /// Enters one more nesting level at the next token, failing once
    /// [`MAX_NESTING`] is reached.
    fn descend(&mut self) -> Result<(), CalcError> {
        if self.depth >= MAX_NESTING {
            let tok = self.peek(0);
            return Err(CalcError::Nesting {
                found: Found::from(tok),
                span: tok.span,
            });
        }
        self.depth += 1;
        Ok(())
    }

    /// Unwraps an arithmetic result, recording the first failure of the
    /// statement and substituting `0` so evaluation can go on.
    fn settle(&mut self, result: Result<Number, ArithError>, span: Span) -> Number {
        match result {
            Ok(n) => n,
            Err(source) => {
                if self.fault.is_none() {
                    self.fault = Some(CalcError::Arithmetic { source, span });
                }
                Number::Int(0)
            }
        }
    }

    fn statement(&mut self, symtab: &mut SymTab) -> Result<Step, CalcError> {
        self.fault = None;
        self.depth = 0;
        match self.peek_id(0) {
            TokenID::End => return Ok(Step::Finished),
            TokenID::NewLine => {
                self.advance();
                return Ok(Step::Continue);
            }
            _ => {}
        }
        self.stats.statements += 1;

        let stat = match (self.peek_id(0), self.peek_id(1)) {
            (TokenID::Ident, TokenID::Equals) => {
                let ident = self.advance();
                self.advance();
                let TokenValue::Ident(name) = ident.value else {
                    unreachable!()
                };
                let value = self.expression(symtab, MIN_PRECEDENCE)?;
                Stat::Assign(name, value)
            }
            (TokenID::Comment, _) => Stat::Empty,
            _ => Stat::Print(self.expression(symtab, MIN_PRECEDENCE)?),
        };

        if self.peek_id(0) == TokenID::Comment {
            let comment = self.advance();
            log::trace!("COMMENT: {:?}", comment.value);
        }
        match self.peek_id(0) {
            TokenID::NewLine => {
                self.advance();
            }
            TokenID::End => {}
            _ => return Err(CalcError::syntax(self.peek(0))),
        }

        if let Some(err) = self.fault.take() {
            self.report(err);
            return Ok(Step::Continue);
        }
        match stat {
            Stat::Empty => {}
            Stat::Print(value) => {
                log::debug!("result: {value}");
                self.pending.push_back(Output::Value(value));
            }
            Stat::Assign(name, value) => symtab.set(name, value),
        }
        Ok(Step::Continue)
    }

    /// Precedence climbing: parses a unary operand, then folds in every
    /// binary operator whose precedence is at least `min_prec`.
    fn expression(&mut self, symtab: &mut SymTab, min_prec: u8) -> Result<Number, CalcError> {
        let mut lhs = self.unary(symtab)?;
        while let Some(op) = BinOp::from_token(self.peek_id(0)) {
            let (prec, _) = op.binding();
            if prec < min_prec {
                break;
            }
            let op_tok = self.advance();
            let rhs = self.expression(symtab, op.rhs_precedence())?;
            log::trace!("REDUCE: {lhs} {op} {rhs}");
            lhs = self.settle(op.apply(lhs, rhs), op_tok.span);
        }
        Ok(lhs)
    }

    fn unary(&mut self, symtab: &mut SymTab) -> Result<Number, CalcError> {
        let Some(op) = UnOp::from_token(self.peek_id(0)) else {
            return self.primary(symtab);
        };
        self.descend()?;
        let op_tok = self.advance();
        let (prec, _) = op.binding();
        let operand = self.expression(symtab, prec)?;
        self.depth -= 1;
        log::trace!("REDUCE: {op}{operand}");
        Ok(self.settle(op.apply(operand), op_tok.span))
    }

    fn primary(&mut self, symtab: &mut SymTab) -> Result<Number, CalcError> {
        match self.peek_id(0) {
            id if id.is_literal() => {
                let TokenValue::Number(n) = self.advance().value else {
                    unreachable!()
                };
                Ok(n)
            }
            TokenID::Ident => {
                let tok = self.advance();
                let TokenValue::Ident(name) = &tok.value else {
                    unreachable!()
                };
                match symtab.lookup(name) {
                    Ok(value) => Ok(value),
                    Err(source) => {
                        self.report(CalcError::Undefined {
                            source,
                            span: tok.span,
                        });
                        Ok(Number::Int(0))
                    }
                }
            }
            TokenID::Func => {
                self.descend()?;
                let mut tok = self.advance();
                let TokenValue::Func(func) = tok.value.clone() else {
                    unreachable!()
                };
                self.expect(TokenID::LeftParen)?;
                let arg = self.expression(symtab, MIN_PRECEDENCE)?;
                let right_paren = self.expect(TokenID::RightParen)?;
                self.depth -= 1;
                tok.merge_span(&right_paren.span);
                log::trace!("REDUCE: {func}({arg})");
                Ok(self.settle(func.apply(arg), tok.span))
            }
            TokenID::LeftParen => {
                self.descend()?;
                self.advance();
                let value = self.expression(symtab, MIN_PRECEDENCE)?;
                self.expect(TokenID::RightParen)?;
                self.depth -= 1;
                Ok(value)
            }
            _ => Err(CalcError::syntax(self.peek(0))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Found;
    use crate::symtab::SymTabError;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn values(src: &str) -> Vec<Number> {
        init_logger();
        let mut symtab = SymTab::new();
        let mut parser = CalcParser::new(src, NameGrammar::Free);
        let mut out = Vec::new();
        while let Some(item) = parser.try_next_with_context(&mut symtab).unwrap() {
            if let Output::Value(n) = item {
                out.push(n);
            }
        }
        out
    }

    #[test]
    fn respects_operator_precedence_and_unary_minus() {
        assert_eq!(values("2 + 3 * 4"), [Number::Int(14)]);
        assert_eq!(values("(2 + 3) * 4"), [Number::Int(20)]);
        assert_eq!(values("-2 + 3"), [Number::Int(1)]);
        assert_eq!(values("-(2+3)"), [Number::Int(-5)]);
        assert_eq!(values("1000 - - -123"), [Number::Int(877)]);
        assert_eq!(values("2 * -3"), [Number::Int(-6)]);
        assert_eq!(values("+4 - +1"), [Number::Int(3)]);
    }

    #[test]
    fn binary_operators_are_left_associative() {
        assert_eq!(values("10 - 4 - 3"), [Number::Int(3)]);
        assert_eq!(values("16 / 4 / 2"), [Number::Float(2.0)]);
        assert_eq!(values("2 * 3 / 4"), [Number::Float(1.5)]);
    }

    #[test]
    fn numeric_promotion_and_true_division() {
        assert_eq!(values("7 / 2"), [Number::Float(3.5)]);
        assert_eq!(values("1 + 0.5"), [Number::Float(1.5)]);
        assert_eq!(values("0x1A + 0o17"), [Number::Int(41)]);
        assert_eq!(values("1.5e2"), [Number::Float(150.0)]);
    }

    #[test]
    fn functions() {
        assert_eq!(
            values("log(1)\nexp(0)\nsin(0)\ncos(0)"),
            [
                Number::Float(0.0),
                Number::Float(1.0),
                Number::Float(0.0),
                Number::Float(1.0),
            ]
        );
        assert_eq!(values("2 * exp(0) + 1"), [Number::Float(3.0)]);
    }

    #[test]
    fn parses_assignment_and_reference() {
        init_logger();
        let mut symtab = SymTab::new();
        let mut parser = CalcParser::new("x = 2\nx + 3\n", NameGrammar::Free);

        let out = parser.try_next_with_context(&mut symtab).unwrap();
        assert_eq!(out, Some(Output::Value(Number::Int(5))));
        assert!(parser.try_next_with_context(&mut symtab).unwrap().is_none());
        assert!(parser.try_next_with_context(&mut symtab).unwrap().is_none());
        assert_eq!(symtab.len(), 1);

        let (_, stats) = parser.stats();
        assert_eq!(stats.statements, 2);
    }

    #[test]
    fn symtab_outlives_the_parser() {
        init_logger();
        let mut symtab = SymTab::new();
        let mut first = CalcParser::new("y = 4 * 2", NameGrammar::Free);
        assert!(first.try_next_with_context(&mut symtab).unwrap().is_none());

        let mut second = CalcParser::new("y / 2", NameGrammar::Free);
        assert_eq!(
            second.try_next_with_context(&mut symtab).unwrap(),
            Some(Output::Value(Number::Float(4.0)))
        );
    }

    #[test]
    fn undefined_name_reports_and_yields_zero() {
        init_logger();
        let mut symtab = SymTab::new();
        let mut parser = CalcParser::new("z + 1\n2", NameGrammar::Free);
        assert!(matches!(
            parser.try_next_with_context(&mut symtab).unwrap(),
            Some(Output::Diagnostic(CalcError::Undefined {
                source: SymTabError::Undefined { .. },
                ..
            }))
        ));
        assert_eq!(
            parser.try_next_with_context(&mut symtab).unwrap(),
            Some(Output::Value(Number::Int(1)))
        );
        assert_eq!(
            parser.try_next_with_context(&mut symtab).unwrap(),
            Some(Output::Value(Number::Int(2)))
        );
        assert_eq!(parser.try_next_with_context(&mut symtab).unwrap(), None);
    }

    #[test]
    fn arithmetic_error_suppresses_result_and_store() {
        init_logger();
        let mut symtab = SymTab::new();
        let mut parser = CalcParser::new("a = 1 / 0\nlog(0) + 1\n3", NameGrammar::Free);
        assert!(matches!(
            parser.try_next_with_context(&mut symtab).unwrap(),
            Some(Output::Diagnostic(CalcError::Arithmetic {
                source: ArithError::DivisionByZero,
                ..
            }))
        ));
        assert!(matches!(
            parser.try_next_with_context(&mut symtab).unwrap(),
            Some(Output::Diagnostic(CalcError::Arithmetic {
                source: ArithError::Domain { .. },
                ..
            }))
        ));
        assert_eq!(
            parser.try_next_with_context(&mut symtab).unwrap(),
            Some(Output::Value(Number::Int(3)))
        );
        assert!(symtab.get("a").is_none());
    }

    #[test]
    fn comments_print_nothing() {
        assert!(values("%% just a note\n\n%% another").is_empty());
        assert_eq!(values("4 %% trailing\n5"), [Number::Int(4), Number::Int(5)]);
    }

    #[test]
    fn assignment_with_trailing_comment_stores_silently() {
        init_logger();
        let mut symtab = SymTab::new();
        let mut parser = CalcParser::new("k = 9 %% nine", NameGrammar::Free);
        assert_eq!(parser.try_next_with_context(&mut symtab).unwrap(), None);
        assert_eq!(symtab.get("k"), Some(Number::Int(9)));
    }

    #[test]
    fn syntax_error_ends_the_parse() {
        init_logger();
        let mut symtab = SymTab::new();
        let mut parser = CalcParser::new("1\n2 + )\n3", NameGrammar::Free);
        assert_eq!(
            parser.try_next_with_context(&mut symtab).unwrap(),
            Some(Output::Value(Number::Int(1)))
        );
        let err = parser.try_next_with_context(&mut symtab).unwrap_err();
        assert!(matches!(
            &err,
            CalcError::Syntax {
                found: Found::Token(s),
                ..
            } if s.as_str() == ")"
        ));
        assert_eq!(err.span().start.line, 2);
        assert_eq!(parser.try_next_with_context(&mut symtab).unwrap(), None);
    }

    #[test]
    fn deep_nesting_is_an_error_not_a_crash() {
        init_logger();
        let n = 10_000;
        let src = format!("{}1{}", "(".repeat(n), ")".repeat(n));
        let mut symtab = SymTab::new();
        let mut parser = CalcParser::new(&src, NameGrammar::Free);
        let err = parser.try_next_with_context(&mut symtab).unwrap_err();
        assert!(matches!(
            &err,
            CalcError::Nesting {
                found: Found::Token(s),
                ..
            } if s.as_str() == "("
        ));
        assert!(err.is_fatal());
        assert_eq!(err.span().start.column, MAX_NESTING + 1);
        assert_eq!(parser.try_next_with_context(&mut symtab).unwrap(), None);
    }

    #[test]
    fn nesting_limit_covers_prefix_operators_and_calls() {
        init_logger();
        let mut symtab = SymTab::new();
        let minus = format!("{}1", "-".repeat(MAX_NESTING + 1));
        let mut parser = CalcParser::new(&minus, NameGrammar::Free);
        assert!(matches!(
            parser.try_next_with_context(&mut symtab),
            Err(CalcError::Nesting { .. })
        ));

        let calls = format!(
            "{}0{}",
            "exp(".repeat(MAX_NESTING + 1),
            ")".repeat(MAX_NESTING + 1)
        );
        let mut parser = CalcParser::new(&calls, NameGrammar::Free);
        assert!(matches!(
            parser.try_next_with_context(&mut symtab),
            Err(CalcError::Nesting { .. })
        ));
    }

    #[test]
    fn nesting_depth_is_per_operand_not_per_statement() {
        let src = format!("{}1{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        let line = format!("{src} + {src} + -{}", "(2)");
        assert_eq!(values(&format!("{line}\n{src}")), [Number::Int(0), Number::Int(1)]);
    }

    #[test]
    fn syntax_error_at_eof() {
        init_logger();
        let mut symtab = SymTab::new();
        let mut parser = CalcParser::new("(1 + 2", NameGrammar::Free);
        assert!(matches!(
            parser.try_next_with_context(&mut symtab),
            Err(CalcError::Syntax {
                found: Found::Eof,
                ..
            })
        ));
    }

    #[test]
    fn recover_resumes_at_next_line() {
        init_logger();
        let mut symtab = SymTab::new();
        let mut parser = CalcParser::new("1 2 3\n4 * 2", NameGrammar::Free);
        assert!(parser.try_next_with_context(&mut symtab).is_err());
        assert!(parser.recover());
        assert_eq!(
            parser.try_next_with_context(&mut symtab).unwrap(),
            Some(Output::Value(Number::Int(8)))
        );
        assert_eq!(parser.try_next_with_context(&mut symtab).unwrap(), None);
        assert!(!parser.recover());
    }

    #[test]
    fn diagnostics_before_syntax_error_come_first() {
        init_logger();
        let mut symtab = SymTab::new();
        let mut parser = CalcParser::new("q * (", NameGrammar::Free);
        assert!(matches!(
            parser.try_next_with_context(&mut symtab),
            Ok(Some(Output::Diagnostic(CalcError::Undefined { .. })))
        ));
        assert!(matches!(
            parser.try_next_with_context(&mut symtab),
            Err(CalcError::Syntax { .. })
        ));
    }

    #[test]
    fn illegal_character_does_not_stop_evaluation() {
        init_logger();
        let mut symtab = SymTab::new();
        let mut parser = CalcParser::new("1 + 2 #\n3", NameGrammar::Free);
        assert!(matches!(
            parser.try_next_with_context(&mut symtab).unwrap(),
            Some(Output::Diagnostic(CalcError::IllegalChar { ch: '#', .. }))
        ));
        assert_eq!(
            parser.try_next_with_context(&mut symtab).unwrap(),
            Some(Output::Value(Number::Int(3)))
        );
        assert_eq!(
            parser.try_next_with_context(&mut symtab).unwrap(),
            Some(Output::Value(Number::Int(3)))
        );
    }
}
