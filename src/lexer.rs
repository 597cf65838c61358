//! # Calculator Lexer
//!
//! [`CalcLexer`] turns source text into a lazy, finite stream of
//! [`CalcToken`]s. Lexing is driven by an ordered rule table: at every
//! position the rules are tried top to bottom and the first one that
//! matches wins. The numeric literal rules are ordered most-specific-first,
//! because each later form matches a prefix of the earlier ones:
//!
//! 1. `Nondecimal`: `0x1A`, `0o17` (case-insensitive prefix)
//! 2. `Scientific`: `1.5e2`, `3E-4`
//! 3. `Float`: `3.25`, `.5`, `2.`
//! 4. `Number`: `42`
//!
//! Function keywords come before identifiers, so `sin` is a keyword while
//! `sine` is still a name.
//!
//! A character that starts no rule is reported as
//! [`CalcError::IllegalChar`]; that single character is skipped and lexing
//! resumes right after it.

use crate::cursor::LexerCursor;
use crate::error::CalcError;
use crate::func::Func;
use crate::token::{CalcToken, TokenID, TokenValue};
use crate::value::Number;
use once_cell::sync::Lazy;
use regex::Regex;
use smartstring::alias::String;

/// Lexer rules, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    WhiteSpace,
    NewLine,
    Comment,
    Nondecimal,
    Scientific,
    Float,
    Number,
    Func,
    Ident,
    Equals,
    Plus,
    Minus,
    Asterisk,
    Slash,
    LeftParen,
    RightParen,
}

/// Which spellings count as variable names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NameGrammar {
    /// Free-form identifiers: `[A-Za-z_][A-Za-z0-9_]*`.
    #[default]
    Free,
    /// The closed set of memory slots `MEM_1` … `MEM_10`.
    MemorySlots,
}

const FREE_IDENT: &str = r"[A-Za-z_][A-Za-z0-9_]*";
const SLOT_IDENT: &str = r"MEM_(?:10|[1-9])\b";

fn rule_table(ident: &str) -> Vec<(Rule, Regex)> {
    [
        (Rule::WhiteSpace, r"[ \t]+"),
        (Rule::NewLine, r"\r\n|\n|\r"),
        (Rule::Comment, r"%%[^\r\n]*"),
        (Rule::Nondecimal, r"0[xX][0-9A-Fa-f]+|0[oO][0-7]+"),
        (
            Rule::Scientific,
            r"(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)[eE][+-]?[0-9]+",
        ),
        (Rule::Float, r"[0-9]+\.[0-9]*|\.[0-9]+"),
        (Rule::Number, r"[0-9]+"),
        (Rule::Func, r"(?:sin|cos|exp|log)\b"),
        (Rule::Ident, ident),
        (Rule::Equals, r"="),
        (Rule::Plus, r"\+"),
        (Rule::Minus, r"-"),
        (Rule::Asterisk, r"\*"),
        (Rule::Slash, r"/"),
        (Rule::LeftParen, r"\("),
        (Rule::RightParen, r"\)"),
    ]
    .into_iter()
    .map(|(rule, re)| (rule, Regex::new(&format!("^(?:{re})")).unwrap()))
    .collect()
}

static FREE_RULES: Lazy<Vec<(Rule, Regex)>> = Lazy::new(|| rule_table(FREE_IDENT));

static SLOT_RULES: Lazy<Vec<(Rule, Regex)>> = Lazy::new(|| rule_table(SLOT_IDENT));

impl NameGrammar {
    fn rules(self) -> &'static [(Rule, Regex)] {
        match self {
            NameGrammar::Free => &FREE_RULES,
            NameGrammar::MemorySlots => &SLOT_RULES,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LexerStats {
    pub chars: usize,
    pub matches: usize,
    pub lines: usize,
    pub errors: usize,
}

/// The calculator lexer.
///
/// `CalcLexer` is an [`Iterator`] over `Result<CalcToken, CalcError>`. An
/// `Err` item is a non-fatal lexical diagnostic; the stream continues after
/// it. The last item is always a [`TokenID::End`] token, after which the
/// lexer is exhausted. A lexer cannot be restarted.
///
/// # Example
///
/// ```rust
/// # use climb_calc::{CalcLexer, NameGrammar, TokenID};
/// let lexer = CalcLexer::new("x = 0x1A\n%% note", NameGrammar::Free);
/// let ids: Vec<TokenID> = lexer.map(|t| t.unwrap().token_id).collect();
/// assert_eq!(
///     ids,
///     [
///         TokenID::Ident,
///         TokenID::Equals,
///         TokenID::Nondecimal,
///         TokenID::NewLine,
///         TokenID::Comment,
///         TokenID::End,
///     ]
/// );
/// ```
pub struct CalcLexer<'a> {
    source: &'a str,
    rules: &'static [(Rule, Regex)],
    cursor: LexerCursor,
    end_flag: bool,
    stats: LexerStats,
}

impl<'a> CalcLexer<'a> {
    pub fn new(source: &'a str, names: NameGrammar) -> Self {
        Self {
            source,
            rules: names.rules(),
            cursor: LexerCursor::new(),
            end_flag: false,
            stats: LexerStats::default(),
        }
    }

    /// Current 1-based line number.
    pub fn line_no(&self) -> usize {
        self.cursor.span.end.line
    }

    pub fn stats(&self) -> LexerStats {
        self.stats.clone()
    }

    /// Returns the first rule matching at the start of `rest` and the byte
    /// length of its match.
    fn try_match(&self, rest: &str) -> Option<(Rule, usize)> {
        self.rules
            .iter()
            .find_map(|(rule, re)| re.find(rest).map(|m| (*rule, m.end())))
    }

    fn token(&self, token_id: TokenID, value: TokenValue, lexeme: &str) -> CalcToken {
        CalcToken {
            token_id,
            value,
            lexeme: String::from(lexeme),
            span: self.cursor.span,
        }
    }

    fn literal_range(&self, lexeme: &str) -> CalcError {
        CalcError::LiteralRange {
            lexeme: String::from(lexeme),
            span: self.cursor.span,
        }
    }

    /// Handles a single rule match. Returns `None` for skipped input.
    fn action(&mut self, rule: Rule, lexeme: &str) -> Option<Result<CalcToken, CalcError>> {
        let tok = match rule {
            Rule::WhiteSpace => return None,
            Rule::NewLine => {
                self.stats.lines += 1;
                self.token(TokenID::NewLine, TokenValue::None, lexeme)
            }
            Rule::Comment => {
                let text = String::from(&lexeme[2..]);
                self.token(TokenID::Comment, TokenValue::Comment(text), lexeme)
            }
            Rule::Nondecimal => {
                let radix = match lexeme.as_bytes()[1] {
                    b'o' | b'O' => 8,
                    _ => 16,
                };
                match i64::from_str_radix(&lexeme[2..], radix) {
                    Ok(n) => {
                        self.token(TokenID::Nondecimal, TokenValue::Number(n.into()), lexeme)
                    }
                    Err(_) => return Some(Err(self.literal_range(lexeme))),
                }
            }
            Rule::Scientific | Rule::Float => {
                let token_id = if rule == Rule::Scientific {
                    TokenID::Scientific
                } else {
                    TokenID::Float
                };
                match lexeme.parse::<f64>() {
                    Ok(x) => self.token(token_id, TokenValue::Number(Number::Float(x)), lexeme),
                    Err(_) => return Some(Err(self.literal_range(lexeme))),
                }
            }
            Rule::Number => match lexeme.parse::<i64>() {
                Ok(n) => self.token(TokenID::Number, TokenValue::Number(n.into()), lexeme),
                Err(_) => return Some(Err(self.literal_range(lexeme))),
            },
            Rule::Func => {
                let Ok(func) = lexeme.parse::<Func>() else {
                    unreachable!()
                };
                self.token(TokenID::Func, TokenValue::Func(func), lexeme)
            }
            Rule::Ident => {
                self.token(TokenID::Ident, TokenValue::Ident(String::from(lexeme)), lexeme)
            }
            Rule::Equals => self.token(TokenID::Equals, TokenValue::None, lexeme),
            Rule::Plus => self.token(TokenID::Plus, TokenValue::None, lexeme),
            Rule::Minus => self.token(TokenID::Minus, TokenValue::None, lexeme),
            Rule::Asterisk => self.token(TokenID::Asterisk, TokenValue::None, lexeme),
            Rule::Slash => self.token(TokenID::Slash, TokenValue::None, lexeme),
            Rule::LeftParen => self.token(TokenID::LeftParen, TokenValue::None, lexeme),
            Rule::RightParen => self.token(TokenID::RightParen, TokenValue::None, lexeme),
        };
        Some(Ok(tok))
    }
}

impl Iterator for CalcLexer<'_> {
    type Item = Result<CalcToken, CalcError>;

    /// Advances the lexer and returns the next token or lexical diagnostic.
    ///
    /// When the input is consumed the lexer emits a single
    /// [`TokenID::End`] token and then returns `None` forever.
    fn next(&mut self) -> Option<Self::Item> {
        let source = self.source;
        while !self.end_flag {
            self.cursor.span.collapse();
            let rest = &source[self.cursor.pos..];

            let Some(ch) = rest.chars().next() else {
                self.end_flag = true;
                return Some(Ok(self.token(TokenID::End, TokenValue::None, "")));
            };

            let Some((rule, len)) = self.try_match(rest) else {
                self.cursor.advance(ch, rest[ch.len_utf8()..].chars().next());
                self.stats.chars += 1;
                self.stats.errors += 1;
                log::trace!("ILLEGAL: {:?} at {}", ch, self.cursor.span);
                return Some(Err(CalcError::IllegalChar {
                    ch,
                    span: self.cursor.span,
                }));
            };

            let lexeme = &rest[..len];
            self.cursor.advance_str(lexeme);
            self.stats.chars += lexeme.chars().count();
            self.stats.matches += 1;
            log::trace!(
                "MATCHED: rule {:?}, lexeme {:?}, {}",
                rule,
                lexeme,
                self.cursor.span
            );

            if let Some(item) = self.action(rule, lexeme) {
                if item.is_err() {
                    self.stats.errors += 1;
                }
                return Some(item);
            }
        }
        None
    }
}

impl std::iter::FusedIterator for CalcLexer<'_> {}
