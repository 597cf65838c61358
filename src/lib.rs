//! # climb-calc
//!
//! A small calculator language front-end: a regex-driven lexer, a
//! precedence-climbing evaluator and a session-scoped symbol table.
//!
//! A script is a sequence of line-oriented statements. Expression statements
//! print their value, assignments store into the [`SymTab`], and `%%` starts
//! a comment running to the end of the line:
//!
//! ```text
//! r = 0x0A            %% hexadecimal literal
//! 3.5 * r * r         %% prints 350.0
//! exp(0) - -1         %% prints 2.0
//! 7 / 2               %% true division, prints 3.5
//! ```
//!
//! ## Overview
//!
//! - [`lexer`]: turns source text into a lazy stream of [`CalcToken`]s, each
//!   annotated with a [`Span`]. Illegal characters are reported and skipped.
//! - [`parser`]: consumes tokens and evaluates each statement as soon as it
//!   is recognised. No syntax tree is built.
//! - [`symtab`]: variable bindings that live for one session.
//! - [`session`]: runs a whole script and collects results and diagnostics.
//!
//! Supporting modules: [`cursor`] (positions and spans), [`value`]
//! (the [`Number`] type and its arithmetic), [`func`] and [`oper`]
//! (functions and operators), [`token`] and [`error`].
//!
//! ## Example
//!
//! ```rust
//! use climb_calc::{CalcParser, NameGrammar, Number, Output, SymTab};
//!
//! let mut symtab = SymTab::new();
//! let mut parser = CalcParser::new("a = 1 + 2 * 3\n-a / 2", NameGrammar::Free);
//!
//! let Ok(Some(out)) = parser.try_next_with_context(&mut symtab) else {
//!     panic!("expected a result")
//! };
//! assert_eq!(out, Output::Value(Number::Float(-3.5)));
//! assert_eq!(symtab.get("a"), Some(Number::Int(7)));
//! ```
pub mod cursor;
pub mod error;
pub mod func;
pub mod lexer;
pub mod oper;
pub mod parser;
pub mod session;
pub mod symtab;
pub mod token;
pub mod value;

pub use cursor::{LexerCursor, Position, Span};
pub use error::{CalcError, Found};
pub use func::{Func, ParseFuncError};
pub use lexer::{CalcLexer, LexerStats, NameGrammar};
pub use oper::{Assoc, BinOp, UnOp};
pub use parser::{CalcParser, MAX_NESTING, Output, ParserStats};
pub use session::{Config, Session, Transcript};
pub use symtab::{SymTab, SymTabError};
pub use token::{CalcToken, TokenID, TokenValue};
pub use value::{ArithError, Number};
