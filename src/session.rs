//! # Evaluation Session
//!
//! A [`Session`] owns the [`SymTab`] and the [`Config`] for one run of the
//! calculator. [`Session::run`] evaluates a whole script and collects what it
//! produced into a [`Transcript`], which the driver renders.
//!
//! ```rust
//! # use climb_calc::{Config, Number, Session};
//! let mut session = Session::new(Config::default());
//! let transcript = session.run("x = 7\nx / 2\ny");
//!
//! assert_eq!(
//!     transcript.values().collect::<Vec<_>>(),
//!     [Number::Float(3.5), Number::Int(0)]
//! );
//! assert_eq!(transcript.diagnostics().count(), 1);
//! assert!(transcript.completed);
//!
//! let mut out = Vec::new();
//! let mut err = Vec::new();
//! transcript.render(&mut out, &mut err).unwrap();
//! assert_eq!(out, b"3.5\n0\n");
//! ```

use crate::error::CalcError;
use crate::lexer::NameGrammar;
use crate::parser::{CalcParser, Output, ParserStats};
use crate::symtab::SymTab;
use crate::value::Number;
use crate::LexerStats;
use std::io::{self, Write};

/// Session knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Config {
    /// Which identifiers name variables.
    pub names: NameGrammar,
    /// Resume at the next line break after a syntax error instead of
    /// ending the run.
    pub keep_going: bool,
}

/// Everything a script produced, in source order.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    pub outputs: Vec<Output>,
    /// `false` when a syntax error ended the run early.
    pub completed: bool,
    pub lexer_stats: LexerStats,
    pub parser_stats: ParserStats,
}

impl Transcript {
    /// The printed results.
    pub fn values(&self) -> impl Iterator<Item = Number> + '_ {
        self.outputs.iter().filter_map(|out| match out {
            Output::Value(n) => Some(*n),
            Output::Diagnostic(_) => None,
        })
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &CalcError> {
        self.outputs.iter().filter_map(|out| match out {
            Output::Diagnostic(err) => Some(err),
            Output::Value(_) => None,
        })
    }

    /// Writes one line per result to `out` and one `error: ...` line per
    /// diagnostic to `err`.
    pub fn render<W: Write, E: Write>(&self, out: &mut W, err: &mut E) -> io::Result<()> {
        for item in &self.outputs {
            match item {
                Output::Value(n) => writeln!(out, "{n}")?,
                Output::Diagnostic(e) => writeln!(err, "error: {e}")?,
            }
        }
        out.flush()?;
        err.flush()
    }
}

#[derive(Debug, Default)]
pub struct Session {
    symtab: SymTab,
    config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            symtab: SymTab::new(),
            config,
        }
    }

    /// The variables assigned so far.
    pub fn symtab(&self) -> &SymTab {
        &self.symtab
    }

    /// Evaluates `source` against this session's symbol table.
    ///
    /// Variables persist across calls.
    pub fn run(&mut self, source: &str) -> Transcript {
        let mut parser = CalcParser::new(source, self.config.names);
        let mut transcript = Transcript {
            completed: true,
            ..Transcript::default()
        };
        loop {
            match parser.try_next_with_context(&mut self.symtab) {
                Ok(Some(out)) => transcript.outputs.push(out),
                Ok(None) => break,
                Err(err) => {
                    transcript.outputs.push(Output::Diagnostic(err));
                    if !(self.config.keep_going && parser.recover()) {
                        transcript.completed = self.config.keep_going;
                        break;
                    }
                }
            }
        }
        let (lexer_stats, parser_stats) = parser.stats();
        log::debug!("lexer: {lexer_stats:?}, parser: {parser_stats:?}");
        transcript.lexer_stats = lexer_stats;
        transcript.parser_stats = parser_stats;
        transcript
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn render(transcript: &Transcript) -> (std::string::String, std::string::String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        transcript.render(&mut out, &mut err).unwrap();
        (
            std::string::String::from_utf8(out).unwrap(),
            std::string::String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn symtab_persists_across_runs() {
        init_logger();
        let mut session = Session::new(Config::default());
        let first = session.run("a = 3");
        assert!(first.outputs.is_empty());
        let second = session.run("a * a");
        assert_eq!(second.values().collect::<Vec<_>>(), [Number::Int(9)]);
        assert_eq!(session.symtab().get("a"), Some(Number::Int(3)));
    }

    #[test]
    fn syntax_error_stops_the_run_by_default() {
        init_logger();
        let mut session = Session::new(Config::default());
        let transcript = session.run("1\n2 +\n3");
        assert!(!transcript.completed);
        assert_eq!(transcript.values().collect::<Vec<_>>(), [Number::Int(1)]);
        let (out, err) = render(&transcript);
        assert_eq!(out, "1\n");
        assert_eq!(err, "error: Syntax error at end of line (line 2, column 4)\n");
    }

    #[test]
    fn keep_going_skips_the_bad_line() {
        init_logger();
        let mut session = Session::new(Config {
            keep_going: true,
            ..Config::default()
        });
        let transcript = session.run("1\n2 +\n3\n) (\n4");
        assert!(transcript.completed);
        assert_eq!(
            transcript.values().collect::<Vec<_>>(),
            [Number::Int(1), Number::Int(3), Number::Int(4)]
        );
        assert_eq!(transcript.diagnostics().count(), 2);
        assert!(transcript.diagnostics().all(CalcError::is_fatal));
    }

    #[test]
    fn stats_are_collected() {
        init_logger();
        let mut session = Session::new(Config::default());
        let transcript = session.run("x = 1\n\nx + 1 @\n");
        assert_eq!(transcript.parser_stats.statements, 2);
        assert_eq!(transcript.parser_stats.diagnostics, 1);
        assert_eq!(transcript.lexer_stats.errors, 1);
    }
}
