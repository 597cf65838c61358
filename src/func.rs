//! Built-in functions.
//!
//! The calculator knows four single-argument functions, each spelled as a
//! reserved keyword: `sin`, `cos`, `exp` and `log`. Trigonometric functions
//! work in radians and `log` is the natural logarithm. All of them return a
//! `Float`, whatever the type of their argument.

use crate::value::{ArithError, Number};
use smartstring::alias::String;
use std::fmt;
use std::str::FromStr;

/// A built-in function keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Func {
    Sin = 0,
    Cos = 1,
    Exp = 2,
    Log = 3,
}

impl Func {
    /// Keyword spellings, in declaration order.
    pub const STRS: &[&str] = &["sin", "cos", "exp", "log"];

    /// Applies the function, rejecting arguments outside its domain.
    ///
    /// # Errors
    /// - [`ArithError::Domain`] for `log` of a non-positive number and for
    ///   `sin`/`cos` of an infinity.
    /// - [`ArithError::Overflow`] when `exp` of a finite argument is not
    ///   representable.
    pub fn apply(self, arg: Number) -> Result<Number, ArithError> {
        let x = arg.to_f64();
        let y = match self {
            Func::Sin | Func::Cos if x.is_infinite() => {
                return Err(ArithError::Domain { func: self, arg: x });
            }
            Func::Sin => x.sin(),
            Func::Cos => x.cos(),
            Func::Exp => {
                let y = x.exp();
                if y.is_infinite() && x.is_finite() {
                    return Err(ArithError::Overflow("exp"));
                }
                y
            }
            Func::Log => {
                if x <= 0.0 {
                    return Err(ArithError::Domain { func: self, arg: x });
                }
                x.ln()
            }
        };
        Ok(Number::Float(y))
    }
}

impl From<Func> for usize {
    fn from(f: Func) -> Self {
        f as usize
    }
}

impl fmt::Display for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Func::STRS[usize::from(*self)])
    }
}

/// Error type returned when a string is not a function keyword.
#[derive(Debug, Clone)]
pub struct ParseFuncError(String);

impl fmt::Display for ParseFuncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown function: {}", self.0)
    }
}
impl std::error::Error for ParseFuncError {}

impl FromStr for Func {
    type Err = ParseFuncError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sin" => Ok(Func::Sin),
            "cos" => Ok(Func::Cos),
            "exp" => Ok(Func::Exp),
            "log" => Ok(Func::Log),
            other => Err(ParseFuncError(String::from(other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_round_trip_through_display() {
        for s in Func::STRS {
            let f: Func = s.parse().unwrap();
            assert_eq!(f.to_string(), *s);
        }
        assert!("tan".parse::<Func>().is_err());
    }

    #[test]
    fn identities_at_zero_and_one() {
        assert_eq!(Func::Sin.apply(Number::Int(0)), Ok(Number::Float(0.0)));
        assert_eq!(Func::Cos.apply(Number::Int(0)), Ok(Number::Float(1.0)));
        assert_eq!(Func::Exp.apply(Number::Int(0)), Ok(Number::Float(1.0)));
        assert_eq!(Func::Log.apply(Number::Int(1)), Ok(Number::Float(0.0)));
    }

    #[test]
    fn log_rejects_non_positive_arguments() {
        assert!(matches!(
            Func::Log.apply(Number::Int(0)),
            Err(ArithError::Domain { func: Func::Log, .. })
        ));
        assert!(matches!(
            Func::Log.apply(Number::Float(-2.5)),
            Err(ArithError::Domain { func: Func::Log, .. })
        ));
    }

    #[test]
    fn exp_overflow_and_trig_of_infinity() {
        assert_eq!(
            Func::Exp.apply(Number::Int(1000)),
            Err(ArithError::Overflow("exp"))
        );
        assert!(matches!(
            Func::Sin.apply(Number::Float(f64::INFINITY)),
            Err(ArithError::Domain { func: Func::Sin, .. })
        ));
    }
}
