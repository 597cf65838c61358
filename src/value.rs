//! # Numeric values
//!
//! [`Number`] is the only runtime type of the calculator: a tagged
//! `{Int, Float}` pair with an explicit promotion table.
//!
//! | lhs   | rhs   | `+ - *` | `/`   |
//! |-------|-------|---------|-------|
//! | Int   | Int   | Int     | Float |
//! | Int   | Float | Float   | Float |
//! | Float | Int   | Float   | Float |
//! | Float | Float | Float   | Float |
//!
//! Integer arithmetic is checked; a result that does not fit in an `i64`
//! is an [`ArithError::Overflow`] rather than a silent wrap.

use crate::func::Func;
use std::fmt;
use thiserror::Error;

/// Failures raised while evaluating an otherwise well-formed statement.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArithError {
    /// The divisor of `/` was `0` or `0.0`.
    #[error("division by zero")]
    DivisionByZero,

    /// A function was applied outside its numeric domain.
    #[error("math domain error: {func}({arg})")]
    Domain { func: Func, arg: f64 },

    /// Integer arithmetic or a function result left the representable range.
    #[error("numeric overflow in {0}")]
    Overflow(&'static str),
}

/// A calculator value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

/// Operands of a binary operation after promotion.
enum Promoted {
    Ints(i64, i64),
    Floats(f64, f64),
}

impl Number {
    /// Returns the value as a float, converting integers.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Number::Int(i) => i == 0,
            Number::Float(f) => f == 0.0,
        }
    }

    fn promote(self, rhs: Number) -> Promoted {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => Promoted::Ints(a, b),
            (a, b) => Promoted::Floats(a.to_f64(), b.to_f64()),
        }
    }

    pub fn add(self, rhs: Number) -> Result<Number, ArithError> {
        match self.promote(rhs) {
            Promoted::Ints(a, b) => a
                .checked_add(b)
                .map(Number::Int)
                .ok_or(ArithError::Overflow("addition")),
            Promoted::Floats(a, b) => Ok(Number::Float(a + b)),
        }
    }

    pub fn sub(self, rhs: Number) -> Result<Number, ArithError> {
        match self.promote(rhs) {
            Promoted::Ints(a, b) => a
                .checked_sub(b)
                .map(Number::Int)
                .ok_or(ArithError::Overflow("subtraction")),
            Promoted::Floats(a, b) => Ok(Number::Float(a - b)),
        }
    }

    pub fn mul(self, rhs: Number) -> Result<Number, ArithError> {
        match self.promote(rhs) {
            Promoted::Ints(a, b) => a
                .checked_mul(b)
                .map(Number::Int)
                .ok_or(ArithError::Overflow("multiplication")),
            Promoted::Floats(a, b) => Ok(Number::Float(a * b)),
        }
    }

    /// True division: the result is a `Float` even for two integers.
    pub fn div(self, rhs: Number) -> Result<Number, ArithError> {
        if rhs.is_zero() {
            return Err(ArithError::DivisionByZero);
        }
        Ok(Number::Float(self.to_f64() / rhs.to_f64()))
    }

    pub fn neg(self) -> Result<Number, ArithError> {
        match self {
            Number::Int(i) => i
                .checked_neg()
                .map(Number::Int)
                .ok_or(ArithError::Overflow("negation")),
            Number::Float(f) => Ok(Number::Float(-f)),
        }
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        Number::Int(i)
    }
}

impl fmt::Display for Number {
    /// Finite floats are written in plain decimal notation and always carry
    /// a fractional part (`150.0`, `0.00001`); integers never do. Infinities
    /// and NaN print as `inf`, `-inf` and `NaN`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:.1}"),
            Number::Float(x) => write!(f, "{x}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_ops_stay_int() {
        let a = Number::Int(7);
        let b = Number::Int(2);
        assert_eq!(a.add(b), Ok(Number::Int(9)));
        assert_eq!(a.sub(b), Ok(Number::Int(5)));
        assert_eq!(a.mul(b), Ok(Number::Int(14)));
    }

    #[test]
    fn mixed_ops_promote_to_float() {
        let a = Number::Int(2);
        let b = Number::Float(0.5);
        assert_eq!(a.add(b), Ok(Number::Float(2.5)));
        assert_eq!(b.sub(a), Ok(Number::Float(-1.5)));
        assert_eq!(a.mul(b), Ok(Number::Float(1.0)));
    }

    #[test]
    fn division_is_true_division() {
        assert_eq!(Number::Int(7).div(Number::Int(2)), Ok(Number::Float(3.5)));
        assert_eq!(Number::Int(8).div(Number::Int(2)), Ok(Number::Float(4.0)));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert_eq!(
            Number::Int(1).div(Number::Int(0)),
            Err(ArithError::DivisionByZero)
        );
        assert_eq!(
            Number::Float(1.0).div(Number::Float(0.0)),
            Err(ArithError::DivisionByZero)
        );
    }

    #[test]
    fn integer_overflow_is_reported() {
        let max = Number::Int(i64::MAX);
        assert_eq!(
            max.add(Number::Int(1)),
            Err(ArithError::Overflow("addition"))
        );
        assert_eq!(
            Number::Int(i64::MIN).neg(),
            Err(ArithError::Overflow("negation"))
        );
    }

    #[test]
    fn display_distinguishes_int_and_float() {
        assert_eq!(Number::Int(42).to_string(), "42");
        assert_eq!(Number::Float(150.0).to_string(), "150.0");
        assert_eq!(Number::Float(3.5).to_string(), "3.5");
        assert_eq!(Number::Float(0.0).to_string(), "0.0");
        assert_eq!(Number::Int(-5).to_string(), "-5");
    }

    #[test]
    fn display_never_uses_exponent_notation() {
        assert_eq!(Number::Float(1e16).to_string(), "10000000000000000.0");
        assert_eq!(Number::Float(1e-5).to_string(), "0.00001");
        assert_eq!(Number::Float(-2.0).to_string(), "-2.0");
        assert_eq!(Number::Float(f64::INFINITY).to_string(), "inf");
        assert_eq!(Number::Float(f64::NAN).to_string(), "NaN");
    }
}
