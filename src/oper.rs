//! Operator definitions and precedence handling.
//!
//! The evaluator resolves operator precedence with precedence climbing, so
//! instead of one grammar rule per level it consults the table in this
//! module. Higher numbers bind tighter.
//!
//! | operators | fixity | precedence | associativity |
//! |-----------|--------|------------|---------------|
//! | `+` `-`   | infix  | 1          | left          |
//! | `*` `/`   | infix  | 2          | left          |
//! | `+` `-`   | prefix | 3          | right         |

use crate::TokenID;
use crate::value::{ArithError, Number};
use std::fmt;

/// Operator associativity classification.
///
/// | Variant | Description |
/// |----------|--------------|
/// | [`Assoc::Left`]  | Left-associative: groups from left to right. |
/// | [`Assoc::Right`] | Right-associative: groups from right to left. |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Assoc {
    Left = 0,
    Right = 1,
}

/// Binary (infix) operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Plus,
    Minus,
}

/// Precedence of the prefix operators; above every binary operator.
pub const PREFIX_PRECEDENCE: u8 = 3;

/// Lowest precedence accepted at the start of a full expression.
pub const MIN_PRECEDENCE: u8 = 1;

impl BinOp {
    /// Maps a token to the binary operator it spells, if any.
    pub fn from_token(token_id: TokenID) -> Option<Self> {
        match token_id {
            TokenID::Plus => Some(BinOp::Add),
            TokenID::Minus => Some(BinOp::Sub),
            TokenID::Asterisk => Some(BinOp::Mul),
            TokenID::Slash => Some(BinOp::Div),
            _ => None,
        }
    }

    /// Returns `(precedence, associativity)` for this operator.
    pub fn binding(self) -> (u8, Assoc) {
        match self {
            BinOp::Add | BinOp::Sub => (1, Assoc::Left),
            BinOp::Mul | BinOp::Div => (2, Assoc::Left),
        }
    }

    /// Minimum precedence for the right-hand operand of this operator.
    pub fn rhs_precedence(self) -> u8 {
        match self.binding() {
            (prec, Assoc::Left) => prec + 1,
            (prec, Assoc::Right) => prec,
        }
    }

    pub fn apply(self, lhs: Number, rhs: Number) -> Result<Number, ArithError> {
        match self {
            BinOp::Add => lhs.add(rhs),
            BinOp::Sub => lhs.sub(rhs),
            BinOp::Mul => lhs.mul(rhs),
            BinOp::Div => lhs.div(rhs),
        }
    }
}

impl UnOp {
    /// Returns `(precedence, associativity)`; prefix operators nest to the
    /// right, so `- -x` is `-(-x)`.
    pub fn binding(self) -> (u8, Assoc) {
        (PREFIX_PRECEDENCE, Assoc::Right)
    }

    pub fn from_token(token_id: TokenID) -> Option<Self> {
        match token_id {
            TokenID::Plus => Some(UnOp::Plus),
            TokenID::Minus => Some(UnOp::Minus),
            _ => None,
        }
    }

    pub fn apply(self, operand: Number) -> Result<Number, ArithError> {
        match self {
            UnOp::Plus => Ok(operand),
            UnOp::Minus => operand.neg(),
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        })
    }
}

impl fmt::Display for UnOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnOp::Plus => "+",
            UnOp::Minus => "-",
        })
    }
}
