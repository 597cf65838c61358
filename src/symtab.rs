//! # symtab
//!
//! A minimal, flat symbol table built on [`indexmap::IndexMap`].
//!
//! The table maps variable names to their last assigned [`Number`]. It lives
//! for exactly one evaluation session: the driver owns it and lends it to
//! the evaluator for every statement. There is no removal operation.
//!
//! ## Example
//! ```rust
//! # use climb_calc::{Number, SymTab};
//! let mut st = SymTab::new();
//! assert!(st.get("x").is_none());
//! st.set("x", Number::Int(42));
//! assert_eq!(st.get("x"), Some(Number::Int(42)));
//! st.set("x", Number::Float(0.5)); // overwrites
//! assert_eq!(st.lookup("x").unwrap(), Number::Float(0.5));
//! ```

use crate::value::Number;
use indexmap::IndexMap;
use smartstring::alias::String;
use thiserror::Error;

/// Errors that can occur when operating on a [`SymTab`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymTabError {
    /// The name has never been assigned in this session.
    #[error("Undefined name '{name}'")]
    Undefined {
        /// The name that was looked up.
        name: String,
    },
}

/// A symbol table that maps variable names to numeric values.
#[derive(Debug, Default)]
pub struct SymTab {
    tab: IndexMap<String, Number>,
}

impl SymTab {
    /// Creates a new, empty symbol table.
    pub fn new() -> Self {
        Self {
            tab: IndexMap::new(),
        }
    }

    /// Returns the number of names currently bound.
    pub fn len(&self) -> usize {
        self.tab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tab.is_empty()
    }

    /// Binds `name` to `value`, overwriting any previous value.
    pub fn set(&mut self, name: impl AsRef<str>, value: Number) {
        let name = name.as_ref();
        log::debug!("symtab: {name} = {value}");
        self.tab.insert(String::from(name), value);
    }

    /// Returns the value bound to `name`, if any.
    pub fn get(&self, name: &str) -> Option<Number> {
        self.tab.get(name).copied()
    }

    /// Looks up `name`, failing with [`SymTabError::Undefined`] when it has
    /// never been assigned.
    pub fn lookup(&self, name: &str) -> Result<Number, SymTabError> {
        self.get(name).ok_or_else(|| SymTabError::Undefined {
            name: String::from(name),
        })
    }

    /// Iterates over the bindings in first-assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Number)> {
        self.tab.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
