use std::collections::BTreeMap;

use crate::{config::Config, error::EvalError, lex, value::Value};

/// Names that can never be defined: `i` is kept for an imaginary unit.
pub const RESERVED: &[&str] = &["i"];

pub fn is_reserved(name: &str) -> bool {
    RESERVED
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
}

/// Checks `name` can be defined and returns the key it is stored under.
pub fn validate_name(name: &str) -> Result<String, EvalError> {
    if !lex::is_identifier(name) || is_reserved(name) {
        return Err(EvalError::InvalidVariableName {
            name: name.to_string(),
        });
    }
    Ok(name.to_ascii_lowercase())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub param: String,
    /// The body as written, re-read on every call.
    pub body: String,
    /// Set when the function was defined in [`FunctionMode::Eager`]; calls
    /// then return this and ignore their argument.
    ///
    /// [`FunctionMode::Eager`]: crate::FunctionMode::Eager
    pub eager: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Variable(Value),
    Function(Function),
}

/// Names to values and functions for one session.
///
/// Keys are lower-cased on the way in and on every lookup, so `A` and `a`
/// are the same name.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: BTreeMap<String, Symbol>,
    config: Config,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        SymbolTable {
            symbols: BTreeMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Stores `symbol` under `name`, replacing any previous definition.
    pub fn define(&mut self, name: &str, symbol: Symbol) -> Result<(), EvalError> {
        let key = validate_name(name)?;
        self.symbols.insert(key, symbol);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<&Symbol, EvalError> {
        self.symbols
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| EvalError::unresolved(name))
    }

    /// The value `name` stands for inside an expression.
    ///
    /// Functions only have one when they were defined eagerly; otherwise
    /// they have to be called.
    pub fn value(&self, name: &str) -> Result<&Value, EvalError> {
        match self.lookup(name)? {
            Symbol::Variable(value) => Ok(value),
            Symbol::Function(Function {
                eager: Some(value), ..
            }) => Ok(value),
            Symbol::Function(_) => Err(EvalError::unresolved(name)),
        }
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Symbol)> {
        self.symbols.iter().map(|(name, symbol)| (name.as_str(), symbol))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn clear(&mut self) {
        self.symbols.clear();
    }
}
