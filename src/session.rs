use std::fmt::Display;

use tracing::debug;

use crate::{
    config::Config,
    define_function, define_variable,
    error::EvalError,
    evaluate,
    lex::offset_in,
    statement::Statement,
    symbol::SymbolTable,
    system::HELP,
    value::Value,
};

/// What running one line produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Value(Value),
    /// A function definition, echoed back as `name(param) = body`.
    Defined(String),
    Listing(Vec<String>),
    Cleared,
    Help,
    Quit,
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Value(value) => write!(f, "{value}"),
            Outcome::Defined(definition) => write!(f, "{definition}"),
            Outcome::Listing(lines) if lines.is_empty() => write!(f, "nothing defined"),
            Outcome::Listing(lines) => write!(f, "{}", lines.join("\n")),
            Outcome::Cleared => write!(f, "all definitions removed"),
            Outcome::Help => write!(f, "{HELP}"),
            Outcome::Quit => Ok(()),
        }
    }
}

/// One user's calculator: a symbol table and the statements run against it.
#[derive(Debug, Default)]
pub struct Session {
    table: SymbolTable,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Session {
            table: SymbolTable::with_config(config),
        }
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    /// Runs one line. Error spans are byte ranges into `line`.
    pub fn execute(&mut self, line: &str) -> Result<Outcome, EvalError> {
        let statement = Statement::parse(line)?;
        debug!(?statement, "execute");

        let base = statement
            .source()
            .map(|source| offset_in(line, source))
            .unwrap_or_default();

        let outcome = match statement {
            Statement::Command(command) => Ok(command.run(&mut self.table)),
            Statement::Query { expr } | Statement::Expression { expr } => {
                evaluate(expr, &self.table).map(Outcome::Value)
            }
            Statement::Assign { name, expr } => {
                define_variable(name, expr, &mut self.table).map(Outcome::Value)
            }
            Statement::Function { name, param, body } => {
                define_function(name, param, body, &mut self.table).map(|()| {
                    Outcome::Defined(format!(
                        "{}({}) = {body}",
                        name.to_ascii_lowercase(),
                        param.to_ascii_lowercase()
                    ))
                })
            }
        };
        outcome.map_err(|e| e.shifted(base))
    }
}
