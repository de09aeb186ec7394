//! Expression engine of an interactive calculator.
//!
//! A statement goes through [`Lexer`] → [`parse::to_postfix`] →
//! [`Interpreter`], which looks names up in an explicit [`SymbolTable`] and
//! produces a [`Value`]. The functions at the crate root are the surface a
//! front end needs; [`Session`] adds statement parsing and system commands on
//! top of them.

pub mod config;
pub mod error;
pub mod eval;
pub mod lex;
pub mod matrix;
pub mod op;
pub mod parse;
pub mod session;
pub mod statement;
pub mod symbol;
pub mod system;
pub mod value;

use tracing::debug;

pub use config::{Config, FunctionMode};
pub use error::EvalError;
pub use eval::Interpreter;
pub use lex::Lexer;
pub use matrix::Matrix;
pub use session::{Outcome, Session};
pub use statement::Statement;
pub use symbol::{Function, Symbol, SymbolTable};
pub use value::Value;

/// Evaluates `expression` against `table` without changing it.
pub fn evaluate(expression: &str, table: &SymbolTable) -> Result<Value, EvalError> {
    debug!(expression, "evaluate");
    Interpreter::new(table).eval_str(expression)
}

/// Evaluates `expression` and stores the result under `name`.
///
/// The expression sees the table as it was before this call, so `a = a + 1`
/// reads the old `a`. Nothing is stored unless evaluation succeeds.
pub fn define_variable(
    name: &str,
    expression: &str,
    table: &mut SymbolTable,
) -> Result<Value, EvalError> {
    symbol::validate_name(name)?;
    let value = evaluate(expression, table)?;
    debug!(name, %value, "define variable");
    table.define(name, Symbol::Variable(value.clone()))?;
    Ok(value)
}

/// Defines `name(parameter) = body`.
///
/// In [`FunctionMode::Substitute`] the body is only checked for syntax here
/// and evaluated on each call. In [`FunctionMode::Eager`] it is evaluated now,
/// with `parameter` left unbound, and that value is what every call returns.
pub fn define_function(
    name: &str,
    parameter: &str,
    body: &str,
    table: &mut SymbolTable,
) -> Result<(), EvalError> {
    symbol::validate_name(name)?;
    symbol::validate_name(parameter)?;

    let eager = match table.config().function_mode {
        FunctionMode::Substitute => {
            let postfix = parse::to_postfix(Lexer::new(body))?;
            parse::check_arity(&postfix)?;
            None
        }
        FunctionMode::Eager => Some(evaluate(body, table)?),
    };

    debug!(name, parameter, body, eager = eager.is_some(), "define function");
    table.define(
        name,
        Symbol::Function(Function {
            param: parameter.to_ascii_lowercase(),
            body: body.trim().to_string(),
            eager,
        }),
    )
}

/// The value stored under `name`.
pub fn lookup(name: &str, table: &SymbolTable) -> Result<Value, EvalError> {
    table.value(name).cloned()
}

/// Renders a value the way the calculator prints it: `4`, `2.5`,
/// `[[3,5];[2,4]]`.
pub fn format(value: &Value) -> String {
    value.to_string()
}
