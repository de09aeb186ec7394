use miette::SourceSpan;

use crate::{error::EvalError, lex::offset_in, system::Command};

/// One line of calculator input, split into its parts but not evaluated.
///
/// Every `&str` borrows from the line, so errors raised while evaluating a
/// part can be moved back to where it sits in the line.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement<'de> {
    Command(Command),
    /// `<expr> = ?`
    Query { expr: &'de str },
    /// `name = <expr>`
    Assign { name: &'de str, expr: &'de str },
    /// `name(param) = <body>`
    Function {
        name: &'de str,
        param: &'de str,
        body: &'de str,
    },
    /// A bare expression.
    Expression { expr: &'de str },
}

impl<'de> Statement<'de> {
    pub fn parse(line: &'de str) -> Result<Self, EvalError> {
        let trimmed = line.trim();
        if let Some(command) = Command::parse(trimmed) {
            return Ok(Statement::Command(command));
        }

        let Some((lhs, rhs)) = trimmed.split_once('=') else {
            return Ok(Statement::Expression { expr: trimmed });
        };
        let (lhs, rhs) = (lhs.trim(), rhs.trim());

        if let Some(extra) = rhs.find('=') {
            return Err(EvalError::MalformedExpression {
                reason: "a statement holds at most one `=`".to_string(),
                span: Some(SourceSpan::from((offset_in(line, rhs) + extra, 1))),
            });
        }
        if rhs == "?" {
            return Ok(Statement::Query { expr: lhs });
        }
        if rhs.is_empty() {
            return Err(EvalError::MalformedExpression {
                reason: "nothing after `=`".to_string(),
                span: Some(SourceSpan::from((offset_in(line, lhs) + lhs.len(), 1))),
            });
        }

        if let Some((name, rest)) = lhs.split_once('(') {
            let Some(param) = rest.trim_end().strip_suffix(')') else {
                return Err(EvalError::MalformedExpression {
                    reason: "expected `name(parameter)` before `=`".to_string(),
                    span: Some(SourceSpan::from((offset_in(line, lhs), lhs.len()))),
                });
            };
            return Ok(Statement::Function {
                name: name.trim(),
                param: param.trim(),
                body: rhs,
            });
        }

        Ok(Statement::Assign {
            name: lhs,
            expr: rhs,
        })
    }

    /// The part of the line that gets evaluated, if any.
    pub fn source(&self) -> Option<&'de str> {
        match self {
            Statement::Command(_) => None,
            Statement::Query { expr }
            | Statement::Assign { expr, .. }
            | Statement::Expression { expr } => Some(*expr),
            Statement::Function { body, .. } => Some(*body),
        }
    }
}
