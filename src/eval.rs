use miette::SourceSpan;
use tracing::{debug, trace};

use crate::{
    error::EvalError,
    lex::{Lexer, Token, TokenKind, offset_in},
    matrix::{self, Matrix},
    parse::to_postfix,
    symbol::{Symbol, SymbolTable},
    value::Value,
};

/// Stack machine over postfix tokens.
///
/// Identifiers are looked up when they are reached, never earlier, so an
/// expression sees the table exactly as it is while it runs. Function calls
/// and matrix elements are evaluated by a nested interpreter one level
/// deeper, up to the table's configured limit. Inside a function body the
/// parameter is bound for every nested level, matrix elements included.
pub struct Interpreter<'t> {
    table: &'t SymbolTable,
    depth: usize,
    /// Parameter name and argument of the function being evaluated.
    binding: Option<(&'t str, Value)>,
}

impl<'t> Interpreter<'t> {
    pub fn new(table: &'t SymbolTable) -> Self {
        Interpreter {
            table,
            depth: 0,
            binding: None,
        }
    }

    fn nested(&self, span: SourceSpan) -> Result<Self, EvalError> {
        let limit = self.table.config().max_depth;
        if self.depth >= limit {
            return Err(EvalError::TooDeep {
                limit,
                span: Some(span),
            });
        }
        Ok(Interpreter {
            table: self.table,
            depth: self.depth + 1,
            binding: self.binding.clone(),
        })
    }

    /// Tokenizes `source`, swapping the bound parameter for its argument.
    fn postfix<'s>(&self, source: &'s str) -> Result<Vec<Token<'s>>, EvalError> {
        let tokens = Lexer::new(source).map(|token| match &self.binding {
            Some((param, argument)) => token.map(|token| token.bind(param, argument)),
            None => token,
        });
        to_postfix(tokens)
    }

    pub fn eval_str(&self, source: &str) -> Result<Value, EvalError> {
        let postfix = self.postfix(source)?;
        self.eval_postfix(&postfix)
    }

    pub fn eval_postfix(&self, postfix: &[Token<'_>]) -> Result<Value, EvalError> {
        let mut stack: Vec<Value> = Vec::with_capacity(postfix.len());

        for token in postfix {
            let value = match &token.kind {
                TokenKind::Number(n) => Value::Number(*n),
                TokenKind::Bound(value) => value.clone(),
                TokenKind::Ident => self
                    .table
                    .value(token.literal)
                    .map_err(|e| e.or_at(token.span()))?
                    .clone(),
                TokenKind::Matrix => self.read_matrix(token)?,
                TokenKind::Op(op) => {
                    let operands = pop_operands(&mut stack, op.arity(), token)?;
                    op.apply(&operands).map_err(|e| e.or_at(token.span()))?
                }
                TokenKind::Call => {
                    let mut operands = pop_operands(&mut stack, 1, token)?;
                    let argument = operands.remove(0);
                    self.call(token, argument)?
                }
                TokenKind::OpenParen | TokenKind::CloseParen => {
                    return Err(EvalError::MalformedExpression {
                        reason: "parenthesis left in postfix input".to_string(),
                        span: Some(token.span()),
                    });
                }
            };
            trace!(token = token.literal, %value, depth = self.depth, "push");
            stack.push(value);
        }

        let value = stack
            .pop()
            .ok_or_else(|| EvalError::malformed("nothing to evaluate"))?;
        if !stack.is_empty() {
            return Err(EvalError::malformed(
                "operands without an operator between them",
            ));
        }
        Ok(value)
    }

    fn call(&self, token: &Token<'_>, argument: Value) -> Result<Value, EvalError> {
        let name = token.literal;
        let function = match self.table.lookup(name).map_err(|e| e.or_at(token.span()))? {
            Symbol::Function(function) => function,
            Symbol::Variable(_) => {
                return Err(EvalError::MalformedExpression {
                    reason: format!("'{name}' is a variable, not a function"),
                    span: Some(token.span()),
                });
            }
        };

        if let Some(value) = &function.eager {
            debug!(function = name, "eager function ignores its argument");
            return Ok(value.clone());
        }

        debug!(function = name, %argument, depth = self.depth + 1, "call");
        let nested = Interpreter {
            binding: Some((function.param.as_str(), argument)),
            ..self.nested(token.span())?
        };
        let postfix = nested
            .postfix(&function.body)
            .map_err(|e| e.at(token.span()))?;
        nested
            .eval_postfix(&postfix)
            .map_err(|e| e.at(token.span()))
    }

    fn read_matrix(&self, token: &Token<'_>) -> Result<Value, EvalError> {
        let nested = self.nested(token.span())?;
        let rows = matrix::split_literal(token.literal).map_err(|e| e.or_at(token.span()))?;

        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|element| {
                        let base = token.offset + offset_in(token.literal, element);
                        nested.eval_str(element).map_err(|e| {
                            e.shifted(base)
                                .or_at(SourceSpan::from((base, element.len())))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Matrix::from_rows(rows)
            .map(Value::Matrix)
            .map_err(|e| e.or_at(token.span()))
    }
}

/// Takes the top `arity` values, in the order they were pushed.
fn pop_operands(
    stack: &mut Vec<Value>,
    arity: usize,
    token: &Token<'_>,
) -> Result<Vec<Value>, EvalError> {
    if stack.len() < arity {
        return Err(EvalError::MalformedExpression {
            reason: format!("'{}' is missing an operand", token.literal),
            span: Some(token.span()),
        });
    }
    Ok(stack.split_off(stack.len() - arity))
}
