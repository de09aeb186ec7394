use std::fmt::Display;

use tracing::trace;

use crate::{
    error::EvalError,
    lex::{Token, TokenKind},
    op::CALL_PRECEDENCE,
};

/// Precedence of an entry on the operator stack; `None` for `(`.
fn precedence(token: &Token<'_>) -> Option<u8> {
    match token.kind {
        TokenKind::Op(op) => Some(op.precedence()),
        TokenKind::Call => Some(CALL_PRECEDENCE),
        _ => None,
    }
}

/// Shunting-yard: reorders infix tokens into postfix.
///
/// Binary operators pop every stacked operator of greater or equal
/// precedence before being pushed, so chains of one precedence level,
/// `^` included, group left to right: `2^3^2` is `(2^3)^2`. Prefix operators
/// (signs and calls) are pushed as they come, since their operand is still
/// ahead of them.
pub fn to_postfix<'de>(
    tokens: impl IntoIterator<Item = Result<Token<'de>, EvalError>>,
) -> Result<Vec<Token<'de>>, EvalError> {
    let mut output = Vec::new();
    let mut stack: Vec<Token<'de>> = Vec::new();

    for token in tokens {
        let token = token?;
        match token.kind {
            TokenKind::Number(_) | TokenKind::Ident | TokenKind::Matrix | TokenKind::Bound(_) => {
                output.push(token)
            }
            TokenKind::OpenParen | TokenKind::Call => stack.push(token),
            TokenKind::Op(op) if op.is_prefix() => stack.push(token),
            TokenKind::Op(op) => {
                while stack
                    .last()
                    .and_then(precedence)
                    .is_some_and(|top| top >= op.precedence())
                {
                    output.extend(stack.pop());
                }
                stack.push(token);
            }
            TokenKind::CloseParen => loop {
                match stack.pop() {
                    Some(Token {
                        kind: TokenKind::OpenParen,
                        ..
                    }) => break,
                    Some(top) => output.push(top),
                    None => {
                        return Err(EvalError::UnbalancedParentheses {
                            span: Some(token.span()),
                        });
                    }
                }
            },
        }
    }

    while let Some(top) = stack.pop() {
        if top.kind == TokenKind::OpenParen {
            return Err(EvalError::UnbalancedParentheses {
                span: Some(top.span()),
            });
        }
        output.push(top);
    }

    trace!(postfix = %DisplayPostfix(&output), "converted to postfix");
    Ok(output)
}

/// Checks that a postfix sequence leaves exactly one value behind, without
/// evaluating anything. Lets definitions reject `f(x) = x x` up front.
pub fn check_arity(postfix: &[Token<'_>]) -> Result<(), EvalError> {
    let mut depth = 0usize;
    for token in postfix {
        let arity = match token.kind {
            TokenKind::Op(op) => op.arity(),
            TokenKind::Call => 1,
            _ => 0,
        };
        if depth < arity {
            return Err(EvalError::MalformedExpression {
                reason: format!("'{}' is missing an operand", token.literal),
                span: Some(token.span()),
            });
        }
        depth = depth - arity + 1;
    }
    match depth {
        1 => Ok(()),
        0 => Err(EvalError::malformed("nothing to evaluate")),
        _ => Err(EvalError::malformed("operands without an operator between them")),
    }
}

/// Renders postfix tokens space separated, with signs as `u-`/`u+` and
/// calls as `f()`.
pub struct DisplayPostfix<'a, 'de>(pub &'a [Token<'de>]);

impl Display for DisplayPostfix<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, token) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match &token.kind {
                TokenKind::Op(op) if op.is_prefix() => write!(f, "u{}", op.symbol())?,
                TokenKind::Call => write!(f, "{}()", token.literal)?,
                TokenKind::Bound(value) => write!(f, "{value}")?,
                _ => write!(f, "{}", token.literal)?,
            }
        }
        Ok(())
    }
}
