use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::matrix::Shape;

/// Every way a statement can fail. None of these are fatal to a session.
///
/// Spans are byte ranges into the statement that was handed to the engine;
/// they are `None` when the failure has no single place to point at.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum EvalError {
    #[error("Unexpected token '{token}'")]
    #[diagnostic(
        code(computor::invalid_token),
        help("numbers look like `4` or `2.5`, names are made of letters only and `i` is reserved")
    )]
    InvalidToken {
        token: String,
        #[label("this token")]
        span: Option<SourceSpan>,
    },

    #[error("unbalanced parentheses")]
    #[diagnostic(
        code(computor::unbalanced_parentheses),
        help("every `(` needs a matching `)`")
    )]
    UnbalancedParentheses {
        #[label("no match for this one")]
        span: Option<SourceSpan>,
    },

    #[error("malformed expression: {reason}")]
    #[diagnostic(code(computor::malformed_expression))]
    MalformedExpression {
        reason: String,
        #[label("here")]
        span: Option<SourceSpan>,
    },

    #[error("unresolved reference '{name}'")]
    #[diagnostic(
        code(computor::unresolved_reference),
        help("assign it a value before using it")
    )]
    UnresolvedReference {
        name: String,
        #[label("not defined")]
        span: Option<SourceSpan>,
    },

    #[error("invalid variable name '{name}'")]
    #[diagnostic(
        code(computor::invalid_variable_name),
        help("names are made of letters only and `i` is reserved")
    )]
    InvalidVariableName { name: String },

    #[error("cannot combine a {left} matrix with a {right} matrix")]
    #[diagnostic(code(computor::dimension_mismatch))]
    DimensionMismatch {
        left: Shape,
        right: Shape,
        #[label("operands differ in shape")]
        span: Option<SourceSpan>,
    },

    #[error("malformed matrix: {reason}")]
    #[diagnostic(
        code(computor::malformed_matrix),
        help("write matrices as `[[1,2];[3,4]]`")
    )]
    MalformedMatrix {
        reason: String,
        #[label("in this matrix")]
        span: Option<SourceSpan>,
    },

    #[error("division by zero")]
    #[diagnostic(code(computor::division_by_zero))]
    DivisionByZero {
        #[label("right operand is zero")]
        span: Option<SourceSpan>,
    },

    #[error("expression nests deeper than {limit} levels")]
    #[diagnostic(
        code(computor::too_deep),
        help("a function that calls itself never stops; raise `--max-depth` for deep matrices")
    )]
    TooDeep {
        limit: usize,
        #[label("while evaluating this")]
        span: Option<SourceSpan>,
    },
}

impl EvalError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        EvalError::MalformedExpression {
            reason: reason.into(),
            span: None,
        }
    }

    pub fn malformed_matrix(reason: impl Into<String>) -> Self {
        EvalError::MalformedMatrix {
            reason: reason.into(),
            span: None,
        }
    }

    pub fn unresolved(name: &str) -> Self {
        EvalError::UnresolvedReference {
            name: name.to_string(),
            span: None,
        }
    }

    fn span_mut(&mut self) -> Option<&mut Option<SourceSpan>> {
        match self {
            EvalError::InvalidToken { span, .. }
            | EvalError::UnbalancedParentheses { span }
            | EvalError::MalformedExpression { span, .. }
            | EvalError::UnresolvedReference { span, .. }
            | EvalError::DimensionMismatch { span, .. }
            | EvalError::MalformedMatrix { span, .. }
            | EvalError::DivisionByZero { span }
            | EvalError::TooDeep { span, .. } => Some(span),
            EvalError::InvalidVariableName { .. } => None,
        }
    }

    pub fn span(&self) -> Option<SourceSpan> {
        match self {
            EvalError::InvalidToken { span, .. }
            | EvalError::UnbalancedParentheses { span }
            | EvalError::MalformedExpression { span, .. }
            | EvalError::UnresolvedReference { span, .. }
            | EvalError::DimensionMismatch { span, .. }
            | EvalError::MalformedMatrix { span, .. }
            | EvalError::DivisionByZero { span }
            | EvalError::TooDeep { span, .. } => *span,
            EvalError::InvalidVariableName { .. } => None,
        }
    }

    /// Points the error at `span` unless it already points somewhere.
    pub fn or_at(mut self, span: SourceSpan) -> Self {
        if let Some(slot) = self.span_mut() {
            slot.get_or_insert(span);
        }
        self
    }

    /// Points the error at `span`, replacing whatever it pointed at.
    ///
    /// Used when an error comes out of text that is not part of the
    /// statement, such as the stored body of a function.
    pub fn at(mut self, span: SourceSpan) -> Self {
        if let Some(slot) = self.span_mut() {
            *slot = Some(span);
        }
        self
    }

    /// Moves the span `base` bytes to the right, for errors raised while
    /// evaluating a slice of a larger statement.
    pub fn shifted(mut self, base: usize) -> Self {
        if let Some(Some(span)) = self.span_mut() {
            *span = SourceSpan::from((span.offset() + base, span.len()));
        }
        self
    }
}
